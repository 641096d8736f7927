use clap::Args;
use dnsprobe_application::services::{ValidationMode, ValidationReport};
use dnsprobe_application::use_cases::{generate_sandbox_name, ProbeRequest};
use dnsprobe_domain::{Config, HostAlias, ProbeBatch, ProbeContext, RecordType, SandboxIdentity};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{parse_host, parse_key_value, variants};
use crate::di::{Compilers, UseCases};

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Name to resolve; repeat for several
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Hosts-database entry to check
    #[arg(long = "host", value_name = "ALIAS[=CANONICAL]", value_parser = parse_host)]
    pub hosts: Vec<HostAlias>,

    /// Also check the PTR record of this IP
    #[arg(long)]
    pub server_ip: Option<String>,

    /// Variant to run; defaults to every configured variant
    #[arg(long = "variant", value_name = "VARIANT")]
    pub variants: Vec<String>,

    /// Pod hostname; with --subdomain also checks the pod's own host entries
    #[arg(long)]
    pub hostname: Option<String>,

    #[arg(long)]
    pub subdomain: Option<String>,

    #[arg(long = "label", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub labels: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct TargetedArgs {
    #[arg(long)]
    pub fqdn: String,

    #[arg(long, default_value = "A")]
    pub record_type: RecordType,

    /// Exact answer every variant must observe (keep the trailing dot for names)
    #[arg(long)]
    pub expect: String,

    /// Variant to run; defaults to every configured variant
    #[arg(long = "variant", value_name = "VARIANT")]
    pub variants: Vec<String>,
}

pub async fn probe(
    config: &Config,
    use_cases: &UseCases,
    args: &ProbeArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let ctx = ProbeContext::new(&config.cluster.namespace, &config.cluster.cluster_domain)?;
    let compilers = Compilers::new(config);

    let mut hosts = args.hosts.clone();
    if let (Some(hostname), Some(subdomain)) = (&args.hostname, &args.subdomain) {
        hosts.extend(HostAlias::pod_entries(hostname, subdomain, &ctx));
    }

    let batches = variants(&args.variants, &configured_variants(config))?
        .iter()
        .map(|variant| {
            compilers.presence.compile(
                &ctx,
                &args.names,
                &hosts,
                args.server_ip.as_deref(),
                variant,
            )
        })
        .collect::<Result<Vec<ProbeBatch>, _>>()?;

    let mut identity =
        SandboxIdentity::new(generate_sandbox_name(), config.cluster.namespace.clone());
    if let Some(hostname) = &args.hostname {
        identity = identity.with_hostname(hostname.clone());
    }
    if let Some(subdomain) = &args.subdomain {
        identity = identity.with_subdomain(subdomain.clone());
    }
    for (key, value) in &args.labels {
        identity = identity.with_label(key.clone(), value.clone());
    }

    let request = ProbeRequest::new(identity, batches, ValidationMode::Presence);
    let report = use_cases.run_and_validate.execute(request, cancel).await?;
    print_report(&report);
    Ok(())
}

pub async fn targeted(
    config: &Config,
    use_cases: &UseCases,
    args: &TargetedArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let compilers = Compilers::new(config);

    let batches = variants(&args.variants, &configured_variants(config))?
        .iter()
        .map(|variant| {
            compilers
                .targeted
                .compile(&args.fqdn, args.record_type, variant)
                .map(|probe| probe.into_batch())
        })
        .collect::<Result<Vec<ProbeBatch>, _>>()?;

    let identity = SandboxIdentity::new(generate_sandbox_name(), config.cluster.namespace.clone());
    let mode = ValidationMode::Targeted {
        expected: args.expect.clone(),
    };
    let report = use_cases
        .run_and_validate
        .execute(ProbeRequest::new(identity, batches, mode), cancel)
        .await?;
    print_report(&report);
    Ok(())
}

fn configured_variants(config: &Config) -> Vec<String> {
    config.sandbox.variants.iter().map(|v| v.name.clone()).collect()
}

fn print_report(report: &ValidationReport) {
    info!(checked = report.checked, "All artifacts validated");
    for (id, payload) in report.result.iter() {
        println!("{id}\t{}", payload.trim());
    }
}
