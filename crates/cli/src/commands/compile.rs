use clap::Args;
use dnsprobe_domain::{Config, ExecutionVariant, HostAlias, ProbeBatch, ProbeContext, RecordType};

use super::parse_host;
use crate::di::Compilers;

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Name to resolve; repeat for several
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Hosts-database entry to check
    #[arg(long = "host", value_name = "ALIAS[=CANONICAL]", value_parser = parse_host)]
    pub hosts: Vec<HostAlias>,

    /// Also check the PTR record of this IP
    #[arg(long)]
    pub server_ip: Option<String>,

    #[arg(long, default_value = ExecutionVariant::WHEEZY)]
    pub variant: String,
}

#[derive(Args, Debug)]
pub struct CompileTargetedArgs {
    #[arg(long)]
    pub fqdn: String,

    #[arg(long, default_value = "A")]
    pub record_type: RecordType,

    #[arg(long, default_value = ExecutionVariant::WHEEZY)]
    pub variant: String,
}

pub fn compile(config: &Config, args: &CompileArgs) -> anyhow::Result<()> {
    let ctx = ProbeContext::new(&config.cluster.namespace, &config.cluster.cluster_domain)?;
    let variant = ExecutionVariant::new(&args.variant)?;

    let batch = Compilers::new(config).presence.compile(
        &ctx,
        &args.names,
        &args.hosts,
        args.server_ip.as_deref(),
        &variant,
    )?;
    print_batch(&batch);
    Ok(())
}

pub fn compile_targeted(config: &Config, args: &CompileTargetedArgs) -> anyhow::Result<()> {
    let variant = ExecutionVariant::new(&args.variant)?;
    let probe = Compilers::new(config)
        .targeted
        .compile(&args.fqdn, args.record_type, &variant)?;
    print_batch(&probe.into_batch());
    Ok(())
}

fn print_batch(batch: &ProbeBatch) {
    println!("# {} ({} artifacts)", batch.variant, batch.artifacts.len());
    println!("{}", batch.script);
    for id in batch.artifact_ids() {
        println!("{id}");
    }
}
