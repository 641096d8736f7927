use clap::Args;
use dnsprobe_domain::{Config, DnsConfigExpectation, ExecTarget, InjectedLookup};
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;

use crate::di::UseCases;

#[derive(Args, Debug)]
pub struct VerifyDnsConfigArgs {
    /// Pod running with `dnsPolicy: None` and a custom DNS config
    #[arg(long)]
    pub pod: String,

    #[arg(long, default_value = "agnhost-container")]
    pub container: String,

    #[arg(long)]
    pub search_path: String,

    #[arg(long)]
    pub nameserver: IpAddr,

    #[arg(long)]
    pub ndots: Option<u8>,

    /// Unqualified name the custom nameserver answers for
    #[arg(long, requires = "expect_ip")]
    pub lookup: Option<String>,

    #[arg(long, requires = "lookup")]
    pub expect_ip: Option<IpAddr>,
}

impl VerifyDnsConfigArgs {
    fn expectation(&self) -> DnsConfigExpectation {
        let lookup = match (&self.lookup, self.expect_ip) {
            (Some(short_name), Some(expected_ip)) => Some(InjectedLookup {
                short_name: short_name.clone(),
                expected_ip,
            }),
            _ => None,
        };
        DnsConfigExpectation {
            search_path: self.search_path.clone(),
            nameserver: self.nameserver,
            ndots: self.ndots,
            lookup,
        }
    }
}

pub async fn verify_dns_config(
    config: &Config,
    use_cases: &UseCases,
    args: &VerifyDnsConfigArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let target = ExecTarget::new(
        config.cluster.namespace.clone(),
        args.pod.clone(),
        args.container.clone(),
    );
    use_cases
        .verify_dns_config
        .execute(&target, &args.expectation(), cancel)
        .await?;
    println!("{}: DNS config verified", args.pod);
    Ok(())
}
