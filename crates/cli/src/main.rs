//! # dnsprobe
//!
//! Compiles DNS probe scripts, runs them in a throwaway pod and validates what
//! each resolver variant observed.

mod bootstrap;
mod commands;
mod di;

use clap::{Parser, Subcommand};
use dnsprobe_domain::{CliOverrides, Config};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bootstrap::{init_logging, load_config};
use commands::compile::{CompileArgs, CompileTargetedArgs};
use commands::dns_config::VerifyDnsConfigArgs;
use commands::probe::{ProbeArgs, TargetedArgs};
use commands::service::ServiceArgs;
use di::UseCases;

#[derive(Parser)]
#[command(name = "dnsprobe")]
#[command(version)]
#[command(about = "Probe and validate cluster DNS from inside a disposable pod")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    namespace: Option<String>,

    #[arg(long, global = true)]
    cluster_domain: Option<String>,

    /// Kubernetes API server, e.g. http://127.0.0.1:8001 behind `kubectl proxy`
    #[arg(long, global = true)]
    api_server: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the presence script and artifact IDs for one variant
    Compile(CompileArgs),
    /// Print a single-record probe script and its artifact ID
    CompileTargeted(CompileTargetedArgs),
    /// Run a presence probe in a new sandbox pod
    Probe(ProbeArgs),
    /// Run a single-record probe and compare every variant's answer
    Targeted(TargetedArgs),
    /// Check the resolver configuration seen inside an existing pod
    VerifyDnsConfig(VerifyDnsConfigArgs),
    /// Manage the services probes resolve
    Service(ServiceArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(
        cli.config.as_deref(),
        CliOverrides {
            namespace: cli.namespace,
            cluster_domain: cli.cluster_domain,
            api_server: cli.api_server,
            log_level: cli.log_level,
        },
    )?;
    init_logging(&config);
    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        namespace = %config.cluster.namespace,
        api_server = %config.cluster.api_server,
        "Configuration loaded"
    );

    match cli.command {
        Command::Compile(args) => commands::compile::compile(&config, &args),
        Command::CompileTargeted(args) => commands::compile::compile_targeted(&config, &args),
        command => run_against_cluster(&config, command).await,
    }
}

async fn run_against_cluster(config: &Config, command: Command) -> anyhow::Result<()> {
    let use_cases = UseCases::new(config)?;
    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    match command {
        Command::Probe(args) => commands::probe::probe(config, &use_cases, &args, &cancel).await,
        Command::Targeted(args) => {
            commands::probe::targeted(config, &use_cases, &args, &cancel).await
        }
        Command::VerifyDnsConfig(args) => {
            commands::dns_config::verify_dns_config(config, &use_cases, &args, &cancel).await
        }
        Command::Service(args) => commands::service::service(&use_cases, &args).await,
        Command::Compile(_) | Command::CompileTargeted(_) => Ok(()),
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling probe run");
            cancel.cancel();
        }
    });
}
