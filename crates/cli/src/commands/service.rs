use clap::{Args, Subcommand};
use dnsprobe_domain::{ServiceInfo, ServiceKind, ServiceSpec};

use super::{parse_key_value, to_map};
use crate::di::UseCases;

#[derive(Args, Debug)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub action: ServiceAction,
}

#[derive(Subcommand, Debug)]
pub enum ServiceAction {
    /// Create a headless service selecting the probe pods
    CreateHeadless {
        name: String,
        #[arg(long = "selector", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        selector: Vec<(String, String)>,
    },
    /// Create an external-name service
    CreateExternalName { name: String, target: String },
    /// Point an external-name service somewhere else
    Retarget { name: String, target: String },
    /// Turn a service into a ClusterIP service
    ToClusterIp {
        name: String,
        #[arg(long = "selector", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        selector: Vec<(String, String)>,
    },
    Get { name: String },
    Delete { name: String },
}

pub async fn service(use_cases: &UseCases, args: &ServiceArgs) -> anyhow::Result<()> {
    let services = &use_cases.manage_services;
    match &args.action {
        ServiceAction::CreateHeadless { name, selector } => {
            let info = services
                .create(&ServiceSpec::headless(name.clone(), to_map(selector)))
                .await?;
            print_service(&info);
        }
        ServiceAction::CreateExternalName { name, target } => {
            let info = services
                .create(&ServiceSpec::external_name(name.clone(), target.clone()))
                .await?;
            print_service(&info);
        }
        ServiceAction::Retarget { name, target } => {
            print_service(&services.retarget_external_name(name, target).await?);
        }
        ServiceAction::ToClusterIp { name, selector } => {
            print_service(&services.convert_to_cluster_ip(name, to_map(selector)).await?);
        }
        ServiceAction::Get { name } => print_service(&services.get(name).await?),
        ServiceAction::Delete { name } => {
            services.delete(name).await?;
            println!("{name} deleted");
        }
    }
    Ok(())
}

fn print_service(info: &ServiceInfo) {
    let detail = match &info.spec.kind {
        ServiceKind::Headless => "headless".to_string(),
        ServiceKind::ClusterIp => format!(
            "ClusterIP {}",
            info.cluster_ip.as_deref().unwrap_or("<pending>")
        ),
        ServiceKind::ExternalName(target) => format!("ExternalName {target}"),
    };
    println!("{}\t{}", info.spec.name, detail);
}
