pub mod dns_config;
pub mod probes;
pub mod services;

pub use dns_config::VerifyDnsConfigUseCase;
pub use probes::{generate_sandbox_name, DeploySandboxUseCase, ProbeRequest, RunAndValidateUseCase};
pub use services::ManageServicesUseCase;
