mod deploy_sandbox;
mod run_and_validate;

pub use deploy_sandbox::{generate_sandbox_name, DeploySandboxUseCase};
pub use run_and_validate::{ProbeRequest, RunAndValidateUseCase};
