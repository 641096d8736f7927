use dnsprobe_domain::{ProbeError, SandboxHandle, SandboxSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::ports::SandboxRuntime;

/// Fresh sandbox name, unique enough for concurrent runs in one namespace.
pub fn generate_sandbox_name() -> String {
    format!("dns-test-{:016x}", fastrand::u64(..))
}

/// Creates the sandbox and waits until it is running.
pub struct DeploySandboxUseCase {
    runtime: Arc<dyn SandboxRuntime>,
    start_timeout: Duration,
}

impl DeploySandboxUseCase {
    pub fn new(runtime: Arc<dyn SandboxRuntime>, start_timeout: Duration) -> Self {
        Self {
            runtime,
            start_timeout,
        }
    }

    /// A sandbox that never starts is deleted before the error is returned;
    /// there is no partial credit for a half-started batch.
    #[instrument(skip(self, spec), fields(sandbox = %spec.identity.name))]
    pub async fn execute(&self, spec: &SandboxSpec) -> Result<SandboxHandle, ProbeError> {
        spec.identity.validate()?;

        let handle = self.runtime.create_sandbox(spec).await?;
        info!(
            sandbox = %handle,
            variants = spec.scripts.len(),
            "Sandbox created"
        );

        if let Err(e) = self
            .runtime
            .wait_until_running(&handle, self.start_timeout)
            .await
        {
            if let Err(cleanup) = self.runtime.delete_sandbox(&handle).await {
                warn!(
                    sandbox = %handle,
                    error = %cleanup,
                    "Failed to delete sandbox that never started"
                );
            }
            return Err(match e {
                ProbeError::Deployment(_) => e,
                other => ProbeError::Deployment(format!(
                    "Sandbox {} did not start: {}",
                    handle, other
                )),
            });
        }

        info!(sandbox = %handle, "Sandbox running");
        Ok(handle)
    }
}
