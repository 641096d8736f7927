use async_trait::async_trait;
use dnsprobe_domain::{ExecOutput, ExecTarget, ProbeError};

/// Runs a command inside a running container.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// # Errors
    ///
    /// * `ProbeError::Exec` - If the command could not be run or exited non-zero
    async fn exec(&self, target: &ExecTarget, command: &[String]) -> Result<ExecOutput, ProbeError>;
}
