use async_trait::async_trait;
use dnsprobe_domain::{ProbeError, SandboxHandle, SandboxSpec};
use std::collections::HashMap;
use std::time::Duration;

/// Artifact identifier → raw file content, for the artifacts that exist.
pub type ArtifactPayloads = HashMap<String, String>;

/// Lifecycle of the disposable probe sandbox.
#[async_trait]
pub trait SandboxRuntime: Send + Sync {
    /// Submits the sandbox.
    ///
    /// # Errors
    ///
    /// * `ProbeError::Deployment` - If the cluster rejects the sandbox
    async fn create_sandbox(&self, spec: &SandboxSpec) -> Result<SandboxHandle, ProbeError>;

    /// Blocks until the sandbox is running and its artifacts are reachable.
    ///
    /// # Errors
    ///
    /// * `ProbeError::Deployment` - If `timeout` elapses first or the sandbox
    ///   terminates before it ever runs
    async fn wait_until_running(
        &self,
        handle: &SandboxHandle,
        timeout: Duration,
    ) -> Result<(), ProbeError>;

    async fn delete_sandbox(&self, handle: &SandboxHandle) -> Result<(), ProbeError>;
}

/// Side channel the sandbox exposes its artifacts through.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Reads the current content of every artifact in `ids` in one batched
    /// call. Artifacts that do not exist yet are simply absent from the map.
    ///
    /// # Errors
    ///
    /// * `ProbeError::TransientFetch` - If the side channel could not be read
    ///   at all; callers retry on the next tick
    async fn fetch_artifacts(
        &self,
        handle: &SandboxHandle,
        ids: &[String],
    ) -> Result<ArtifactPayloads, ProbeError>;
}
