use async_trait::async_trait;
use dnsprobe_application::ports::SandboxRuntime;
use dnsprobe_domain::config::SandboxConfig;
use dnsprobe_domain::{ProbeError, SandboxHandle, SandboxSpec};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{KubeApiClient, PodManifestBuilder};

/// Runs probe sandboxes as Pods. Artifacts are read separately by
/// [`super::ExecArtifactSource`].
pub struct PodSandboxRuntime {
    client: Arc<KubeApiClient>,
    manifest: PodManifestBuilder,
    ready_poll_interval: Duration,
}

impl PodSandboxRuntime {
    pub fn new(client: Arc<KubeApiClient>, config: SandboxConfig) -> Self {
        Self {
            client,
            ready_poll_interval: config.ready_poll_interval(),
            manifest: PodManifestBuilder::new(config),
        }
    }

    fn pod_path(namespace: &str, name: Option<&str>) -> Vec<String> {
        let mut path = vec![
            "api".to_string(),
            "v1".to_string(),
            "namespaces".to_string(),
            namespace.to_string(),
            "pods".to_string(),
        ];
        if let Some(name) = name {
            path.push(name.to_string());
        }
        path
    }

    async fn pod_phase(&self, handle: &SandboxHandle) -> Result<Option<String>, String> {
        let url = self
            .client
            .url(&Self::pod_path(&handle.namespace, Some(&handle.name)))?;
        let response = self.client.get(url).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(format!("HTTP {}: {}", response.status.as_u16(), response.message()));
        }
        let pod: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| format!("Invalid pod JSON: {}", e))?;
        Ok(pod["status"]["phase"].as_str().map(str::to_string))
    }
}

#[async_trait]
impl SandboxRuntime for PodSandboxRuntime {
    async fn create_sandbox(&self, spec: &SandboxSpec) -> Result<SandboxHandle, ProbeError> {
        let manifest = self.manifest.build(spec)?;
        let url = self
            .client
            .url(&Self::pod_path(&spec.identity.namespace, None))
            .map_err(ProbeError::Deployment)?;

        let response = self
            .client
            .send(Method::POST, url, Some(&manifest))
            .await
            .map_err(ProbeError::Deployment)?;
        if !response.is_success() {
            return Err(ProbeError::Deployment(format!(
                "Pod {} rejected (HTTP {}): {}",
                spec.identity.name,
                response.status.as_u16(),
                response.message()
            )));
        }

        Ok(SandboxHandle::new(
            spec.identity.name.clone(),
            spec.identity.namespace.clone(),
        ))
    }

    async fn wait_until_running(
        &self,
        handle: &SandboxHandle,
        timeout: Duration,
    ) -> Result<(), ProbeError> {
        let deadline = Instant::now() + timeout;
        let mut last_phase = None;

        loop {
            match self.pod_phase(handle).await {
                Ok(Some(phase)) if phase == "Running" => {
                    debug!(sandbox = %handle, "Pod running");
                    return Ok(());
                }
                Ok(Some(phase)) if phase == "Failed" || phase == "Succeeded" => {
                    return Err(ProbeError::Deployment(format!(
                        "Pod {} terminated ({}) before it could be probed",
                        handle, phase
                    )));
                }
                Ok(phase) => last_phase = phase,
                Err(e) => warn!(sandbox = %handle, error = %e, "Pod status check failed"),
            }

            if Instant::now() >= deadline {
                return Err(ProbeError::Deployment(format!(
                    "Pod {} not running after {}s (last phase: {})",
                    handle,
                    timeout.as_secs(),
                    last_phase.as_deref().unwrap_or("unknown")
                )));
            }
            tokio::time::sleep(self.ready_poll_interval).await;
        }
    }

    async fn delete_sandbox(&self, handle: &SandboxHandle) -> Result<(), ProbeError> {
        let mut url = self
            .client
            .url(&Self::pod_path(&handle.namespace, Some(&handle.name)))
            .map_err(ProbeError::Resource)?;
        url.query_pairs_mut().append_pair("gracePeriodSeconds", "0");

        let response = self
            .client
            .send(Method::DELETE, url, None)
            .await
            .map_err(ProbeError::Resource)?;
        if !response.is_success() && response.status != StatusCode::NOT_FOUND {
            return Err(ProbeError::Resource(format!(
                "Failed to delete pod {} (HTTP {}): {}",
                handle,
                response.status.as_u16(),
                response.message()
            )));
        }

        info!(sandbox = %handle, "Pod deleted");
        Ok(())
    }
}
