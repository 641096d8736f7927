#![allow(dead_code)]

use async_trait::async_trait;
use dnsprobe_application::ports::{ArtifactPayloads, ArtifactSource, SandboxRuntime};
use dnsprobe_domain::{ProbeError, SandboxHandle, SandboxSpec};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::ManualClock;

// ============================================================================
// Mock sandbox: artifacts appear on a schedule driven by the manual clock
// ============================================================================

#[derive(Clone)]
struct ScheduledWrite {
    id: String,
    payload: String,
    at: Duration,
}

pub struct MockSandboxRuntime {
    clock: Arc<ManualClock>,
    schedule: Arc<RwLock<Vec<ScheduledWrite>>>,
    failing_fetches: Arc<RwLock<HashSet<u64>>>,
    fetch_count: Arc<AtomicU64>,
    fetch_requests: Arc<RwLock<Vec<Vec<String>>>>,
    created: Arc<RwLock<Vec<SandboxSpec>>>,
    deleted: Arc<RwLock<Vec<SandboxHandle>>>,
    create_should_fail: Arc<RwLock<bool>>,
    wait_should_fail: Arc<RwLock<bool>>,
    delete_should_fail: Arc<RwLock<bool>>,
}

impl MockSandboxRuntime {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            schedule: Arc::new(RwLock::new(Vec::new())),
            failing_fetches: Arc::new(RwLock::new(HashSet::new())),
            fetch_count: Arc::new(AtomicU64::new(0)),
            fetch_requests: Arc::new(RwLock::new(Vec::new())),
            created: Arc::new(RwLock::new(Vec::new())),
            deleted: Arc::new(RwLock::new(Vec::new())),
            create_should_fail: Arc::new(RwLock::new(false)),
            wait_should_fail: Arc::new(RwLock::new(false)),
            delete_should_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// The sandbox writes `payload` to `id` once `at_secs` have elapsed on
    /// the clock. Later writes to the same id replace earlier ones.
    pub async fn write_at(&self, id: &str, payload: &str, at_secs: u64) {
        self.schedule.write().await.push(ScheduledWrite {
            id: id.to_string(),
            payload: payload.to_string(),
            at: Duration::from_secs(at_secs),
        });
    }

    /// Makes the `n`th fetch (1-based) fail as a whole.
    pub async fn fail_fetch(&self, n: u64) {
        self.failing_fetches.write().await.insert(n);
    }

    pub async fn set_create_should_fail(&self, fail: bool) {
        *self.create_should_fail.write().await = fail;
    }

    pub async fn set_wait_should_fail(&self, fail: bool) {
        *self.wait_should_fail.write().await = fail;
    }

    pub async fn set_delete_should_fail(&self, fail: bool) {
        *self.delete_should_fail.write().await = fail;
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    pub async fn fetch_requests(&self) -> Vec<Vec<String>> {
        self.fetch_requests.read().await.clone()
    }

    pub async fn created(&self) -> Vec<SandboxSpec> {
        self.created.read().await.clone()
    }

    pub async fn deleted(&self) -> Vec<SandboxHandle> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl SandboxRuntime for MockSandboxRuntime {
    async fn create_sandbox(&self, spec: &SandboxSpec) -> Result<SandboxHandle, ProbeError> {
        if *self.create_should_fail.read().await {
            return Err(ProbeError::Deployment("admission webhook denied the pod".to_string()));
        }
        self.created.write().await.push(spec.clone());
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
        if *self.wait_should_fail.read().await {
            return Err(ProbeError::Deployment(format!(
                "Sandbox {} not running after {}s",
                handle,
                timeout.as_secs()
            )));
        }
        Ok(())
    }

    async fn delete_sandbox(&self, handle: &SandboxHandle) -> Result<(), ProbeError> {
        self.deleted.write().await.push(handle.clone());
        if *self.delete_should_fail.read().await {
            return Err(ProbeError::Resource("pod deletion refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactSource for MockSandboxRuntime {
    async fn fetch_artifacts(
        &self,
        _handle: &SandboxHandle,
        ids: &[String],
    ) -> Result<ArtifactPayloads, ProbeError> {
        let n = self.fetch_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.fetch_requests.write().await.push(ids.to_vec());

        if self.failing_fetches.read().await.contains(&n) {
            return Err(ProbeError::TransientFetch("connection reset by peer".to_string()));
        }

        let elapsed = self.clock.elapsed();
        let mut due: Vec<ScheduledWrite> = self
            .schedule
            .read()
            .await
            .iter()
            .filter(|w| w.at <= elapsed && ids.contains(&w.id))
            .cloned()
            .collect();
        due.sort_by_key(|w| w.at);

        let mut payloads = ArtifactPayloads::new();
        for write in due {
            payloads.insert(write.id, write.payload);
        }
        Ok(payloads)
    }
}

// ============================================================================
// Artifact source whose fetch never completes
// ============================================================================

pub struct StalledArtifactSource {
    fetch_count: Arc<AtomicU64>,
}

impl StalledArtifactSource {
    pub fn new() -> Self {
        Self {
            fetch_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ArtifactSource for StalledArtifactSource {
    async fn fetch_artifacts(
        &self,
        _handle: &SandboxHandle,
        _ids: &[String],
    ) -> Result<ArtifactPayloads, ProbeError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        std::future::pending().await
    }
}
