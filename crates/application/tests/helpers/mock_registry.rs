#![allow(dead_code)]

use async_trait::async_trait;
use dnsprobe_application::ports::ServiceRegistry;
use dnsprobe_domain::{ProbeError, ServiceInfo, ServiceKind, ServiceSpec};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock ServiceRegistry
// ============================================================================

pub struct MockServiceRegistry {
    services: Arc<RwLock<HashMap<(String, String), ServiceInfo>>>,
    next_ip: Arc<AtomicU64>,
    update_count: Arc<AtomicU64>,
}

impl MockServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
            next_ip: Arc::new(AtomicU64::new(10)),
            update_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn update_count(&self) -> u64 {
        self.update_count.load(Ordering::Relaxed)
    }

    pub async fn count(&self) -> usize {
        self.services.read().await.len()
    }

    fn assign_ip(&self, spec: &ServiceSpec) -> Option<String> {
        match spec.kind {
            ServiceKind::ClusterIp => Some(format!(
                "10.96.0.{}",
                self.next_ip.fetch_add(1, Ordering::Relaxed)
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl ServiceRegistry for MockServiceRegistry {
    async fn create_service(
        &self,
        namespace: &str,
        spec: &ServiceSpec,
    ) -> Result<ServiceInfo, ProbeError> {
        let key = (namespace.to_string(), spec.name.clone());
        let mut services = self.services.write().await;
        if services.contains_key(&key) {
            return Err(ProbeError::Resource(format!(
                "services \"{}\" already exists",
                spec.name
            )));
        }
        let info = ServiceInfo {
            spec: spec.clone(),
            cluster_ip: self.assign_ip(spec),
        };
        services.insert(key, info.clone());
        Ok(info)
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<ServiceInfo, ProbeError> {
        self.services
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProbeError::Resource(format!("services \"{}\" not found", name)))
    }

    async fn update_service(
        &self,
        namespace: &str,
        name: &str,
        mutate: &mut (dyn for<'s> FnMut(&'s mut ServiceSpec) + Send),
    ) -> Result<ServiceInfo, ProbeError> {
        self.update_count.fetch_add(1, Ordering::Relaxed);
        let key = (namespace.to_string(), name.to_string());
        let mut services = self.services.write().await;
        let current = services
            .get(&key)
            .cloned()
            .ok_or_else(|| ProbeError::Resource(format!("services \"{}\" not found", name)))?;

        let mut spec = current.spec;
        mutate(&mut spec);
        let cluster_ip = match (&spec.kind, current.cluster_ip) {
            (ServiceKind::ClusterIp, Some(ip)) => Some(ip),
            (ServiceKind::ClusterIp, None) => self.assign_ip(&spec),
            _ => None,
        };
        let info = ServiceInfo { spec, cluster_ip };
        services.insert(key, info.clone());
        Ok(info)
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ProbeError> {
        self.services
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ProbeError::Resource(format!("services \"{}\" not found", name)))
    }
}
