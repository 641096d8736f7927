use async_trait::async_trait;
use dnsprobe_domain::{ProbeError, ServiceInfo, ServiceSpec};

/// Named services whose resolvability is under test.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn create_service(
        &self,
        namespace: &str,
        spec: &ServiceSpec,
    ) -> Result<ServiceInfo, ProbeError>;

    async fn get_service(&self, namespace: &str, name: &str) -> Result<ServiceInfo, ProbeError>;

    /// Reads the service, applies `mutate` and writes it back. Implementations
    /// may call `mutate` more than once when they retry on write conflicts.
    async fn update_service(
        &self,
        namespace: &str,
        name: &str,
        mutate: &mut (dyn for<'s> FnMut(&'s mut ServiceSpec) + Send),
    ) -> Result<ServiceInfo, ProbeError>;

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ProbeError>;
}
