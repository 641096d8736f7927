use dnsprobe_domain::{ProbeError, ServiceInfo, ServiceKind, ServiceSpec};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::ServiceRegistry;

/// Creates and reshapes the named services a probe resolves, scoped to one
/// namespace.
pub struct ManageServicesUseCase {
    registry: Arc<dyn ServiceRegistry>,
    namespace: String,
}

impl ManageServicesUseCase {
    pub fn new(registry: Arc<dyn ServiceRegistry>, namespace: impl Into<String>) -> Self {
        Self {
            registry,
            namespace: namespace.into(),
        }
    }

    #[instrument(skip(self, spec), fields(service = %spec.name))]
    pub async fn create(&self, spec: &ServiceSpec) -> Result<ServiceInfo, ProbeError> {
        spec.validate()?;
        let info = self.registry.create_service(&self.namespace, spec).await?;

        info!(
            namespace = %self.namespace,
            service = %info.spec.name,
            cluster_ip = ?info.cluster_ip,
            "Service created"
        );
        Ok(info)
    }

    pub async fn get(&self, name: &str) -> Result<ServiceInfo, ProbeError> {
        self.registry.get_service(&self.namespace, name).await
    }

    /// Points an external-name service at a new target.
    #[instrument(skip(self))]
    pub async fn retarget_external_name(
        &self,
        name: &str,
        target: &str,
    ) -> Result<ServiceInfo, ProbeError> {
        let probe = ServiceSpec::external_name(name, target);
        probe.validate()?;

        let mut mutate = |spec: &mut ServiceSpec| {
            spec.kind = ServiceKind::ExternalName(target.to_string());
        };
        let info = self
            .registry
            .update_service(&self.namespace, name, &mut mutate)
            .await?;

        info!(service = %name, target = %target, "External name updated");
        Ok(info)
    }

    /// Turns a service into a ClusterIP service with an HTTP port selecting
    /// `selector`.
    #[instrument(skip(self, selector))]
    pub async fn convert_to_cluster_ip(
        &self,
        name: &str,
        selector: BTreeMap<String, String>,
    ) -> Result<ServiceInfo, ProbeError> {
        let template = ServiceSpec::cluster_ip(name, selector);
        let mut mutate = |spec: &mut ServiceSpec| {
            spec.kind = ServiceKind::ClusterIp;
            spec.selector = template.selector.clone();
            spec.ports = template.ports.clone();
        };
        let info = self
            .registry
            .update_service(&self.namespace, name, &mut mutate)
            .await?;

        if info.cluster_ip.is_none() {
            return Err(ProbeError::Resource(format!(
                "Service {} has no cluster IP after conversion",
                name
            )));
        }

        info!(service = %name, cluster_ip = ?info.cluster_ip, "Service converted to ClusterIP");
        Ok(info)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ProbeError> {
        self.registry.delete_service(&self.namespace, name).await?;
        info!(namespace = %self.namespace, service = %name, "Service deleted");
        Ok(())
    }
}
