use crate::validators::{validate_label, validate_subdomain};
use crate::ProbeError;
use std::sync::Arc;

/// Batch-scoped naming context shared by the compilers and the deployer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeContext {
    pub namespace: Arc<str>,
    pub cluster_domain: Arc<str>,
}

impl ProbeContext {
    pub fn new(namespace: &str, cluster_domain: &str) -> Result<Self, ProbeError> {
        validate_label(namespace, "Namespace").map_err(ProbeError::Compilation)?;
        let cluster_domain = cluster_domain.strip_suffix('.').unwrap_or(cluster_domain);
        validate_subdomain(cluster_domain, "Cluster domain").map_err(ProbeError::Compilation)?;
        Ok(Self {
            namespace: Arc::from(namespace),
            cluster_domain: Arc::from(cluster_domain),
        })
    }

    /// `service.namespace.svc.cluster-domain`
    pub fn service_fqdn(&self, service: &str) -> String {
        format!("{}.{}.svc.{}", service, self.namespace, self.cluster_domain)
    }
}
