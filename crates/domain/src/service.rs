use crate::validators::{validate_dns_name, validate_label};
use crate::ProbeError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    /// ClusterIP `None`: the name resolves straight to endpoint addresses.
    Headless,
    ClusterIp,
    /// Resolves as a CNAME to the target.
    ExternalName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePort {
    pub name: String,
    pub port: u16,
    pub protocol: String,
}

impl ServicePort {
    pub fn http() -> Self {
        Self {
            name: "http".to_string(),
            port: 80,
            protocol: "TCP".to_string(),
        }
    }
}

/// Named service whose resolvability is under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    pub kind: ServiceKind,
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePort>,
}

impl ServiceSpec {
    pub fn headless(name: impl Into<String>, selector: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            kind: ServiceKind::Headless,
            selector,
            ports: vec![ServicePort::http()],
        }
    }

    pub fn cluster_ip(name: impl Into<String>, selector: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            kind: ServiceKind::ClusterIp,
            selector,
            ports: vec![ServicePort::http()],
        }
    }

    pub fn external_name(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ServiceKind::ExternalName(target.into()),
            selector: BTreeMap::new(),
            ports: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        validate_label(&self.name, "Service name").map_err(ProbeError::Resource)?;
        if let ServiceKind::ExternalName(target) = &self.kind {
            validate_dns_name(target, "External name").map_err(ProbeError::Resource)?;
        }
        Ok(())
    }
}

/// A service as the cluster reports it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub spec: ServiceSpec,
    /// Assigned virtual IP; `None` for headless and external-name services.
    pub cluster_ip: Option<String>,
}
