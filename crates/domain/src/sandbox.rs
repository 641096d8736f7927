use crate::validators::{validate_label, validate_subdomain};
use crate::{ExecutionVariant, ProbeBatch, ProbeError};
use std::collections::BTreeMap;
use std::fmt;

/// Who the sandbox is: pod name, placement and the DNS identity it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxIdentity {
    pub name: String,
    pub namespace: String,
    pub hostname: Option<String>,
    pub subdomain: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl SandboxIdentity {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            hostname: None,
            subdomain: None,
            labels: BTreeMap::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        validate_subdomain(&self.name, "Sandbox name").map_err(ProbeError::Deployment)?;
        validate_label(&self.namespace, "Namespace").map_err(ProbeError::Deployment)?;
        if let Some(hostname) = &self.hostname {
            validate_label(hostname, "Hostname").map_err(ProbeError::Deployment)?;
        }
        if let Some(subdomain) = &self.subdomain {
            validate_label(subdomain, "Subdomain").map_err(ProbeError::Deployment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantScript {
    pub variant: ExecutionVariant,
    pub script: String,
}

/// Everything needed to create a probe sandbox: one script per variant, all
/// writing into a shared results directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSpec {
    pub identity: SandboxIdentity,
    pub scripts: Vec<VariantScript>,
}

impl SandboxSpec {
    pub fn from_batches(
        identity: SandboxIdentity,
        batches: &[ProbeBatch],
    ) -> Result<Self, ProbeError> {
        if batches.is_empty() {
            return Err(ProbeError::Compilation(
                "A sandbox needs at least one probe script".to_string(),
            ));
        }
        let mut scripts: Vec<VariantScript> = Vec::with_capacity(batches.len());
        for batch in batches {
            if scripts.iter().any(|s| s.variant == batch.variant) {
                return Err(ProbeError::Compilation(format!(
                    "Variant '{}' appears more than once in one sandbox",
                    batch.variant
                )));
            }
            scripts.push(VariantScript {
                variant: batch.variant.clone(),
                script: batch.script.clone(),
            });
        }
        Ok(Self { identity, scripts })
    }
}

/// Reference to a created sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SandboxHandle {
    pub name: String,
    pub namespace: String,
}

impl SandboxHandle {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for SandboxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
