use crate::context::ProbeContext;
use crate::validators::validate_dns_name;
use crate::{ProbeError, RecordType};
use std::fmt;
use std::sync::Arc;

/// A fully- or partially-qualified name to resolve inside the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameQuery(Arc<str>);

impl NameQuery {
    pub fn parse(name: &str) -> Result<Self, ProbeError> {
        validate_dns_name(name, "Query name").map_err(ProbeError::Compilation)?;
        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `_service._proto.name` style queries are answered with SRV records.
    pub fn default_record_type(&self) -> RecordType {
        if self.0.starts_with('_') {
            RecordType::SRV
        } else {
            RecordType::A
        }
    }
}

impl fmt::Display for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hosts-database entry to check: `alias` must resolve to a record whose
/// canonical hostname equals `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAlias {
    pub alias: Arc<str>,
    pub expected: Arc<str>,
}

impl HostAlias {
    pub fn new(alias: impl Into<Arc<str>>, expected: impl Into<Arc<str>>) -> Self {
        Self {
            alias: alias.into(),
            expected: expected.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        validate_dns_name(&self.alias, "Host alias").map_err(ProbeError::Compilation)?;
        validate_dns_name(&self.expected, "Expected hostname").map_err(ProbeError::Compilation)
    }

    /// `hostname.subdomain.namespace.svc.cluster-domain`
    pub fn pod_fqdn(hostname: &str, subdomain: &str, ctx: &ProbeContext) -> String {
        format!(
            "{}.{}.{}.svc.{}",
            hostname, subdomain, ctx.namespace, ctx.cluster_domain
        )
    }

    /// The two entries a pod with `hostname` and `subdomain` must have: its
    /// FQDN and its bare hostname, both canonicalising to the FQDN.
    pub fn pod_entries(hostname: &str, subdomain: &str, ctx: &ProbeContext) -> Vec<HostAlias> {
        let fqdn: Arc<str> = Arc::from(Self::pod_fqdn(hostname, subdomain, ctx));
        vec![
            HostAlias::new(Arc::clone(&fqdn), Arc::clone(&fqdn)),
            HostAlias::new(hostname, fqdn),
        ]
    }
}

impl From<&str> for HostAlias {
    fn from(name: &str) -> Self {
        let name: Arc<str> = Arc::from(name);
        Self::new(Arc::clone(&name), name)
    }
}

impl From<String> for HostAlias {
    fn from(name: String) -> Self {
        HostAlias::from(name.as_str())
    }
}
