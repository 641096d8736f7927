use crate::LookupTransport;
use serde::{Deserialize, Serialize};

/// Presence probe script generation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Transports every name is looked up over (default: ["udp"])
    /// The full conformance profile uses ["udp", "tcp"]
    #[serde(default = "default_transports")]
    pub transports: Vec<LookupTransport>,

    /// Also resolve the pod's own `a-b-c-d.<namespace>.pod.<domain>` record
    #[serde(default)]
    pub include_pod_a_record: bool,

    /// Number of one-second rounds the script loops for (default: 600)
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            transports: default_transports(),
            include_pod_a_record: false,
            iterations: default_iterations(),
        }
    }
}

/// Targeted (single typed query) probe generation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetedConfig {
    /// Number of one-second rounds the query is repeated (default: 30)
    #[serde(default = "default_targeted_iterations")]
    pub iterations: u32,

    /// Keep polling until the artifact holds the expected value instead of
    /// settling on the first non-empty answer (default: true)
    #[serde(default = "default_wait_for_expected")]
    pub wait_for_expected: bool,
}

impl Default for TargetedConfig {
    fn default() -> Self {
        Self {
            iterations: default_targeted_iterations(),
            wait_for_expected: default_wait_for_expected(),
        }
    }
}

fn default_transports() -> Vec<LookupTransport> {
    vec![LookupTransport::Udp]
}

fn default_iterations() -> u32 {
    600
}

fn default_targeted_iterations() -> u32 {
    30
}

fn default_wait_for_expected() -> bool {
    true
}
