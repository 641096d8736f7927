use serde::{Deserialize, Serialize};

/// API server access and the naming context probes run in
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusterConfig {
    /// Base URL of the API server (default: "http://127.0.0.1:8001", i.e. `kubectl proxy`)
    #[serde(default = "default_api_server")]
    pub api_server: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// File to read the bearer token from (e.g. a service account token)
    #[serde(default)]
    pub token_file: Option<String>,

    /// PEM bundle trusted for the API server certificate
    #[serde(default)]
    pub ca_file: Option<String>,

    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// Namespace sandboxes and services are created in (default: "default")
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Cluster DNS domain (default: "cluster.local")
    #[serde(default = "default_cluster_domain")]
    pub cluster_domain: String,

    /// Timeout for a single API request in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the `kubectl` binary used for exec (default: "kubectl")
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            api_server: default_api_server(),
            token: None,
            token_file: None,
            ca_file: None,
            insecure_skip_tls_verify: false,
            namespace: default_namespace(),
            cluster_domain: default_cluster_domain(),
            request_timeout_secs: default_request_timeout_secs(),
            kubectl: default_kubectl(),
        }
    }
}

fn default_api_server() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_cluster_domain() -> String {
    "cluster.local".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}
