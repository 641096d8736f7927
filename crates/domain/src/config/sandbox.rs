use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Container image a variant's script runs in
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct VariantImage {
    pub name: String,
    pub image: String,
}

/// Probe pod shape and readiness wait
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SandboxConfig {
    /// Seconds to wait for the sandbox to reach Running (default: 300)
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,

    /// Seconds between two readiness checks (default: 2)
    #[serde(default = "default_ready_poll_interval_secs")]
    pub ready_poll_interval_secs: u64,

    /// Image serving the results directory over HTTP on port 80
    #[serde(default = "default_webserver_image")]
    pub webserver_image: String,

    #[serde(default = "default_webserver_args")]
    pub webserver_args: Vec<String>,

    /// Directory shared by the querier containers and the webserver;
    /// artifacts are written and served from here (default: "/results")
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    #[serde(default = "default_variants")]
    pub variants: Vec<VariantImage>,
}

impl SandboxConfig {
    pub fn start_timeout(&self) -> Duration {
        Duration::from_secs(self.start_timeout_secs)
    }

    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_secs(self.ready_poll_interval_secs)
    }

    pub fn image_for(&self, variant: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.name == variant)
            .map(|v| v.image.as_str())
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            start_timeout_secs: default_start_timeout_secs(),
            ready_poll_interval_secs: default_ready_poll_interval_secs(),
            webserver_image: default_webserver_image(),
            webserver_args: default_webserver_args(),
            results_dir: default_results_dir(),
            variants: default_variants(),
        }
    }
}

fn default_start_timeout_secs() -> u64 {
    300
}

fn default_ready_poll_interval_secs() -> u64 {
    2
}

fn default_webserver_image() -> String {
    "registry.k8s.io/e2e-test-images/agnhost:2.39".to_string()
}

fn default_webserver_args() -> Vec<String> {
    vec!["test-webserver".to_string()]
}

fn default_results_dir() -> String {
    "/results".to_string()
}

fn default_variants() -> Vec<VariantImage> {
    vec![
        VariantImage {
            name: "wheezy".to_string(),
            image: "registry.k8s.io/e2e-test-images/agnhost:2.39".to_string(),
        },
        VariantImage {
            name: "jessie".to_string(),
            image: "registry.k8s.io/e2e-test-images/jessie-dnsutils:1.5".to_string(),
        },
    ]
}
