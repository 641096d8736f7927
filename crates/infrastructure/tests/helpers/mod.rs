#![allow(dead_code, unused_imports)]

mod local_shell;
mod mock_api_server;

pub use local_shell::{LocalShellExecutor, ResultsDir};
pub use mock_api_server::MockApiServer;

use dnsprobe_domain::config::ClusterConfig;
use std::net::SocketAddr;

pub fn cluster_config(addr: SocketAddr) -> ClusterConfig {
    ClusterConfig {
        api_server: format!("http://{}", addr),
        token: Some("test-token".to_string()),
        request_timeout_secs: 5,
        ..ClusterConfig::default()
    }
}
