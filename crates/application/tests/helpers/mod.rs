#![allow(dead_code, unused_imports)]

mod mock_clock;
mod mock_executor;
mod mock_registry;
mod mock_sandbox;

pub use mock_clock::*;
pub use mock_executor::*;
pub use mock_registry::*;
pub use mock_sandbox::*;

use dnsprobe_domain::config::PollConfig;
use dnsprobe_domain::ProbeContext;
use std::time::Duration;

pub fn test_context() -> ProbeContext {
    ProbeContext::new("dns-4821", "cluster.local").unwrap()
}

pub fn poll_config(interval_secs: u64, timeout_secs: u64) -> PollConfig {
    PollConfig::new(
        Duration::from_secs(interval_secs),
        Duration::from_secs(timeout_secs),
    )
}
