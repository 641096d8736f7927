use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result polling cadence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    /// Seconds between two fetches of the pending artifacts (default: 5)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Overall deadline in seconds before pending artifacts are reported
    /// as failures (default: 600)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PollConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval_secs: interval.as_secs(),
            timeout_secs: timeout.as_secs(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    600
}
