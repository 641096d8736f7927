//! Configuration for dnsprobe
//!
//! All structures are organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `cluster`: API server access and naming context
//! - `poll`: Result polling cadence and deadline
//! - `compiler`: Probe script generation (presence and targeted)
//! - `sandbox`: Probe pod images and readiness wait
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cluster;
pub mod compiler;
pub mod errors;
pub mod logging;
pub mod poll;
pub mod root;
pub mod sandbox;

pub use cluster::ClusterConfig;
pub use compiler::{CompilerConfig, TargetedConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use poll::PollConfig;
pub use root::{CliOverrides, Config};
pub use sandbox::{SandboxConfig, VariantImage};
