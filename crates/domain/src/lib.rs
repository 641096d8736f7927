//! dnsprobe domain layer
pub mod artifact;
pub mod config;
pub mod context;
pub mod dns_config;
pub mod errors;
pub mod name_query;
pub mod poll_result;
pub mod probe_batch;
pub mod record_type;
pub mod sandbox;
pub mod service;
pub mod validators;

pub use artifact::{ArtifactKind, Expectation, ExpectationSet, LookupTransport, ProbeArtifact};
pub use config::{CliOverrides, Config, ConfigError};
pub use context::ProbeContext;
pub use dns_config::{DnsConfigExpectation, ExecOutput, ExecTarget, InjectedLookup};
pub use errors::{ArtifactMismatch, MismatchReason, PendingArtifact, ProbeError};
pub use name_query::{HostAlias, NameQuery};
pub use poll_result::PollResult;
pub use probe_batch::{ExecutionVariant, ProbeBatch, TargetedProbe};
pub use record_type::RecordType;
pub use sandbox::{SandboxHandle, SandboxIdentity, SandboxSpec, VariantScript};
pub use service::{ServiceInfo, ServiceKind, ServicePort, ServiceSpec};
