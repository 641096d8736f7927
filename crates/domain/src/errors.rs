use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Invalid probe input: {0}")]
    Compilation(String),

    #[error("Sandbox deployment failed: {0}")]
    Deployment(String),

    #[error("Artifact fetch failed: {0}")]
    TransientFetch(String),

    #[error(
        "Timed out after {}s with {} artifact(s) still pending: {}",
        .elapsed.as_secs(),
        .pending.len(),
        join_display(.pending)
    )]
    Timeout {
        pending: Vec<PendingArtifact>,
        elapsed: Duration,
    },

    #[error("Validation failed for {} artifact(s): {}", .0.len(), join_display(.0))]
    Validation(Vec<ArtifactMismatch>),

    #[error("Cluster resource error: {0}")]
    Resource(String),

    #[error("Command execution failed: {0}")]
    Exec(String),

    #[error(
        "Polling cancelled with {} artifact(s) pending and {satisfied} satisfied",
        .pending.len()
    )]
    Cancelled { pending: Vec<String>, satisfied: usize },

    #[error("DNS configuration checks failed: {}", .0.join("; "))]
    DnsConfig(Vec<String>),
}

impl ProbeError {
    /// Only fetch failures are retried by the poller; everything else is fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::TransientFetch(_))
    }

    /// Artifact identifiers named by this error, for diagnostics.
    pub fn artifact_ids(&self) -> Vec<&str> {
        match self {
            ProbeError::Timeout { pending, .. } => pending.iter().map(|p| p.id.as_str()).collect(),
            ProbeError::Validation(mismatches) => {
                mismatches.iter().map(|m| m.artifact.as_str()).collect()
            }
            ProbeError::Cancelled { pending, .. } => pending.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// An artifact that never reached an accepted state before the deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingArtifact {
    pub id: String,
    /// Last payload seen that was not accepted (e.g. a stale CNAME target).
    pub last_observed: Option<String>,
}

impl fmt::Display for PendingArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_observed {
            Some(observed) => write!(f, "{} (last saw '{}')", self.id, observed),
            None => write!(f, "{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    Missing,
    Empty,
    Mismatch { expected: String, observed: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMismatch {
    pub artifact: String,
    pub reason: MismatchReason,
}

impl ArtifactMismatch {
    pub fn missing(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            reason: MismatchReason::Missing,
        }
    }

    pub fn empty(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            reason: MismatchReason::Empty,
        }
    }

    pub fn mismatch(
        artifact: impl Into<String>,
        expected: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        Self {
            artifact: artifact.into(),
            reason: MismatchReason::Mismatch {
                expected: expected.into(),
                observed: observed.into(),
            },
        }
    }
}

impl fmt::Display for ArtifactMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MismatchReason::Missing => write!(f, "{} was never produced", self.artifact),
            MismatchReason::Empty => write!(f, "{} is empty", self.artifact),
            MismatchReason::Mismatch { expected, observed } => write!(
                f,
                "{} contains '{}' instead of '{}'",
                self.artifact, observed, expected
            ),
        }
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
