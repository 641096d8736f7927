use crate::artifact::{Expectation, ExpectationSet, ProbeArtifact};
use crate::validators::validate_label;
use crate::{NameQuery, ProbeError, RecordType};
use std::fmt;
use std::sync::Arc;

/// Resolver library flavour a script runs under. Each variant gets its own
/// container in the sandbox and its own artifact namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionVariant(Arc<str>);

impl ExecutionVariant {
    pub const WHEEZY: &'static str = "wheezy";
    pub const JESSIE: &'static str = "jessie";

    pub fn new(tag: &str) -> Result<Self, ProbeError> {
        validate_label(tag, "Execution variant").map_err(ProbeError::Compilation)?;
        Ok(Self(Arc::from(tag)))
    }

    pub fn wheezy() -> Self {
        Self(Arc::from(Self::WHEEZY))
    }

    pub fn jessie() -> Self {
        Self(Arc::from(Self::JESSIE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiled script for one variant plus the artifacts it will produce, in
/// compilation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeBatch {
    pub variant: ExecutionVariant,
    pub script: String,
    pub artifacts: Vec<ProbeArtifact>,
}

impl ProbeBatch {
    pub fn artifact_ids(&self) -> Vec<String> {
        self.artifacts.iter().map(|a| a.id.clone()).collect()
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        let ids = self.artifact_ids();
        (self.script, ids)
    }

    pub fn presence_expectations(&self) -> ExpectationSet {
        self.artifacts
            .iter()
            .map(|a| (a.id.clone(), a.presence_expectation()))
            .collect()
    }

    pub fn exact_expectations(&self, expected: &str) -> ExpectationSet {
        self.artifacts
            .iter()
            .map(|a| (a.id.clone(), Expectation::Exact(expected.to_string())))
            .collect()
    }
}

/// A single typed query whose answer is asserted exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedProbe {
    pub variant: ExecutionVariant,
    pub query: NameQuery,
    pub record_type: RecordType,
    pub script: String,
    pub artifact: ProbeArtifact,
}

impl TargetedProbe {
    pub fn artifact_id(&self) -> &str {
        &self.artifact.id
    }

    pub fn into_parts(self) -> (String, String) {
        (self.script, self.artifact.id)
    }

    /// View as a one-artifact batch so it can share the deploy/poll path.
    pub fn into_batch(self) -> ProbeBatch {
        ProbeBatch {
            variant: self.variant,
            script: self.script,
            artifacts: vec![self.artifact],
        }
    }
}
