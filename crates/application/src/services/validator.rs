use dnsprobe_domain::{
    ArtifactMismatch, Expectation, ExpectationSet, PollResult, ProbeBatch, ProbeError,
};
use tracing::{debug, warn};

/// How observed artifacts are judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every lookup resolved; host aliases canonicalise to their expected
    /// FQDN.
    Presence,
    /// Every artifact holds exactly `expected` (trailing root dot included).
    Targeted { expected: String },
}

impl ValidationMode {
    pub fn expectations_for(&self, batches: &[ProbeBatch]) -> ExpectationSet {
        let mut set = ExpectationSet::new();
        for batch in batches {
            let per_batch = match self {
                ValidationMode::Presence => batch.presence_expectations(),
                ValidationMode::Targeted { expected } => batch.exact_expectations(expected),
            };
            for (id, expectation) in per_batch.iter() {
                set.insert(id, expectation.clone());
            }
        }
        set
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub checked: usize,
    pub result: PollResult,
}

pub struct ProbeValidator;

impl ProbeValidator {
    /// Checks every expected artifact and reports all mismatches at once.
    ///
    /// # Errors
    ///
    /// * `ProbeError::Validation` - One entry per artifact that is missing,
    ///   empty, or holds a different value
    pub fn validate(
        expectations: &ExpectationSet,
        observed: &PollResult,
    ) -> Result<usize, ProbeError> {
        let mut mismatches = Vec::new();

        for (id, expectation) in expectations.iter() {
            let Some(payload) = observed.get(id) else {
                mismatches.push(ArtifactMismatch::missing(id));
                continue;
            };
            let trimmed = payload.trim();
            if trimmed.is_empty() {
                mismatches.push(ArtifactMismatch::empty(id));
                continue;
            }
            if let Expectation::Exact(expected) = expectation {
                if trimmed != expected.trim() {
                    mismatches.push(ArtifactMismatch::mismatch(id, expected.trim(), trimmed));
                }
            }
        }

        if mismatches.is_empty() {
            debug!(checked = expectations.len(), "Validation passed");
            Ok(expectations.len())
        } else {
            warn!(
                checked = expectations.len(),
                failed = mismatches.len(),
                "Validation failed"
            );
            Err(ProbeError::Validation(mismatches))
        }
    }
}
