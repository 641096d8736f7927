use dnsprobe_domain::config::TargetedConfig;
use dnsprobe_domain::{
    ExecutionVariant, NameQuery, ProbeArtifact, ProbeError, RecordType, TargetedProbe,
};
use std::sync::Arc;

/// Compiles a single typed query whose short answer is written verbatim.
///
/// The artifact is overwritten on every iteration, so a reader always sees
/// the latest answer. Poll it with an exact expectation when the record is
/// expected to change during the run.
pub struct TargetedProbeCompiler {
    iterations: u32,
    results_dir: Arc<str>,
}

impl TargetedProbeCompiler {
    pub fn new(config: &TargetedConfig, results_dir: &str) -> Self {
        Self {
            iterations: config.iterations,
            results_dir: Arc::from(results_dir),
        }
    }

    /// # Errors
    ///
    /// * `ProbeError::Compilation` - If `fqdn` is not a valid DNS name
    pub fn compile(
        &self,
        fqdn: &str,
        record_type: RecordType,
        variant: &ExecutionVariant,
    ) -> Result<TargetedProbe, ProbeError> {
        let query = NameQuery::parse(fqdn)?;
        let artifact = ProbeArtifact::targeted(variant.as_str(), query.clone(), record_type);

        let script = format!(
            "for i in `seq 1 {}`; do dig +short {} {} > {}/{}; sleep 1; done",
            self.iterations,
            query,
            record_type,
            self.results_dir,
            artifact.id
        );

        Ok(TargetedProbe {
            variant: variant.clone(),
            query,
            record_type,
            script,
            artifact,
        })
    }
}
