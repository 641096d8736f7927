use dnsprobe_domain::config::PollConfig;
use dnsprobe_domain::{
    Expectation, ExpectationSet, ProbeBatch, ProbeError, SandboxHandle, SandboxIdentity,
    SandboxSpec,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::DeploySandboxUseCase;
use crate::ports::{ArtifactSource, Clock, SandboxRuntime};
use crate::services::probe_compiler::ensure_unique;
use crate::services::{ProbeValidator, ResultPoller, ValidationMode, ValidationReport};

/// One probe run: the sandbox to create, the compiled batches it runs (one per
/// variant) and how their artifacts are judged.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub identity: SandboxIdentity,
    pub batches: Vec<ProbeBatch>,
    pub mode: ValidationMode,
}

impl ProbeRequest {
    pub fn new(identity: SandboxIdentity, batches: Vec<ProbeBatch>, mode: ValidationMode) -> Self {
        Self {
            identity,
            batches,
            mode,
        }
    }
}

/// Deploys a sandbox, polls its artifacts, validates them and tears the
/// sandbox down again.
pub struct RunAndValidateUseCase {
    runtime: Arc<dyn SandboxRuntime>,
    deployer: DeploySandboxUseCase,
    poller: ResultPoller,
    wait_for_expected: bool,
}

impl RunAndValidateUseCase {
    pub fn new(
        runtime: Arc<dyn SandboxRuntime>,
        source: Arc<dyn ArtifactSource>,
        clock: Arc<dyn Clock>,
        poll: &PollConfig,
        start_timeout: Duration,
    ) -> Self {
        Self {
            deployer: DeploySandboxUseCase::new(runtime.clone(), start_timeout),
            poller: ResultPoller::new(source, clock, poll),
            runtime,
            wait_for_expected: true,
        }
    }

    /// When set, targeted runs keep polling until the artifact holds the
    /// expected value instead of stopping at the first answer.
    pub fn with_wait_for_expected(mut self, wait: bool) -> Self {
        self.wait_for_expected = wait;
        self
    }

    #[instrument(skip(self, request, cancel), fields(sandbox = %request.identity.name))]
    pub async fn execute(
        &self,
        request: ProbeRequest,
        cancel: &CancellationToken,
    ) -> Result<ValidationReport, ProbeError> {
        let ProbeRequest {
            identity,
            batches,
            mode,
        } = request;

        let all_artifacts: Vec<_> = batches.iter().flat_map(|b| b.artifacts.clone()).collect();
        ensure_unique(&all_artifacts)?;

        let expectations = mode.expectations_for(&batches);
        let spec = SandboxSpec::from_batches(identity, &batches)?;

        if cancel.is_cancelled() {
            return Err(ProbeError::Cancelled {
                pending: expectations.ids().map(str::to_string).collect(),
                satisfied: 0,
            });
        }

        let handle = self.deployer.execute(&spec).await?;
        let outcome = self.poll_and_validate(&handle, &mode, expectations, cancel).await;
        self.cleanup(&handle).await;

        if let Ok(report) = &outcome {
            info!(sandbox = %handle, checked = report.checked, "Probe run passed");
        }
        outcome
    }

    async fn poll_and_validate(
        &self,
        handle: &SandboxHandle,
        mode: &ValidationMode,
        expectations: ExpectationSet,
        cancel: &CancellationToken,
    ) -> Result<ValidationReport, ProbeError> {
        let poll_for = match mode {
            ValidationMode::Targeted { .. } if self.wait_for_expected => expectations.clone(),
            _ => expectations
                .ids()
                .map(|id| (id.to_string(), Expectation::NonEmpty))
                .collect(),
        };

        let result = self.poller.poll_with(handle, poll_for, cancel).await?;
        let checked = ProbeValidator::validate(&expectations, &result)?;

        Ok(ValidationReport { checked, result })
    }

    async fn cleanup(&self, handle: &SandboxHandle) {
        if let Err(e) = self.runtime.delete_sandbox(handle).await {
            warn!(sandbox = %handle, error = %e, "Failed to delete sandbox");
        }
    }
}
