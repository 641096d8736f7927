use dnsprobe_domain::config::PollConfig;
use dnsprobe_domain::{ExpectationSet, PollResult, ProbeError, SandboxHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::PollState;
use crate::ports::{ArtifactSource, Clock};

/// Polls a running sandbox until every expected artifact is accepted or the
/// deadline passes.
pub struct ResultPoller {
    source: Arc<dyn ArtifactSource>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    timeout: Duration,
}

impl ResultPoller {
    pub fn new(
        source: Arc<dyn ArtifactSource>,
        clock: Arc<dyn Clock>,
        config: &PollConfig,
    ) -> Self {
        Self {
            source,
            clock,
            interval: config.interval(),
            timeout: config.timeout(),
        }
    }

    /// Waits for every id to appear with non-empty content.
    pub async fn poll(
        &self,
        handle: &SandboxHandle,
        ids: &[String],
    ) -> Result<PollResult, ProbeError> {
        let mut state = PollState::new(ids.iter().cloned(), self.clock.now(), self.timeout);
        self.drive(handle, &mut state, &CancellationToken::new()).await?;
        Ok(state.into_result())
    }

    /// # Errors
    ///
    /// * `ProbeError::Timeout` - If the deadline passes with artifacts still
    ///   pending
    /// * `ProbeError::Cancelled` - If `cancel` fires first
    pub async fn poll_with(
        &self,
        handle: &SandboxHandle,
        expectations: ExpectationSet,
        cancel: &CancellationToken,
    ) -> Result<PollResult, ProbeError> {
        let mut state = PollState::with_expectations(expectations, self.clock.now(), self.timeout);
        self.drive(handle, &mut state, cancel).await?;
        Ok(state.into_result())
    }

    /// Runs the fetch loop against caller-owned state. The first fetch is
    /// immediate; on cancellation `state` keeps everything accepted so far.
    /// A fetch still in flight when the deadline passes is abandoned.
    pub async fn drive(
        &self,
        handle: &SandboxHandle,
        state: &mut PollState,
        cancel: &CancellationToken,
    ) -> Result<(), ProbeError> {
        debug!(
            sandbox = %handle,
            pending = state.pending_count(),
            interval_secs = self.interval.as_secs(),
            "Polling sandbox for artifacts"
        );

        loop {
            if cancel.is_cancelled() {
                return Err(state.cancelled_error());
            }
            if state.is_complete() {
                return Ok(());
            }

            let ids = state.pending_ids();
            let until_deadline = state.remaining(self.clock.now());
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(state.cancelled_error()),
                fetched = self.source.fetch_artifacts(handle, &ids) => fetched,
                _ = self.clock.sleep(until_deadline) => {
                    warn!(
                        sandbox = %handle,
                        pending = state.pending_count(),
                        "Artifact fetch still running at the deadline"
                    );
                    return Err(state.timeout_error(self.clock.now()));
                }
            };

            match fetched {
                Ok(payloads) => {
                    let accepted = state.observe(&payloads);
                    debug!(
                        sandbox = %handle,
                        accepted,
                        pending = state.pending_count(),
                        tick = state.ticks(),
                        "Poll tick"
                    );
                }
                Err(e) => {
                    state.record_failure();
                    warn!(
                        sandbox = %handle,
                        error = %e,
                        failures = state.transient_failures(),
                        "Artifact fetch failed, retrying"
                    );
                }
            }

            if state.is_complete() {
                info!(
                    sandbox = %handle,
                    artifacts = state.satisfied_count(),
                    ticks = state.ticks(),
                    "All artifacts present"
                );
                return Ok(());
            }

            let now = self.clock.now();
            if state.is_expired(now) {
                warn!(
                    sandbox = %handle,
                    pending = state.pending_count(),
                    "Poll deadline passed"
                );
                return Err(state.timeout_error(now));
            }

            let pause = self.interval.min(state.remaining(now));
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(state.cancelled_error()),
                _ = self.clock.sleep(pause) => {}
            }
        }
    }
}
