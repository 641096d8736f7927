use dnsprobe_domain::{Expectation, ExpectationSet, PendingArtifact, PollResult, ProbeError};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::ports::ArtifactPayloads;

/// Bookkeeping for one poll run: what is still pending, what has been
/// accepted, and when to give up.
///
/// Accepted artifacts are never dropped or re-fetched, so a failed tick or an
/// early abort keeps everything collected so far.
#[derive(Debug, Clone)]
pub struct PollState {
    expectations: ExpectationSet,
    pending: BTreeSet<String>,
    last_observed: BTreeMap<String, String>,
    result: PollResult,
    started_at: Instant,
    deadline: Instant,
    ticks: u32,
    transient_failures: u32,
}

impl PollState {
    /// Every id only has to appear with non-empty content.
    pub fn new<I, S>(ids: I, now: Instant, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expectations = ids
            .into_iter()
            .map(|id| (id.into(), Expectation::NonEmpty))
            .collect();
        Self::with_expectations(expectations, now, timeout)
    }

    pub fn with_expectations(
        expectations: ExpectationSet,
        now: Instant,
        timeout: Duration,
    ) -> Self {
        let pending = expectations.ids().map(str::to_string).collect();
        Self {
            expectations,
            pending,
            last_observed: BTreeMap::new(),
            result: PollResult::new(),
            started_at: now,
            deadline: now + timeout,
            ticks: 0,
            transient_failures: 0,
        }
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn satisfied_count(&self) -> usize {
        self.result.len()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn transient_failures(&self) -> u32 {
        self.transient_failures
    }

    pub fn result(&self) -> &PollResult {
        &self.result
    }

    /// Applies one successful fetch. Returns how many artifacts became
    /// satisfied on this tick.
    ///
    /// Payloads for ids that are not pending are ignored.
    pub fn observe(&mut self, fetched: &ArtifactPayloads) -> usize {
        self.ticks += 1;
        let mut accepted = Vec::new();

        for id in &self.pending {
            let Some(payload) = fetched.get(id) else {
                continue;
            };
            let acceptable = self
                .expectations
                .get(id)
                .is_some_and(|expectation| expectation.accepts(payload));
            if acceptable {
                accepted.push((id.clone(), payload.clone()));
            } else if !payload.trim().is_empty() {
                self.last_observed.insert(id.clone(), payload.trim().to_string());
            }
        }

        for (id, payload) in &accepted {
            self.pending.remove(id);
            self.last_observed.remove(id);
            self.result.record(id.as_str(), payload.as_str());
        }

        accepted.len()
    }

    /// A fetch that failed as a whole. Nothing already accepted is lost.
    pub fn record_failure(&mut self) {
        self.ticks += 1;
        self.transient_failures += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn timeout_error(&self, now: Instant) -> ProbeError {
        ProbeError::Timeout {
            pending: self
                .pending
                .iter()
                .map(|id| PendingArtifact {
                    id: id.clone(),
                    last_observed: self.last_observed.get(id).cloned(),
                })
                .collect(),
            elapsed: now.saturating_duration_since(self.started_at),
        }
    }

    pub fn cancelled_error(&self) -> ProbeError {
        ProbeError::Cancelled {
            pending: self.pending_ids(),
            satisfied: self.result.len(),
        }
    }

    pub fn into_result(self) -> PollResult {
        self.result
    }
}
