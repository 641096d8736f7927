use dnsprobe_domain::config::PollConfig;
use dnsprobe_domain::{DnsConfigExpectation, ExecTarget, InjectedLookup, ProbeError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::ports::{Clock, CommandExecutor};

/// Checks that a pod with a custom DNS config sees the search path,
/// nameserver and options it was given, and that its nameserver answers.
pub struct VerifyDnsConfigUseCase {
    executor: Arc<dyn CommandExecutor>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    timeout: Duration,
}

impl VerifyDnsConfigUseCase {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        clock: Arc<dyn Clock>,
        poll: &PollConfig,
    ) -> Self {
        Self {
            executor,
            clock,
            interval: poll.interval(),
            timeout: poll.timeout(),
        }
    }

    /// # Errors
    ///
    /// * `ProbeError::Exec` - If one of the inspection commands cannot be run
    /// * `ProbeError::DnsConfig` - Every check that did not hold
    /// * `ProbeError::Cancelled` - If `cancel` fires during the lookup poll
    #[instrument(skip(self, expectation, cancel), fields(pod = %target.pod))]
    pub async fn execute(
        &self,
        target: &ExecTarget,
        expectation: &DnsConfigExpectation,
        cancel: &CancellationToken,
    ) -> Result<(), ProbeError> {
        let mut failures = Vec::new();

        let suffix = self.run(target, &["/agnhost", "dns-suffix"]).await?;
        if !suffix.contains(expectation.search_path.as_str()) {
            failures.push(format!(
                "search path '{}' not found in '{}'",
                expectation.search_path,
                suffix.trim()
            ));
        }

        let servers = self.run(target, &["/agnhost", "dns-server-list"]).await?;
        let nameserver = expectation.nameserver.to_string();
        if !servers.split_whitespace().any(|s| s == nameserver) {
            failures.push(format!(
                "nameserver {} not found in '{}'",
                nameserver,
                servers.trim()
            ));
        }

        if let Some(ndots) = expectation.ndots {
            let resolv = self.run(target, &["cat", "/etc/resolv.conf"]).await?;
            let option = format!("ndots:{}", ndots);
            if !resolv.split_whitespace().any(|token| token == option) {
                failures.push(format!("resolv.conf does not set {}", option));
            }
        }

        if let Some(lookup) = &expectation.lookup {
            if let Err(failure) = self.await_lookup(target, lookup, cancel).await? {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            info!(pod = %target.pod, "Pod DNS config verified");
            Ok(())
        } else {
            warn!(pod = %target.pod, failed = failures.len(), "Pod DNS config mismatch");
            Err(ProbeError::DnsConfig(failures))
        }
    }

    async fn run(&self, target: &ExecTarget, command: &[&str]) -> Result<String, ProbeError> {
        let command: Vec<String> = command.iter().map(|s| s.to_string()).collect();
        let output = self.executor.exec(target, &command).await?;
        debug!(command = ?command, stdout = %output.stdout.trim(), "Exec finished");
        Ok(output.stdout)
    }

    /// Outer error aborts the run; inner error is a check failure.
    async fn await_lookup(
        &self,
        target: &ExecTarget,
        lookup: &InjectedLookup,
        cancel: &CancellationToken,
    ) -> Result<Result<(), String>, ProbeError> {
        let expected = lookup.expected_ip.to_string();
        let command = vec![
            "dig".to_string(),
            "+short".to_string(),
            "+search".to_string(),
            lookup.short_name.clone(),
        ];
        let deadline = self.clock.now() + self.timeout;
        let mut last_seen = String::new();

        loop {
            let until_deadline = deadline.saturating_duration_since(self.clock.now());
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(lookup_cancelled(lookup)),
                attempt = self.executor.exec(target, &command) => attempt,
                _ = self.clock.sleep(until_deadline) => {
                    warn!(name = %lookup.short_name, "Lookup still running at the deadline");
                    return Ok(Err(lookup_timed_out(lookup, &expected, &last_seen)));
                }
            };

            match attempt {
                Ok(output) => {
                    let lines: Vec<&str> = output
                        .stdout
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .collect();
                    if lines.len() == 1 && lines[0] == expected {
                        debug!(name = %lookup.short_name, ip = %expected, "Injected name resolved");
                        return Ok(Ok(()));
                    }
                    last_seen = lines.join(",");
                }
                Err(e) => {
                    warn!(name = %lookup.short_name, error = %e, "Lookup exec failed, retrying");
                }
            }

            let now = self.clock.now();
            if now >= deadline {
                return Ok(Err(lookup_timed_out(lookup, &expected, &last_seen)));
            }

            let pause = self.interval.min(deadline.saturating_duration_since(now));
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(lookup_cancelled(lookup)),
                _ = self.clock.sleep(pause) => {}
            }
        }
    }
}

fn lookup_timed_out(lookup: &InjectedLookup, expected: &str, last_seen: &str) -> String {
    format!(
        "{} did not resolve to {} (last answer '{}')",
        lookup.short_name, expected, last_seen
    )
}

fn lookup_cancelled(lookup: &InjectedLookup) -> ProbeError {
    ProbeError::Cancelled {
        pending: vec![lookup.short_name.clone()],
        satisfied: 0,
    }
}
