use async_trait::async_trait;
use dnsprobe_application::ports::{ArtifactPayloads, ArtifactSource, CommandExecutor};
use dnsprobe_domain::{ExecTarget, ProbeError, SandboxHandle};
use std::sync::Arc;
use tracing::debug;

use super::pod_manifest::WEBSERVER_CONTAINER;

/// Printed on its own line before each artifact's content.
const MARKER: &str = "==> dnsprobe-artifact ";

/// `$1` is the results directory, the remaining arguments are artifact ids.
/// Missing files are skipped; every present file is followed by one newline.
const LISTING_SCRIPT: &str = concat!(
    r#"dir="$1"; shift; for f in "$@"; do "#,
    r#"if [ -f "$dir/$f" ]; then echo "==> dnsprobe-artifact $f"; cat "$dir/$f"; echo; fi; "#,
    "done"
);

/// Reads every requested artifact with a single exec into the sandbox, so a
/// tick costs one remote call however many artifacts are pending.
pub struct ExecArtifactSource {
    executor: Arc<dyn CommandExecutor>,
    container: String,
    results_dir: String,
}

impl ExecArtifactSource {
    pub fn new(executor: Arc<dyn CommandExecutor>, results_dir: impl Into<String>) -> Self {
        Self {
            executor,
            container: WEBSERVER_CONTAINER.to_string(),
            results_dir: results_dir.into(),
        }
    }

    /// Container to exec into; it must mount the results volume.
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn command(&self, ids: &[String]) -> Vec<String> {
        let mut command = Vec::with_capacity(ids.len() + 5);
        command.extend([
            "sh".to_string(),
            "-c".to_string(),
            LISTING_SCRIPT.to_string(),
            "sh".to_string(),
            self.results_dir.clone(),
        ]);
        command.extend(ids.iter().cloned());
        command
    }
}

#[async_trait]
impl ArtifactSource for ExecArtifactSource {
    async fn fetch_artifacts(
        &self,
        handle: &SandboxHandle,
        ids: &[String],
    ) -> Result<ArtifactPayloads, ProbeError> {
        if ids.is_empty() {
            return Ok(ArtifactPayloads::new());
        }

        let target = ExecTarget::new(
            handle.namespace.clone(),
            handle.name.clone(),
            self.container.clone(),
        );
        let output = self
            .executor
            .exec(&target, &self.command(ids))
            .await
            .map_err(|e| {
                ProbeError::TransientFetch(format!(
                    "Reading artifacts from {} failed: {}",
                    handle, e
                ))
            })?;

        let payloads = parse_listing(&output.stdout, ids);
        debug!(
            sandbox = %handle,
            requested = ids.len(),
            present = payloads.len(),
            "Artifacts read"
        );
        Ok(payloads)
    }
}

/// Splits the listing script's output back into per-artifact content.
/// Sections for ids that were not requested are dropped.
pub fn parse_listing(stdout: &str, ids: &[String]) -> ArtifactPayloads {
    let mut payloads = ArtifactPayloads::with_capacity(ids.len());
    let mut current: Option<(&str, String)> = None;

    for line in stdout.split_inclusive('\n') {
        if let Some(id) = line.strip_prefix(MARKER) {
            if let Some((id, body)) = current.take() {
                insert_section(&mut payloads, ids, id, body);
            }
            current = Some((id.trim_end(), String::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
        }
    }
    if let Some((id, body)) = current {
        insert_section(&mut payloads, ids, id, body);
    }

    payloads
}

fn insert_section(payloads: &mut ArtifactPayloads, ids: &[String], id: &str, mut body: String) {
    if !ids.iter().any(|wanted| wanted == id) {
        return;
    }
    if body.ends_with('\n') {
        body.pop();
    }
    payloads.insert(id.to_string(), body);
}
