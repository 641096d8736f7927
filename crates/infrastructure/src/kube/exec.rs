use async_trait::async_trait;
use dnsprobe_application::ports::CommandExecutor;
use dnsprobe_domain::{ExecOutput, ExecTarget, ProbeError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs commands in containers by shelling out to `kubectl exec`.
pub struct KubectlExecutor {
    kubectl: String,
    server: Option<String>,
}

impl KubectlExecutor {
    pub fn new(kubectl: impl Into<String>) -> Self {
        Self {
            kubectl: kubectl.into(),
            server: None,
        }
    }

    /// Passes `--server` so kubectl talks to the same API server.
    pub fn with_server(mut self, server: Option<String>) -> Self {
        self.server = server;
        self
    }

    pub fn args(&self, target: &ExecTarget, command: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(command.len() + 9);
        if let Some(server) = &self.server {
            args.push(format!("--server={}", server));
        }
        args.extend([
            "exec".to_string(),
            "-n".to_string(),
            target.namespace.clone(),
            target.pod.clone(),
            "-c".to_string(),
            target.container.clone(),
            "--".to_string(),
        ]);
        args.extend(command.iter().cloned());
        args
    }
}

#[async_trait]
impl CommandExecutor for KubectlExecutor {
    async fn exec(
        &self,
        target: &ExecTarget,
        command: &[String],
    ) -> Result<ExecOutput, ProbeError> {
        let args = self.args(target, command);
        debug!(kubectl = %self.kubectl, args = ?args, "Running kubectl");

        let output = Command::new(&self.kubectl)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProbeError::Exec(format!("Failed to run {}: {}", self.kubectl, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(ProbeError::Exec(format!(
                "'{}' in {}/{} exited with {}: {}",
                command.join(" "),
                target.pod,
                target.container,
                output.status,
                stderr.trim()
            )));
        }

        Ok(ExecOutput { stdout, stderr })
    }
}
