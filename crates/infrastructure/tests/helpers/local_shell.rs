#![allow(dead_code)]

use async_trait::async_trait;
use dnsprobe_application::ports::CommandExecutor;
use dnsprobe_domain::{ExecOutput, ExecTarget, ProbeError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::RwLock;

// ============================================================================
// CommandExecutor that runs the command on the local machine
// ============================================================================

#[derive(Clone, Default)]
pub struct LocalShellExecutor {
    calls: Arc<RwLock<Vec<(ExecTarget, Vec<String>)>>>,
    fail: Arc<AtomicBool>,
}

impl LocalShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<(ExecTarget, Vec<String>)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl CommandExecutor for LocalShellExecutor {
    async fn exec(
        &self,
        target: &ExecTarget,
        command: &[String],
    ) -> Result<ExecOutput, ProbeError> {
        self.calls.write().await.push((target.clone(), command.to_vec()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProbeError::Exec("container not found".to_string()));
        }

        let output = Command::new(&command[0])
            .args(&command[1..])
            .output()
            .await
            .map_err(|e| ProbeError::Exec(e.to_string()))?;
        if !output.status.success() {
            return Err(ProbeError::Exec(format!("exited with {}", output.status)));
        }
        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

// ============================================================================
// Scratch results directory, removed on drop
// ============================================================================

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

pub struct ResultsDir {
    path: PathBuf,
}

impl ResultsDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "dns-results-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn write(&self, file: &str, content: &str) {
        std::fs::write(self.path.join(file), content).unwrap();
    }
}

impl Drop for ResultsDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
