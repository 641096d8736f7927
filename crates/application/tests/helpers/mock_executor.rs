#![allow(dead_code)]

use async_trait::async_trait;
use dnsprobe_application::ports::CommandExecutor;
use dnsprobe_domain::{ExecOutput, ExecTarget, ProbeError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock CommandExecutor: scripted stdout per command line
// ============================================================================

enum Reply {
    Stdout(String),
    Fail(String),
    Hang,
}

pub struct MockCommandExecutor {
    /// Replies are consumed in order; the last one repeats.
    replies: Arc<RwLock<HashMap<String, Vec<Reply>>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn reply(&self, command: &str, stdout: &str) {
        self.replies
            .write()
            .await
            .entry(command.to_string())
            .or_default()
            .push(Reply::Stdout(stdout.to_string()));
    }

    pub async fn fail(&self, command: &str, reason: &str) {
        self.replies
            .write()
            .await
            .entry(command.to_string())
            .or_default()
            .push(Reply::Fail(reason.to_string()));
    }

    /// The command never returns.
    pub async fn hang(&self, command: &str) {
        self.replies
            .write()
            .await
            .entry(command.to_string())
            .or_default()
            .push(Reply::Hang);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self, command: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.as_str() == command)
            .count()
    }
}

#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn exec(
        &self,
        _target: &ExecTarget,
        command: &[String],
    ) -> Result<ExecOutput, ProbeError> {
        let line = command.join(" ");
        self.calls.write().await.push(line.clone());

        let reply = {
            let mut replies = self.replies.write().await;
            let queue = replies
                .get_mut(&line)
                .ok_or_else(|| ProbeError::Exec(format!("unexpected command: {}", line)))?;
            if queue.len() > 1 {
                queue.remove(0)
            } else {
                match queue.first() {
                    Some(Reply::Stdout(s)) => Reply::Stdout(s.clone()),
                    Some(Reply::Fail(r)) => Reply::Fail(r.clone()),
                    Some(Reply::Hang) => Reply::Hang,
                    None => return Err(ProbeError::Exec(format!("no reply for: {}", line))),
                }
            }
        };

        match reply {
            Reply::Stdout(stdout) => Ok(ExecOutput {
                stdout,
                stderr: String::new(),
            }),
            Reply::Fail(reason) => Err(ProbeError::Exec(reason)),
            Reply::Hang => std::future::pending().await,
        }
    }
}
