use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{error, info};

/// Tells the telephony engine to pick up freshly written dialplans.
///
/// Implementations report problems through the log only. A failed reload
/// leaves the written artifact in place for the next one.
#[async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded { stdout: String, stderr: String },
    Failed { status: Option<i32>, stderr: String },
    SpawnFailed(String),
    TimedOut,
}

/// Runs `asterisk -rx "dialplan reload"`, or whatever command is configured.
pub struct AsteriskReloader {
    command: Vec<String>,
    timeout: Duration,
}

impl AsteriskReloader {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    pub async fn run(&self) -> ReloadOutcome {
        let Some((program, args)) = self.command.split_first() else {
            return ReloadOutcome::SpawnFailed("no reload command configured".to_string());
        };
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();
        match tokio::time::timeout(self.timeout, output).await {
            Err(_) => ReloadOutcome::TimedOut,
            Ok(Err(e)) => ReloadOutcome::SpawnFailed(e.to_string()),
            Ok(Ok(output)) if output.status.success() => ReloadOutcome::Reloaded {
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Ok(Ok(output)) => ReloadOutcome::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
        }
    }
}

#[async_trait]
impl Reloader for AsteriskReloader {
    async fn reload(&self) {
        match self.run().await {
            ReloadOutcome::Reloaded { stdout, stderr } => {
                info!("dialplan reloaded: {stdout}");
                // asterisk -rx exits 0 even when it can't reach the daemon
                if !stderr.is_empty() {
                    error!("dialplan reload reported: {stderr}");
                }
            }
            ReloadOutcome::Failed { status, stderr } => {
                error!(?status, "dialplan reload failed: {stderr}")
            }
            ReloadOutcome::SpawnFailed(e) => error!("can't run dialplan reload: {e}"),
            ReloadOutcome::TimedOut => {
                error!(timeout = ?self.timeout, "dialplan reload timed out")
            }
        }
    }
}
