//! Command execution.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Trait for command execution.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a command and return (exit_code, stdout, stderr).
    async fn execute(&self, command: &str) -> Result<(Option<i32>, String, String)>;
}

/// Runs commands on the local host through `sh -c`.
pub struct LocalExecutor;

impl LocalExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for LocalExecutor {
    async fn execute(&self, command: &str) -> Result<(Option<i32>, String, String)> {
        debug!("Local exec: {}", command);

        let output = Command::new("sh")
            .args(["-c", command])
            .output()
            .await
            .context("Failed to execute command")?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();

        Ok((exit_code, stdout, stderr))
    }
}

/// Run a command and return its stdout only if it exited with status 0.
///
/// Spawn failures, signals and non-zero exits all yield `None`; the cause
/// is logged at debug level.
pub async fn stdout_if_success(executor: &dyn Executor, command: &str) -> Option<String> {
    match executor.execute(command).await {
        Ok((Some(0), stdout, _)) => Some(stdout),
        Ok((code, _, stderr)) => {
            debug!(
                "Command `{}` failed with exit code {:?}: {}",
                command,
                code,
                stderr.trim()
            );
            None
        }
        Err(e) => {
            debug!("Command `{}` could not run: {:#}", command, e);
            None
        }
    }
}
