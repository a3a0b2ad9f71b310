//! Test doubles for the collector's external collaborators.

use crate::executor::Executor;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Executor that replays canned outputs keyed by the exact command line.
///
/// Unknown commands fail as if the binary were missing.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, (Option<i32>, String, String)>>,
    calls: AtomicUsize,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success(self, command: &str, stdout: &str) -> Self {
        self.set(command, Some(0), stdout, "");
        self
    }

    pub fn with_failure(self, command: &str, code: i32, stderr: &str) -> Self {
        self.set(command, Some(code), "", stderr);
        self
    }

    pub fn set(&self, command: &str, code: Option<i32>, stdout: &str, stderr: &str) {
        self.responses.lock().unwrap().insert(
            command.to_string(),
            (code, stdout.to_string(), stderr.to_string()),
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, command: &str) -> Result<(Option<i32>, String, String)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(command)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("command not found: {}", command))
    }
}
