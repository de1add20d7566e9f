//! Execution sandbox: spawns and bounds a single child process.
//!
//! The sandbox binds stdin to a staged file, captures stdout/stderr, and
//! enforces a wall-clock budget with a forced kill. That budget is the only
//! limit: there is no memory ceiling and no process-level isolation
//! (namespaces, cgroups, seccomp) — a known gap carried over from the
//! system this engine replaces rather than silently papered over.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::EngineError;
use crate::lang::Invocation;

/// Reported for hard-killed processes. Kept distinct from runtime errors:
/// a timeout implies an infinite loop or resource exhaustion, not a crash.
pub const TIMEOUT_MESSAGE: &str = "Execution timed out (possible infinite loop)";

/// Outcome of one bounded child-process execution. Immutable once built.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub elapsed_ms: u64,
    pub timed_out: bool,
    /// Raw error text for non-zero exits or stderr output. Callers scrub
    /// this before it reaches end users.
    pub runtime_error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.runtime_error.is_none()
    }
}

/// Run `invocation` with stdin bound to `input_path`, killing the child if
/// it outlives `timeout_ms` of wall-clock time.
pub async fn run(
    invocation: &Invocation,
    input_path: &std::path::Path,
    timeout_ms: u64,
) -> Result<ExecutionResult, EngineError> {
    let input = std::fs::File::open(input_path)
        .map_err(|e| EngineError::Upstream(format!("failed to open stdin file: {}", e)))?;

    let mut command = Command::from(invocation);
    command
        .stdin(Stdio::from(input))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let child = command.spawn().map_err(|e| {
        EngineError::Upstream(format!(
            "failed to spawn {}: {}",
            invocation.program.display(),
            e
        ))
    })?;

    match timeout(Duration::from_millis(timeout_ms), child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            // Non-zero exit or any stderr output counts as a runtime error,
            // even when the exit status is clean.
            let runtime_error = if !output.status.success() {
                Some(if stderr.trim().is_empty() {
                    format!(
                        "Process exited with code {}",
                        output.status.code().unwrap_or(-1)
                    )
                } else {
                    stderr
                })
            } else if !stderr.trim().is_empty() {
                Some(stderr)
            } else {
                None
            };

            if let Some(ref err) = runtime_error {
                warn!(
                    elapsed_ms,
                    error_preview = err.lines().next().unwrap_or(""),
                    "Execution failed with runtime error"
                );
            } else {
                debug!(elapsed_ms, "Execution completed");
            }

            Ok(ExecutionResult {
                stdout,
                elapsed_ms,
                timed_out: false,
                runtime_error,
            })
        }
        Ok(Err(e)) => Err(EngineError::Upstream(format!(
            "failed to collect process output: {}",
            e
        ))),
        Err(_) => {
            // kill_on_drop reaps the child when the future is dropped here.
            let elapsed_ms = start.elapsed().as_millis() as u64;
            warn!(elapsed_ms, timeout_ms, "Execution timed out, killing process");
            Ok(ExecutionResult {
                stdout: String::new(),
                elapsed_ms,
                timed_out: true,
                runtime_error: None,
            })
        }
    }
}

impl From<&Invocation> for Command {
    fn from(invocation: &Invocation) -> Self {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command
    }
}
