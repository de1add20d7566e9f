//! Language toolchain adapters.
//!
//! One adapter per supported language, selected by a lookup at job start.
//! Adapters know how to compile the staged source (if the language needs a
//! build step) and how to invoke the program afterwards. Invocations are
//! always argv vectors; nothing here ever passes through a shell.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use arbiter_common::types::Language;

use crate::workspace::JobWorkspace;

/// Argv-vector process invocation spec consumed by the sandbox.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    /// The toolchain ran and rejected the source. Carries the raw
    /// diagnostic text; callers scrub it before surfacing.
    #[error("{0}")]
    Failed(String),

    /// The toolchain itself could not be invoked.
    #[error("toolchain unavailable: {0}")]
    Toolchain(String),
}

#[async_trait]
pub trait LanguageAdapter: Send + Sync {
    /// Synthetic file name the source is staged under. Diagnostics stay
    /// anchored to this name across jobs sharing the same code.
    fn source_file_name(&self) -> &'static str;

    /// Build the staged source if the language needs it. No-op for
    /// interpreted languages. No execution is attempted if this fails.
    async fn compile(&self, ws: &JobWorkspace) -> Result<(), CompileError>;

    /// Invocation that runs the (compiled or interpreted) program.
    fn run_invocation(&self, ws: &JobWorkspace) -> Invocation;
}

/// Compiled-language adapter: g++ produces a per-job binary which is
/// executed directly and removed with the workspace.
pub struct CppAdapter;

#[async_trait]
impl LanguageAdapter for CppAdapter {
    fn source_file_name(&self) -> &'static str {
        "main.cpp"
    }

    async fn compile(&self, ws: &JobWorkspace) -> Result<(), CompileError> {
        debug!(job_id = %ws.id(), "Compiling C++ source");
        let output = Command::new("g++")
            .arg(ws.source_path())
            .arg("-o")
            .arg(ws.artifact_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CompileError::Toolchain(format!("failed to invoke g++: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        // g++ writes warnings to stderr too; any diagnostic output is
        // treated as a compile failure, matching the judge's contract.
        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(CompileError::Failed(if stderr.trim().is_empty() {
                format!(
                    "g++ exited with code {}",
                    output.status.code().unwrap_or(-1)
                )
            } else {
                stderr
            }));
        }
        Ok(())
    }

    fn run_invocation(&self, ws: &JobWorkspace) -> Invocation {
        Invocation::new(ws.artifact_path())
    }
}

/// Interpreted-language adapter: python3 runs the source directly.
pub struct PythonAdapter;

#[async_trait]
impl LanguageAdapter for PythonAdapter {
    fn source_file_name(&self) -> &'static str {
        "main.py"
    }

    async fn compile(&self, _ws: &JobWorkspace) -> Result<(), CompileError> {
        Ok(())
    }

    fn run_invocation(&self, ws: &JobWorkspace) -> Invocation {
        Invocation::new("python3").arg(ws.source_path())
    }
}

static CPP: CppAdapter = CppAdapter;
static PYTHON: PythonAdapter = PythonAdapter;

/// Lookup table mapping a language tag to its adapter.
pub fn adapter_for(language: Language) -> &'static dyn LanguageAdapter {
    match language {
        Language::Cpp => &CPP,
        Language::Python => &PYTHON,
    }
}
