//! Fatal error taxonomy for the engine.
//!
//! Compile failures, timeouts, wrong answers and runtime errors are not
//! errors in this sense: they are recovered into `CaseFailure` outcomes and
//! never retried. Only conditions that abort the whole request live here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The blob store or a toolchain process could not be invoked at all.
    /// Surfaced to the caller as a failed response; the caller decides
    /// whether to retry.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// Workspace setup failed before any execution was attempted.
    #[error("workspace setup failed: {0}")]
    Workspace(#[source] std::io::Error),
}
