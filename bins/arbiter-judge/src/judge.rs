//! Judge orchestrator.
//!
//! Drives one submission through its test cases: stage a workspace, compile
//! if the language needs it, execute in the sandbox, compare outputs, and
//! stop at the first non-passing case. Later cases are deliberately skipped
//! once an earlier one fails, so cases run strictly in index order and
//! never in parallel.

use tracing::{info, instrument, warn};

use arbiter_common::types::{
    CaseFailure, CaseOutcome, Language, ProblemSpec, RunRequest, RunResponse, SubmissionReport,
};

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::lang::{adapter_for, CompileError, LanguageAdapter};
use crate::report;
use crate::sandbox::{self, TIMEOUT_MESSAGE};
use crate::scrub::scrub_diagnostics;
use crate::store::{fetch_case, TestCaseStore};
use crate::workspace::JobWorkspace;

/// Comparison policy: exact byte match after a single trim of surrounding
/// whitespace on each side. Internal whitespace and line endings are
/// significant.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Judge test cases `0..case_count` for one submission, stopping at the
/// first non-passing case. The returned sequence is always a prefix of the
/// declared cases.
#[instrument(skip(config, store, code), fields(problem = %problem.slug, language = %language))]
pub async fn run_test_cases(
    config: &EngineConfig,
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    code: &str,
    language: Language,
    case_count: usize,
) -> Result<Vec<CaseOutcome>, EngineError> {
    run_test_cases_with(adapter_for(language), language, config, store, problem, code, case_count)
        .await
}

pub(crate) async fn run_test_cases_with(
    adapter: &dyn LanguageAdapter,
    language: Language,
    config: &EngineConfig,
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    code: &str,
    case_count: usize,
) -> Result<Vec<CaseOutcome>, EngineError> {
    let mut outcomes = Vec::new();

    for index in 0..case_count {
        let outcome =
            run_case_with(adapter, language, config, store, problem, code, index).await?;
        info!(
            test = outcome.test,
            passed = outcome.passed,
            elapsed_ms = outcome.elapsed_ms,
            "Judged test case"
        );

        let passed = outcome.passed;
        outcomes.push(outcome);
        if !passed {
            break;
        }
    }

    Ok(outcomes)
}

/// Judge one test case: ephemeral workspace, compile if needed, one
/// sandboxed execution, classification. The workspace (source, stdin file,
/// compiled artifact) is gone before this returns, on every path.
pub(crate) async fn run_case_with(
    adapter: &dyn LanguageAdapter,
    language: Language,
    config: &EngineConfig,
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    code: &str,
    index: usize,
) -> Result<CaseOutcome, EngineError> {
    let case = fetch_case(store, problem, index).await?;
    let test = index + 1;
    // A problem that declares no time budget gets the engine default.
    let limit_ms = if problem.max_exec_time_ms > 0 {
        problem.max_exec_time_ms
    } else {
        config.default_time_limit_ms
    };

    let ws = JobWorkspace::create(
        &config.workspace_root,
        adapter.source_file_name(),
        code,
        &case.input,
    )
    .await?;

    if let Err(e) = adapter.compile(&ws).await {
        return match e {
            CompileError::Failed(diag) => {
                let message = scrub_diagnostics(language, &diag);
                Ok(CaseOutcome::failed(
                    test,
                    String::new(),
                    case.expected_output,
                    0,
                    CaseFailure::CompileError(message),
                ))
            }
            CompileError::Toolchain(msg) => Err(EngineError::Upstream(msg)),
        };
    }

    let result = sandbox::run(
        &adapter.run_invocation(&ws),
        ws.input_path(),
        config.hard_timeout_ms,
    )
    .await?;
    // Single execution per artifact: tear the workspace down before
    // classifying so nothing survives past this point.
    drop(ws);

    let outcome = if result.timed_out {
        CaseOutcome::failed(
            test,
            String::new(),
            case.expected_output,
            result.elapsed_ms,
            CaseFailure::TimeLimitExceeded(TIMEOUT_MESSAGE.to_string()),
        )
    } else if let Some(raw) = result.runtime_error {
        CaseOutcome::failed(
            test,
            result.stdout,
            case.expected_output,
            result.elapsed_ms,
            CaseFailure::RuntimeError(scrub_diagnostics(language, &raw)),
        )
    } else if result.elapsed_ms > limit_ms {
        // The hard kill never fired, but the measured time blew the
        // per-problem budget.
        let message = format!(
            "Time Limit Exceeded ({}ms, limit {}ms)",
            result.elapsed_ms, limit_ms
        );
        CaseOutcome::failed(
            test,
            result.stdout,
            case.expected_output,
            result.elapsed_ms,
            CaseFailure::TimeLimitExceeded(message),
        )
    } else if outputs_match(&result.stdout, &case.expected_output) {
        CaseOutcome::passed(test, result.stdout, case.expected_output, result.elapsed_ms)
    } else {
        let message = format!(
            "Wrong Answer on Test Case: {}: expected \"{}\", got \"{}\"",
            test,
            case.expected_output.trim(),
            result.stdout.trim()
        );
        CaseOutcome::failed(
            test,
            result.stdout,
            case.expected_output,
            result.elapsed_ms,
            CaseFailure::WrongAnswer(message),
        )
    };

    Ok(outcome)
}

/// Judge every declared case; the persisted verdict is Accepted or
/// Attempted.
pub async fn judge_submission(
    config: &EngineConfig,
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    code: &str,
    language: Language,
) -> Result<SubmissionReport, EngineError> {
    let outcomes =
        run_test_cases(config, store, problem, code, language, problem.case_count).await?;
    Ok(report::submission_report(outcomes, problem.case_count))
}

/// Interactive run: judge only the leading sample cases and surface the
/// specific failure.
pub async fn run_problem(
    config: &EngineConfig,
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    code: &str,
    language: Language,
) -> Result<SubmissionReport, EngineError> {
    let case_count = problem.case_count.min(config.run_case_count);
    let outcomes = run_test_cases(config, store, problem, code, language, case_count).await?;
    Ok(report::run_report(outcomes, case_count))
}

/// Single-shot execution: run the code once against the supplied stdin,
/// with no output comparison. This is the transport-agnostic contract the
/// upstream submission service calls.
pub async fn execute_run(config: &EngineConfig, request: &RunRequest) -> RunResponse {
    if request.code.trim().is_empty() {
        return RunResponse::err("Empty code! Can't be executed");
    }

    match execute_run_inner(config, request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Run request failed");
            RunResponse::err(scrub_diagnostics(request.language, &e.to_string()))
        }
    }
}

async fn execute_run_inner(
    config: &EngineConfig,
    request: &RunRequest,
) -> Result<RunResponse, EngineError> {
    let adapter = adapter_for(request.language);
    let ws = JobWorkspace::create(
        &config.workspace_root,
        adapter.source_file_name(),
        &request.code,
        &request.input,
    )
    .await?;

    match adapter.compile(&ws).await {
        Ok(()) => {}
        Err(CompileError::Failed(diag)) => {
            return Ok(RunResponse::err(scrub_diagnostics(request.language, &diag)));
        }
        Err(CompileError::Toolchain(msg)) => return Err(EngineError::Upstream(msg)),
    }

    let result = sandbox::run(
        &adapter.run_invocation(&ws),
        ws.input_path(),
        config.hard_timeout_ms,
    )
    .await?;

    Ok(if result.succeeded() {
        RunResponse::ok(result.stdout, result.elapsed_ms)
    } else if result.timed_out {
        RunResponse::err(TIMEOUT_MESSAGE)
    } else {
        let raw = result.runtime_error.unwrap_or_default();
        RunResponse::err(scrub_diagnostics(request.language, &raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_trims_surrounding_whitespace() {
        assert!(outputs_match("42\n", "42"));
        assert!(outputs_match("  42  ", "42"));
        assert!(outputs_match("\n42", "42\r\n"));
    }

    #[test]
    fn comparison_keeps_internal_whitespace_significant() {
        assert!(!outputs_match("1 2", "1  2"));
        assert!(!outputs_match("a\nb", "a b"));
    }

    #[test]
    fn comparison_keeps_internal_line_endings_significant() {
        assert!(!outputs_match("a\r\nb", "a\nb"));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!outputs_match("Hello", "hello"));
    }

    #[test]
    fn empty_outputs_match_whitespace_only_outputs() {
        assert!(outputs_match("   \n", ""));
    }
}
