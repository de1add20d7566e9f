use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the judge can compile and/or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Python,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Cpp => write!(f, "cpp"),
            Language::Python => write!(f, "python"),
        }
    }
}

/// Requests that omit the language fall back to C++.
impl Default for Language {
    fn default() -> Self {
        Language::Cpp
    }
}

/// One hidden test case, fetched from the blob store. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Zero-based position within the problem's declared cases.
    pub index: usize,
    pub input: String,
    pub expected_output: String,
}

/// Classification attached to a non-passing case outcome.
///
/// These are recovered conditions, not errors: the judge never retries a
/// case that produced one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum CaseFailure {
    CompileError(String),
    TimeLimitExceeded(String),
    WrongAnswer(String),
    RuntimeError(String),
}

impl CaseFailure {
    pub fn message(&self) -> &str {
        match self {
            CaseFailure::CompileError(m)
            | CaseFailure::TimeLimitExceeded(m)
            | CaseFailure::WrongAnswer(m)
            | CaseFailure::RuntimeError(m) => m,
        }
    }
}

/// Pass/fail result and diagnostics for one test case within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// One-based test number, matching what end users see.
    pub test: usize,
    pub passed: bool,
    pub actual_output: String,
    pub expected_output: String,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CaseFailure>,
}

impl CaseOutcome {
    pub fn passed(test: usize, actual: String, expected: String, elapsed_ms: u64) -> Self {
        CaseOutcome {
            test,
            passed: true,
            actual_output: actual,
            expected_output: expected,
            elapsed_ms,
            failure: None,
        }
    }

    pub fn failed(
        test: usize,
        actual: String,
        expected: String,
        elapsed_ms: u64,
        failure: CaseFailure,
    ) -> Self {
        CaseOutcome {
            test,
            passed: false,
            actual_output: actual,
            expected_output: expected,
            elapsed_ms,
            failure: Some(failure),
        }
    }
}

/// Final classification of a submission across all of its test cases.
/// Derived from the outcome sequence, never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    RuntimeError,
    /// Submission-level downgrade for any non-accepted run.
    Attempted,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Accepted => "Accepted",
            Verdict::WrongAnswer => "Wrong Answer",
            Verdict::TimeLimitExceeded => "Time Limit Exceeded",
            Verdict::CompilationError => "Compilation Error",
            Verdict::RuntimeError => "Runtime Error",
            Verdict::Attempted => "Attempted",
        };
        write!(f, "{}", s)
    }
}

/// Problem metadata the judge needs: where the cases live and the per-case
/// time budget. Everything else about a problem is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub slug: String,
    pub difficulty: String,
    pub case_count: usize,
    /// Per-case time budget. Zero means the engine's default limit applies.
    pub max_exec_time_ms: u64,
}

impl ProblemSpec {
    /// Blob-store key for the input of test case `index` (zero-based).
    pub fn input_key(&self, index: usize) -> String {
        format!("Problems/{}/{}/input/{}.txt", self.difficulty, self.slug, index)
    }

    /// Blob-store key for the expected output of test case `index`.
    pub fn output_key(&self, index: usize) -> String {
        format!("Problems/{}/{}/output/{}.txt", self.difficulty, self.slug, index)
    }
}

/// Single-shot execution request: run the code once against the given stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub input: String,
}

/// Response for a single-shot run. `success` with stdout and timing on a
/// clean run; otherwise a human-readable, path-scrubbed error string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResponse {
    pub fn ok(stdout: String, execution_time_ms: u64) -> Self {
        RunResponse {
            success: true,
            stdout: Some(stdout),
            execution_time_ms: Some(execution_time_ms),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        RunResponse {
            success: false,
            stdout: None,
            execution_time_ms: None,
            error: Some(message.into()),
        }
    }
}

/// Whether a judging request is an interactive run (sample cases, specific
/// failure surfaced) or a submission (all cases, Accepted-or-Attempted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeMode {
    Run,
    Submit,
}

impl Default for JudgeMode {
    fn default() -> Self {
        JudgeMode::Submit
    }
}

/// Request to judge code against a problem's hidden test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub code: String,
    #[serde(default)]
    pub language: Language,
    pub problem: ProblemSpec,
    #[serde(default)]
    pub mode: JudgeMode,
}

/// Aggregated result of judging a submission or an interactive run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub verdict: Verdict,
    /// Slowest passing case, reported only for accepted runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    pub outcomes: Vec<CaseOutcome>,
}
