//! Verdict aggregation.
//!
//! Pure functions from an outcome sequence to a verdict. Knows nothing
//! about processes, toolchains or stores; the orchestrator hands it the
//! ordered outcomes and the declared case count.

use arbiter_common::types::{CaseFailure, CaseOutcome, SubmissionReport, Verdict};

/// Accepted iff every declared case has a passing outcome. Otherwise the
/// verdict is the specific failure carried by the last outcome, which by
/// the short-circuit rule is the one that stopped the run.
pub fn finalize(outcomes: &[CaseOutcome], case_count: usize) -> Verdict {
    if outcomes.len() == case_count && outcomes.iter().all(|o| o.passed) {
        return Verdict::Accepted;
    }
    match outcomes.last().and_then(|o| o.failure.as_ref()) {
        Some(CaseFailure::CompileError(_)) => Verdict::CompilationError,
        Some(CaseFailure::TimeLimitExceeded(_)) => Verdict::TimeLimitExceeded,
        Some(CaseFailure::WrongAnswer(_)) => Verdict::WrongAnswer,
        Some(CaseFailure::RuntimeError(_)) => Verdict::RuntimeError,
        None => Verdict::Attempted,
    }
}

/// Persisted submissions record anything short of Accepted as Attempted;
/// the detailed failure stays on the outcome sequence.
pub fn submission_verdict(outcomes: &[CaseOutcome], case_count: usize) -> Verdict {
    match finalize(outcomes, case_count) {
        Verdict::Accepted => Verdict::Accepted,
        _ => Verdict::Attempted,
    }
}

/// The slowest passing case dominates the recorded performance.
pub fn max_passing_time_ms(outcomes: &[CaseOutcome]) -> Option<u64> {
    outcomes
        .iter()
        .filter(|o| o.passed)
        .map(|o| o.elapsed_ms)
        .max()
}

/// Report for an interactive run: the specific failure is surfaced.
pub fn run_report(outcomes: Vec<CaseOutcome>, case_count: usize) -> SubmissionReport {
    let verdict = finalize(&outcomes, case_count);
    SubmissionReport {
        verdict,
        execution_time_ms: timing_for(verdict, &outcomes),
        outcomes,
    }
}

/// Report for a submission: non-accepted collapses to Attempted.
pub fn submission_report(outcomes: Vec<CaseOutcome>, case_count: usize) -> SubmissionReport {
    let verdict = submission_verdict(&outcomes, case_count);
    SubmissionReport {
        verdict,
        execution_time_ms: timing_for(verdict, &outcomes),
        outcomes,
    }
}

fn timing_for(verdict: Verdict, outcomes: &[CaseOutcome]) -> Option<u64> {
    if verdict == Verdict::Accepted {
        max_passing_time_ms(outcomes)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(test: usize, elapsed_ms: u64) -> CaseOutcome {
        CaseOutcome::passed(test, "out".to_string(), "out".to_string(), elapsed_ms)
    }

    fn fail(test: usize, failure: CaseFailure) -> CaseOutcome {
        CaseOutcome::failed(test, String::new(), "out".to_string(), 0, failure)
    }

    #[test]
    fn all_passing_outcomes_are_accepted() {
        let outcomes = vec![pass(1, 10), pass(2, 30), pass(3, 20)];
        assert_eq!(finalize(&outcomes, 3), Verdict::Accepted);
    }

    #[test]
    fn accepted_requires_every_declared_case() {
        // All judged cases passed but the run stopped early; not accepted.
        let outcomes = vec![pass(1, 10), pass(2, 30)];
        assert_eq!(finalize(&outcomes, 3), Verdict::Attempted);
    }

    #[test]
    fn last_failure_determines_the_verdict() {
        let outcomes = vec![
            pass(1, 10),
            fail(2, CaseFailure::WrongAnswer("mismatch".to_string())),
        ];
        assert_eq!(finalize(&outcomes, 5), Verdict::WrongAnswer);

        let outcomes = vec![fail(1, CaseFailure::CompileError("bad".to_string()))];
        assert_eq!(finalize(&outcomes, 5), Verdict::CompilationError);

        let outcomes = vec![fail(1, CaseFailure::TimeLimitExceeded("slow".to_string()))];
        assert_eq!(finalize(&outcomes, 5), Verdict::TimeLimitExceeded);

        let outcomes = vec![fail(1, CaseFailure::RuntimeError("crash".to_string()))];
        assert_eq!(finalize(&outcomes, 5), Verdict::RuntimeError);
    }

    #[test]
    fn submissions_collapse_failures_to_attempted() {
        let outcomes = vec![fail(1, CaseFailure::WrongAnswer("mismatch".to_string()))];
        assert_eq!(submission_verdict(&outcomes, 5), Verdict::Attempted);

        let outcomes = vec![pass(1, 10)];
        assert_eq!(submission_verdict(&outcomes, 1), Verdict::Accepted);
    }

    #[test]
    fn accepted_reports_the_slowest_passing_case() {
        let report = submission_report(vec![pass(1, 10), pass(2, 90), pass(3, 40)], 3);
        assert_eq!(report.verdict, Verdict::Accepted);
        assert_eq!(report.execution_time_ms, Some(90));
    }

    #[test]
    fn failed_runs_report_no_timing() {
        let report = run_report(
            vec![pass(1, 10), fail(2, CaseFailure::WrongAnswer("no".to_string()))],
            2,
        );
        assert_eq!(report.verdict, Verdict::WrongAnswer);
        assert_eq!(report.execution_time_ms, None);
    }

    #[test]
    fn zero_declared_cases_are_vacuously_accepted() {
        assert_eq!(finalize(&[], 0), Verdict::Accepted);
    }
}
