// Engine configuration for the arbiter judge
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Hard kill switch for any single child process. Strictly larger than any
/// legitimate per-problem limit.
pub const DEFAULT_HARD_TIMEOUT_MS: u64 = 5_000;
/// Per-problem time budget used when the problem does not declare one.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2_000;
/// Number of leading test cases judged by an interactive "run" request.
pub const DEFAULT_RUN_CASES: usize = 2;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root under which per-job workspaces are created. Created lazily on
    /// first use.
    pub workspace_root: PathBuf,
    pub hard_timeout_ms: u64,
    pub default_time_limit_ms: u64,
    pub run_case_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            workspace_root: PathBuf::from("workspace"),
            hard_timeout_ms: DEFAULT_HARD_TIMEOUT_MS,
            default_time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            run_case_count: DEFAULT_RUN_CASES,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let workspace_root = std::env::var("ARBITER_WORKSPACE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("workspace"));

        let hard_timeout_ms = parse_env("ARBITER_HARD_TIMEOUT_MS", DEFAULT_HARD_TIMEOUT_MS)?;
        let default_time_limit_ms = parse_env("ARBITER_TIME_LIMIT_MS", DEFAULT_TIME_LIMIT_MS)?;
        let run_case_count = parse_env("ARBITER_RUN_CASES", DEFAULT_RUN_CASES as u64)? as usize;

        let config = EngineConfig {
            workspace_root,
            hard_timeout_ms,
            default_time_limit_ms,
            run_case_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at an explicit directory, for embedding and tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        EngineConfig {
            workspace_root: root.into(),
            ..EngineConfig::default()
        }
    }

    /// The hard timeout must dominate the per-problem limit, otherwise the
    /// measured-time check in the orchestrator can never fire.
    pub fn validate(&self) -> Result<()> {
        if self.hard_timeout_ms == 0 {
            bail!("hard timeout must be non-zero");
        }
        if self.hard_timeout_ms <= self.default_time_limit_ms {
            bail!(
                "hard timeout ({}ms) must exceed the default time limit ({}ms)",
                self.hard_timeout_ms,
                self.default_time_limit_ms
            );
        }
        Ok(())
    }
}

fn parse_env(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.hard_timeout_ms > config.default_time_limit_ms);
    }

    #[test]
    fn rejects_inverted_budgets() {
        let config = EngineConfig {
            hard_timeout_ms: 500,
            default_time_limit_ms: 1000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_hard_timeout() {
        let config = EngineConfig {
            hard_timeout_ms: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
