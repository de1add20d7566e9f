//! Test-case store seam.
//!
//! The engine treats problem data as a blob store keyed by stable
//! path-like identifiers (`Problems/{difficulty}/{slug}/input/{i}.txt`).
//! The production deployment fronts an object store; the engine only needs
//! `fetch`, so the seam stays small and easy to double in tests.

use std::path::PathBuf;

use async_trait::async_trait;

use arbiter_common::types::{ProblemSpec, TestCase};

use crate::errors::EngineError;

#[async_trait]
pub trait TestCaseStore: Send + Sync {
    /// Fetch the blob at `key` as text. Read-only; a failed fetch is fatal
    /// for the request that needed it.
    async fn fetch(&self, key: &str) -> Result<String, EngineError>;
}

/// Directory-backed store: keys resolve to paths under a root directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }
}

#[async_trait]
impl TestCaseStore for FsStore {
    async fn fetch(&self, key: &str) -> Result<String, EngineError> {
        let path = self.root.join(key);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| EngineError::Upstream(format!("fetch {}: {}", key, e)))
    }
}

/// Fetch one test case's input and expected output by index.
pub async fn fetch_case(
    store: &dyn TestCaseStore,
    problem: &ProblemSpec,
    index: usize,
) -> Result<TestCase, EngineError> {
    let input = store.fetch(&problem.input_key(index)).await?;
    let expected_output = store.fetch(&problem.output_key(index)).await?;
    Ok(TestCase {
        index,
        input,
        expected_output,
    })
}
