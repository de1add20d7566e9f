//! Per-job workspace management.
//!
//! Every job gets its own UUID-named directory under the workspace root
//! holding the staged source, the stdin file, and (for compiled languages)
//! the build artifact. The directory is removed when the guard drops, on
//! every exit path, so nothing a submission created outlives its run.

use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

use crate::errors::EngineError;

/// Scoped handle to one job's files. Dropping it tears the workspace down.
#[derive(Debug)]
pub struct JobWorkspace {
    id: Uuid,
    dir: PathBuf,
    source_path: PathBuf,
    input_path: PathBuf,
    artifact_path: PathBuf,
}

impl JobWorkspace {
    /// Stage the source and stdin files under a fresh job directory.
    ///
    /// The workspace root is created lazily on first use; failure to create
    /// it is fatal and aborts the job before any execution is attempted.
    pub async fn create(
        root: &Path,
        source_file_name: &str,
        code: &str,
        stdin: &str,
    ) -> Result<Self, EngineError> {
        let id = Uuid::new_v4();
        let dir = root.join(id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(EngineError::Workspace)?;

        let ws = JobWorkspace {
            id,
            source_path: dir.join(source_file_name),
            input_path: dir.join("stdin.txt"),
            artifact_path: dir.join("main.bin"),
            dir,
        };

        tokio::fs::write(&ws.source_path, code)
            .await
            .map_err(EngineError::Workspace)?;
        tokio::fs::write(&ws.input_path, stdin)
            .await
            .map_err(EngineError::Workspace)?;

        Ok(ws)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Per-job build artifact location. Unique per workspace, so concurrent
    /// jobs never overwrite each other's binaries.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        // Idempotent teardown: files already removed by an earlier step are
        // not an error.
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(job_id = %self.id, error = %e, "Failed to remove job workspace"),
        }
    }
}
