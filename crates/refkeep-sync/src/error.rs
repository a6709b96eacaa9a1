//! Error types for sync operations.
//!
//! All of these are fatal within a run: there is no retry and no degraded
//! continuation. The run aborts at the first failure and the expected
//! recovery path is re-invocation, which reconverges from on-disk state.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use refkeep_tree::TreeError;

/// Errors from the ancestry oracle's external command.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The command could not be started at all.
    #[error("failed to run ancestry command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited with a failure status.
    #[error("ancestry command failed ({status}): {command}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The command produced output inconsistent with its contract: neither
    /// empty nor exactly the queried descendant hash.
    #[error("unexpected output from ancestry command: {command}: {output:?}")]
    UnexpectedOutput { command: String, output: String },
}

/// Errors that can occur during a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository location has no recognizable ref-storage root.
    /// Detected before any mutation.
    #[error("not a git repository (no refs/heads directory): {}", path.display())]
    NotARepository { path: PathBuf },

    /// A ref tree operation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The ancestry oracle failed or broke its contract.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// A filesystem operation outside the ref trees failed.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
