//! Error types for ref tree operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during ref tree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The ref name is structurally invalid.
    #[error("invalid ref name: {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A directory entry's name is not valid UTF-8 and cannot become a
    /// ref name segment.
    #[error("non-unicode directory entry: {}", path.display())]
    NonUnicodePath { path: PathBuf },

    /// A filesystem operation failed for a reason the storage contract does
    /// not tolerate.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A storage backend failed outside of filesystem I/O.
    #[error("ref tree backend: {0}")]
    Backend(String),
}

impl TreeError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
