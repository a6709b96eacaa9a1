//! The [`RefTree`] trait defining the ref storage interface.
//!
//! Any backend (filesystem, in-memory) implements this trait to expose a
//! tree of refs as a flat name-to-hash mapping. The synchronizer consumes
//! trees exclusively through this seam, so its decision logic never touches
//! a literal directory layout.

use crate::error::Result;
use crate::types::{RefHash, RefName};

/// A mapping from hierarchical ref names to hash values.
///
/// Implementations provide no cross-call atomicity and no locking; callers
/// sequence operations so that an interrupted run converges on re-run.
pub trait RefTree: Send + Sync {
    /// Lazily enumerate every leaf entry in the tree.
    ///
    /// The sequence is finite and non-restartable; call again to re-scan.
    /// Order is breadth-first by directory depth but otherwise unspecified
    /// within a level. The snapshot is taken incrementally as directories
    /// are visited, so concurrent external mutation may or may not be
    /// reflected.
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RefName>> + '_>;

    /// Read the hash stored at `name`, or `None` if the entry is absent.
    ///
    /// Trailing whitespace is trimmed from the stored value. Any failure
    /// other than absence is an error.
    fn read(&self, name: &RefName) -> Result<Option<RefHash>>;

    /// Create or overwrite the entry at `name`.
    ///
    /// Missing intermediate levels are created idempotently first. The two
    /// steps are not atomic; an interrupted write can leave empty
    /// intermediate directories, which a later [`delete`](Self::delete)
    /// prunes.
    fn write(&self, name: &RefName, hash: &RefHash) -> Result<()>;

    /// Remove the entry at `name`, pruning any intermediate levels that
    /// become empty.
    ///
    /// Absence of the entry is tolerated; pruning still runs so stray empty
    /// directories from interrupted writes are collected.
    fn delete(&self, name: &RefName) -> Result<()>;
}
