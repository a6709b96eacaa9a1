//! The refkeep archive-and-resync engine.
//!
//! One [`run()`] performs a complete pass over a repository's ref storage:
//! every live branch whose upstream counterpart vanished or moved
//! non-monotonically, and every live tag that changed at all, has its prior
//! hash fossilized into a dated, sequence-numbered dead archive before the
//! live trees are resynced to mirror upstream exactly. Archives are
//! permanent records; nothing in this crate ever mutates or deletes one
//! after it is written.
//!
//! The pass is re-run-safe rather than rollback-safe. Every decision is
//! recomputed from current on-disk state, so re-running after a partial
//! failure converges to the same fixed point an uninterrupted run would
//! have reached.
//!
//! # Modules
//!
//! - [`error`] — [`SyncError`], [`OracleError`]
//! - [`seq`] — Archive batch sequence allocation
//! - [`oracle`] — The [`AncestryOracle`] contract and its git subprocess
//!   implementation
//! - [`layout`] — Ref-storage path resolution for a repository
//! - [`sync`] — The four-phase [`Synchronizer`] over abstract ref trees
//! - [`mod@run`] — Filesystem orchestration tying the pieces together

pub mod error;
pub mod layout;
pub mod oracle;
pub mod run;
pub mod seq;
pub mod sync;

pub use error::{OracleError, Result, SyncError};
pub use layout::RepoLayout;
pub use oracle::{AncestryOracle, GitAncestryOracle};
pub use run::{run, RunOptions};
pub use seq::take_next_seq;
pub use sync::{RunStats, Synchronizer};
