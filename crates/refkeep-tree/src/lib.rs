//! Directory-backed ref trees for refkeep.
//!
//! A ref tree is a persistent mapping from hierarchical ref names
//! (`feature/login`) to opaque hash values, materialized on disk as nested
//! directories terminating in a leaf file that holds the hash plus a single
//! trailing newline. This is the same shape git uses for loose refs, and it
//! is the storage substrate the refkeep synchronizer operates on.
//!
//! # Architecture
//!
//! - [`RefName`] / [`RefHash`] are the key and value types. Names are
//!   `/`-joined sequences of non-empty segments; hashes are exact-compare
//!   opaque strings.
//! - [`RefTree`] is the storage seam: `walk`, `read`, `write`, `delete`.
//!   The synchronizer is written against the trait, not a layout.
//! - [`FsRefTree`] is the filesystem instance. Writes create missing
//!   intermediate directories on the way down; deletes prune emptied
//!   directories on the way back up, so no directory outlives its last leaf.
//! - [`MemoryRefTree`] is an in-memory instance for unit tests.
//!
//! None of the operations provide cross-call atomicity or locking. The
//! storage is a plain hierarchical key-value store; callers own the
//! operation ordering that makes interrupted runs safe to re-run.
//!
//! # Modules
//!
//! - [`error`] — Error types for tree operations
//! - [`types`] — [`RefName`] and [`RefHash`]
//! - [`names`] — Ref-name validation for user-supplied input
//! - [`traits`] — The [`RefTree`] trait
//! - [`fs`] — Filesystem-backed [`FsRefTree`] and prefix helpers
//! - [`memory`] — In-memory [`MemoryRefTree`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{Result, TreeError};
pub use fs::{make_prefix, unlink_prefix, FsRefTree};
pub use memory::MemoryRefTree;
pub use names::{validate_ref_name, validate_remote_name};
pub use traits::RefTree;
pub use types::{RefHash, RefName};
