//! Ref-storage path resolution for a repository.
//!
//! All trees live under the repository's `refs` directory:
//!
//! ```text
//! <repo>/refs/heads/[<ns>/]live/branch/<name>           live branch mirror
//! <repo>/refs/heads/[<ns>/]live/tag/<name>              live tag mirror
//! <repo>/refs/heads/[<ns>/]dead/branch/<Y>/<M>/<D>/<seq>/<name>
//! <repo>/refs/heads/[<ns>/]dead/tag/<Y>/<M>/<D>/<seq>/<name>
//! <repo>/refs/remotes/<remote>/<name>                   read-only source
//! <repo>/refs/tags/<name>                               read-only source
//! ```
//!
//! The optional namespace segment isolates one tracking instance's live and
//! dead trees from another's, so a single repository can track several
//! remotes independently.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use refkeep_tree::RefName;

use crate::error::{Result, SyncError};

/// Resolved tree roots and prefixes for one run.
#[derive(Debug)]
pub struct RepoLayout {
    /// `<repo>/refs/heads` — the boundary all live/dead prefixes hang off.
    pub heads: PathBuf,
    /// `<repo>/refs/remotes/<remote>` — read-only branch source.
    pub remote_branches: PathBuf,
    /// `<repo>/refs/tags` — read-only tag source (tags are shared, not
    /// per-remote).
    pub tag_source: PathBuf,
    /// Live branch prefix, relative to `heads`.
    pub live_branch: RefName,
    /// Live tag prefix, relative to `heads`.
    pub live_tag: RefName,
    /// Dated dead-branch parent, relative to `heads`; batches are numbered
    /// children of this.
    pub dead_branch_parent: RefName,
    /// Dated dead-tag parent, relative to `heads`.
    pub dead_tag_parent: RefName,
}

fn prefixed(namespace: Option<&RefName>, tail: &str) -> Result<RefName> {
    let name = match namespace {
        Some(ns) => RefName::new(format!("{ns}/{tail}"))?,
        None => RefName::new(tail)?,
    };
    Ok(name)
}

impl RepoLayout {
    /// Resolve the layout for `repo`, verifying the fatal precondition that
    /// a `refs/heads` directory exists. Nothing is created or mutated here.
    pub fn resolve(
        repo: &Path,
        namespace: Option<&RefName>,
        remote: &str,
        date: NaiveDate,
    ) -> Result<Self> {
        let refs = repo.join("refs");
        let heads = refs.join("heads");
        if !heads.is_dir() {
            return Err(SyncError::NotARepository {
                path: repo.to_path_buf(),
            });
        }

        let remote = RefName::new(remote)?;
        let date_part = date.format("%Y/%m/%d").to_string();

        Ok(Self {
            remote_branches: refs.join("remotes").join(remote.to_path()),
            tag_source: refs.join("tags"),
            live_branch: prefixed(namespace, "live/branch")?,
            live_tag: prefixed(namespace, "live/tag")?,
            dead_branch_parent: prefixed(namespace, &format!("dead/branch/{date_part}"))?,
            dead_tag_parent: prefixed(namespace, &format!("dead/tag/{date_part}"))?,
            heads,
        })
    }

    pub fn dead_branch_parent_path(&self) -> PathBuf {
        self.heads.join(self.dead_branch_parent.to_path())
    }

    pub fn dead_tag_parent_path(&self) -> PathBuf {
        self.heads.join(self.dead_tag_parent.to_path())
    }

    /// This run's dead-branch batch prefix, relative to `heads`.
    pub fn dead_branch_batch(&self, seq: u64) -> RefName {
        self.dead_branch_parent.child(&format!("{seq:04}"))
    }

    /// This run's dead-tag batch prefix, relative to `heads`.
    pub fn dead_tag_batch(&self, seq: u64) -> RefName {
        self.dead_tag_parent.child(&format!("{seq:04}"))
    }
}
