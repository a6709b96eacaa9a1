//! Filesystem orchestration for one complete pass.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use refkeep_tree::{FsRefTree, RefName};

use crate::error::Result;
use crate::layout::RepoLayout;
use crate::oracle::GitAncestryOracle;
use crate::seq::take_next_seq;
use crate::sync::{RunStats, Synchronizer};

/// Everything one run needs to know.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// The git directory (for example a bare mirror).
    pub repo: PathBuf,
    /// Path to the git binary.
    pub git: PathBuf,
    /// Optional prefix isolating this tracking instance's live and dead
    /// trees.
    pub namespace: Option<RefName>,
    /// Name of the tracking remote whose branches are mirrored.
    pub remote: String,
    /// Calendar date the archive batch is filed under.
    pub date: NaiveDate,
}

/// Perform one archive-and-resync pass over `options.repo`.
///
/// Allocates a fresh archive sequence shared by this run's branch and tag
/// batches, wires up the six filesystem trees and the git oracle, and runs
/// the synchronizer. Archive directories appear on first use; a run that
/// archives nothing creates nothing.
pub fn run(options: &RunOptions) -> Result<RunStats> {
    let layout = RepoLayout::resolve(
        &options.repo,
        options.namespace.as_ref(),
        &options.remote,
        options.date,
    )?;

    let seq = take_next_seq(&[
        layout.dead_branch_parent_path(),
        layout.dead_tag_parent_path(),
    ])?;
    debug!(
        repo = %options.repo.display(),
        remote = %options.remote,
        date = %options.date,
        seq,
        "starting sync pass"
    );

    let live_branches = FsRefTree::new(&layout.heads, &layout.live_branch);
    let live_tags = FsRefTree::new(&layout.heads, &layout.live_tag);
    let dead_branches = FsRefTree::new(&layout.heads, &layout.dead_branch_batch(seq));
    let dead_tags = FsRefTree::new(&layout.heads, &layout.dead_tag_batch(seq));
    let remote_branches = FsRefTree::rooted(&layout.remote_branches);
    let tag_source = FsRefTree::rooted(&layout.tag_source);
    let oracle = GitAncestryOracle::new(&options.git, &options.repo);

    let stats = Synchronizer {
        live_branches: &live_branches,
        live_tags: &live_tags,
        remote_branches: &remote_branches,
        tag_source: &tag_source,
        dead_branches: &dead_branches,
        dead_tags: &dead_tags,
        oracle: &oracle,
    }
    .run()?;

    info!(
        branches_archived = stats.branches_archived,
        tags_archived = stats.tags_archived,
        branches_updated = stats.branches_updated,
        tags_updated = stats.tags_updated,
        "sync pass complete"
    );
    Ok(stats)
}
