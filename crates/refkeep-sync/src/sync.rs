//! The four-phase archive-and-resync state machine.
//!
//! Archiving (phases 1–2) and resyncing (phases 3–4) are deliberately
//! separate passes: the archive phases decide what to preserve using the
//! old live state, before the resync phases overwrite it. After a run the
//! live trees exactly mirror their sources, and every branch tip that moved
//! non-monotonically or disappeared, and every tag that changed at all,
//! has its prior value recorded in the dead trees.

use tracing::debug;

use refkeep_tree::RefTree;

use crate::error::Result;
use crate::oracle::AncestryOracle;

/// Mutation counts for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Branch tips fossilized into the dead archive.
    pub branches_archived: u64,
    /// Tag values fossilized into the dead archive.
    pub tags_archived: u64,
    /// Live branch entries created or overwritten.
    pub branches_updated: u64,
    /// Live tag entries created or overwritten.
    pub tags_updated: u64,
}

impl RunStats {
    /// `true` if the run mutated nothing.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// One complete pass over a repository's ref trees.
///
/// Borrows its trees and oracle; the filesystem wiring lives in
/// [`run`](crate::run::run) and tests substitute in-memory trees.
pub struct Synchronizer<'a> {
    pub live_branches: &'a dyn RefTree,
    pub live_tags: &'a dyn RefTree,
    pub remote_branches: &'a dyn RefTree,
    pub tag_source: &'a dyn RefTree,
    pub dead_branches: &'a dyn RefTree,
    pub dead_tags: &'a dyn RefTree,
    pub oracle: &'a dyn AncestryOracle,
}

impl Synchronizer<'_> {
    /// Run all four phases in order, aborting at the first failure.
    pub fn run(&self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        self.archive_divergent_branches(&mut stats)?;
        self.archive_changed_tags(&mut stats)?;
        self.resync_branches(&mut stats)?;
        self.resync_tags(&mut stats)?;
        Ok(stats)
    }

    /// Phase 1: fossilize every live branch whose remote counterpart is
    /// gone or is not a straight-line descendant of the live tip.
    ///
    /// A branch whose remote merely advanced is left in place; phase 3
    /// brings it current.
    fn archive_divergent_branches(&self, stats: &mut RunStats) -> Result<()> {
        for name in self.live_branches.walk() {
            let name = name?;
            // the entry can vanish between walk and read; skip, the next
            // run reconverges
            let Some(hash) = self.live_branches.read(&name)? else {
                continue;
            };
            let archive = match self.remote_branches.read(&name)? {
                Some(remote) if remote == hash => false,
                Some(remote) => !self.oracle.is_ancestor(&hash, &remote)?,
                None => true,
            };
            if !archive {
                continue;
            }
            debug!(name = %name, hash = %hash, "archiving diverged branch");
            self.dead_branches.write(&name, &hash)?;
            self.live_branches.delete(&name)?;
            stats.branches_archived += 1;
        }
        Ok(())
    }

    /// Phase 2: fossilize every live tag that differs from its source in
    /// any way, including source absence. Tags are expected to be immutable
    /// once set, so no ancestry leniency applies.
    fn archive_changed_tags(&self, stats: &mut RunStats) -> Result<()> {
        for name in self.live_tags.walk() {
            let name = name?;
            let Some(hash) = self.live_tags.read(&name)? else {
                continue;
            };
            if self.tag_source.read(&name)?.as_ref() == Some(&hash) {
                continue;
            }
            debug!(name = %name, hash = %hash, "archiving changed tag");
            self.dead_tags.write(&name, &hash)?;
            self.live_tags.delete(&name)?;
            stats.tags_archived += 1;
        }
        Ok(())
    }

    /// Phase 3: bring the live branch tree up to the remote, creating or
    /// overwriting any entry that differs. Entries already equal are left
    /// untouched.
    fn resync_branches(&self, stats: &mut RunStats) -> Result<()> {
        for name in self.remote_branches.walk() {
            let name = name?;
            let Some(hash) = self.remote_branches.read(&name)? else {
                continue;
            };
            if self.live_branches.read(&name)?.as_ref() == Some(&hash) {
                continue;
            }
            debug!(name = %name, hash = %hash, "updating live branch");
            self.live_branches.write(&name, &hash)?;
            stats.branches_updated += 1;
        }
        Ok(())
    }

    /// Phase 4: same as phase 3, for tags.
    fn resync_tags(&self, stats: &mut RunStats) -> Result<()> {
        for name in self.tag_source.walk() {
            let name = name?;
            let Some(hash) = self.tag_source.read(&name)? else {
                continue;
            };
            if self.live_tags.read(&name)?.as_ref() == Some(&hash) {
                continue;
            }
            debug!(name = %name, hash = %hash, "updating live tag");
            self.live_tags.write(&name, &hash)?;
            stats.tags_updated += 1;
        }
        Ok(())
    }
}
