//! Filesystem-backed ref tree.
//!
//! Leaves are UTF-8 text files holding one hash value plus a single trailing
//! newline; every name segment above the leaf is a directory. [`FsRefTree`]
//! keeps two paths: the tree root, where names resolve, and a creation/
//! pruning boundary at or above the root. Writes create every missing
//! directory from the boundary down, so a tree's own prefix chain (for
//! example a dated archive batch) appears on first use; deletes prune
//! emptied directories from the leaf's parent all the way up toward the
//! boundary, so the prefix chain disappears again with its last leaf.

use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::traits::RefTree;
use crate::types::{RefHash, RefName};

/// Create every missing directory along `name`'s path below `root`,
/// ignoring levels that already exist.
pub fn make_prefix(root: &Path, name: &RefName) -> Result<()> {
    let mut dir = root.to_path_buf();
    for segment in name.segments() {
        dir.push(segment);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(TreeError::io("create directory", dir, e)),
        }
    }
    Ok(())
}

/// Remove the directories along `name`'s path below `root`, deepest first,
/// stopping at the first level that is not empty.
///
/// Levels that are already gone are skipped. Any other removal failure is
/// an error.
pub fn unlink_prefix(root: &Path, name: &RefName) -> Result<()> {
    prune_upward(root, root.join(name.to_path()))
}

/// Remove empty directories from `dir` upward, stopping at the first
/// non-empty directory or at `boundary` (exclusive).
fn prune_upward(boundary: &Path, mut dir: PathBuf) -> Result<()> {
    while dir != boundary && dir.starts_with(boundary) {
        match fs::remove_dir(&dir) {
            Ok(()) => trace!(dir = %dir.display(), "pruned empty directory"),
            Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => break,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(TreeError::io("remove directory", dir, e)),
        }
        if !dir.pop() {
            break;
        }
    }
    Ok(())
}

/// A ref tree stored as nested directories on disk.
pub struct FsRefTree {
    /// Where names resolve: `root/<name>` is the leaf file for `<name>`.
    root: PathBuf,
    /// Directory creation and pruning stop here (exclusive).
    boundary: PathBuf,
    /// `root` relative to `boundary`; `None` when they coincide.
    prefix: Option<RefName>,
}

impl FsRefTree {
    /// A tree whose leaves live under `boundary/prefix`.
    ///
    /// Writes materialize the prefix chain below `boundary` on first use;
    /// deletes prune it away again once the last leaf is gone.
    pub fn new(boundary: impl Into<PathBuf>, prefix: &RefName) -> Self {
        let boundary = boundary.into();
        Self {
            root: boundary.join(prefix.to_path()),
            boundary,
            prefix: Some(prefix.clone()),
        }
    }

    /// A tree rooted directly at `root`, with no prefix chain of its own.
    /// Suitable for read-only source trees.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            boundary: root.clone(),
            root,
            prefix: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn leaf_path(&self, name: &RefName) -> PathBuf {
        self.root.join(name.to_path())
    }

    /// The directory chain `write` must ensure below the boundary: the
    /// tree prefix plus the name's parent segments.
    fn dir_chain(&self, name: &RefName) -> Option<RefName> {
        match (&self.prefix, name.parent()) {
            (Some(prefix), Some(parent)) => Some(prefix.join(&parent)),
            (Some(prefix), None) => Some(prefix.clone()),
            (None, parent) => parent,
        }
    }
}

impl RefTree for FsRefTree {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RefName>> + '_> {
        Box::new(Walk::new(self.root.clone()))
    }

    fn read(&self, name: &RefName) -> Result<Option<RefHash>> {
        let path = self.leaf_path(name);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(RefHash::new(contents.trim_end()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TreeError::io("read ref", path, e)),
        }
    }

    fn write(&self, name: &RefName, hash: &RefHash) -> Result<()> {
        if let Some(chain) = self.dir_chain(name) {
            make_prefix(&self.boundary, &chain)?;
        }
        let path = self.leaf_path(name);
        trace!(name = %name, path = %path.display(), "writing ref");
        fs::write(&path, format!("{hash}\n")).map_err(|e| TreeError::io("write ref", path, e))
    }

    fn delete(&self, name: &RefName) -> Result<()> {
        let path = self.leaf_path(name);
        trace!(name = %name, path = %path.display(), "deleting ref");
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(TreeError::io("remove ref", path, e)),
        }
        match path.parent() {
            Some(parent) => prune_upward(&self.boundary, parent.to_path_buf()),
            None => Ok(()),
        }
    }
}

/// One directory level being scanned.
struct Level {
    prefix: Option<RefName>,
    path: PathBuf,
    entries: fs::ReadDir,
}

/// Breadth-first walk over a tree's leaf files.
///
/// An explicit work queue replaces recursion: each visited directory queues
/// its subdirectories for the next depth level and yields its regular files
/// as they are encountered. Symlinks and non-regular entries are skipped.
/// A missing tree root, or a directory removed while queued, yields
/// nothing rather than failing; the walk is a best-effort incremental
/// snapshot.
struct Walk {
    root: PathBuf,
    queue: VecDeque<Option<RefName>>,
    current: Option<Level>,
}

impl Walk {
    fn new(root: PathBuf) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(None);
        Self {
            root,
            queue,
            current: None,
        }
    }
}

impl Iterator for Walk {
    type Item = Result<RefName>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(mut level) = self.current.take() else {
                let prefix = self.queue.pop_front()?;
                let path = match &prefix {
                    Some(p) => self.root.join(p.to_path()),
                    None => self.root.clone(),
                };
                match fs::read_dir(&path) {
                    Ok(entries) => {
                        self.current = Some(Level {
                            prefix,
                            path,
                            entries,
                        })
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Some(Err(TreeError::io("scan directory", path, e))),
                }
                continue;
            };

            let entry = match level.entries.next() {
                None => continue,
                Some(Err(e)) => {
                    return Some(Err(TreeError::io("scan directory", level.path, e)));
                }
                Some(Ok(entry)) => entry,
            };
            let prefix = level.prefix.clone();
            self.current = Some(level);

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => return Some(Err(TreeError::io("inspect entry", entry.path(), e))),
            };
            if file_type.is_symlink() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(segment) = file_name.to_str() else {
                return Some(Err(TreeError::NonUnicodePath { path: entry.path() }));
            };
            let name = match &prefix {
                Some(p) => p.child(segment),
                None => match RefName::new(segment) {
                    Ok(name) => name,
                    Err(e) => return Some(Err(e)),
                },
            };

            if file_type.is_dir() {
                self.queue.push_back(Some(name));
            } else if file_type.is_file() {
                return Some(Ok(name));
            }
        }
    }
}
