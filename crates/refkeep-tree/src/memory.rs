//! In-memory ref tree for testing and ephemeral use.
//!
//! [`MemoryRefTree`] stores entries in a `BTreeMap` protected by a
//! `RwLock`. It implements the full [`RefTree`] trait and additionally
//! counts mutations, which lets tests assert that a pass over an unchanged
//! tree performs no writes or deletes.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{Result, TreeError};
use crate::traits::RefTree;
use crate::types::{RefHash, RefName};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<RefName, RefHash>,
    writes: u64,
    deletes: u64,
}

/// An in-memory implementation of [`RefTree`].
///
/// Data is lost when the tree is dropped.
#[derive(Debug, Default)]
pub struct MemoryRefTree {
    inner: RwLock<Inner>,
}

impl MemoryRefTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.lock_read().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total `write` calls since creation.
    pub fn writes(&self) -> u64 {
        self.lock_read().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Total `delete` calls since creation.
    pub fn deletes(&self) -> u64 {
        self.lock_read().map(|inner| inner.deletes).unwrap_or(0)
    }

    /// Total mutations since creation.
    pub fn mutations(&self) -> u64 {
        self.writes() + self.deletes()
    }

    fn lock_read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| TreeError::Backend(format!("lock poisoned: {e}")))
    }

    fn lock_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| TreeError::Backend(format!("lock poisoned: {e}")))
    }
}

impl RefTree for MemoryRefTree {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RefName>> + '_> {
        let names = match self.lock_read() {
            Ok(inner) => {
                let mut names: Vec<RefName> = inner.entries.keys().cloned().collect();
                // stable sort keeps BTreeMap name order within each depth
                names.sort_by_key(|n| n.segments().count());
                names
            }
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };
        Box::new(names.into_iter().map(Ok))
    }

    fn read(&self, name: &RefName) -> Result<Option<RefHash>> {
        Ok(self.lock_read()?.entries.get(name).cloned())
    }

    fn write(&self, name: &RefName, hash: &RefHash) -> Result<()> {
        let mut inner = self.lock_write()?;
        inner.entries.insert(name.clone(), hash.clone());
        inner.writes += 1;
        Ok(())
    }

    fn delete(&self, name: &RefName) -> Result<()> {
        let mut inner = self.lock_write()?;
        inner.entries.remove(name);
        inner.deletes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> RefName {
        RefName::new(s).unwrap()
    }

    #[test]
    fn write_read_delete_cycle() {
        let tree = MemoryRefTree::new();
        tree.write(&name("main"), &RefHash::from("aaa")).unwrap();
        assert_eq!(tree.read(&name("main")).unwrap(), Some(RefHash::from("aaa")));

        tree.delete(&name("main")).unwrap();
        assert_eq!(tree.read(&name("main")).unwrap(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn read_absent_returns_none() {
        let tree = MemoryRefTree::new();
        assert_eq!(tree.read(&name("nope")).unwrap(), None);
    }

    #[test]
    fn delete_of_absent_entry_is_tolerated() {
        let tree = MemoryRefTree::new();
        tree.delete(&name("ghost")).unwrap();
    }

    #[test]
    fn walk_yields_shallow_entries_first() {
        let tree = MemoryRefTree::new();
        tree.write(&name("deep/nested/leaf"), &RefHash::from("h")).unwrap();
        tree.write(&name("top"), &RefHash::from("h")).unwrap();
        tree.write(&name("mid/leaf"), &RefHash::from("h")).unwrap();

        let walked: Vec<RefName> = tree.walk().map(|r| r.unwrap()).collect();
        assert_eq!(
            walked,
            vec![name("top"), name("mid/leaf"), name("deep/nested/leaf")]
        );
    }

    #[test]
    fn mutation_counters_track_writes_and_deletes() {
        let tree = MemoryRefTree::new();
        assert_eq!(tree.mutations(), 0);

        tree.write(&name("a"), &RefHash::from("1")).unwrap();
        tree.write(&name("a"), &RefHash::from("2")).unwrap();
        tree.delete(&name("a")).unwrap();

        assert_eq!(tree.writes(), 2);
        assert_eq!(tree.deletes(), 1);
        assert_eq!(tree.mutations(), 3);
    }
}
