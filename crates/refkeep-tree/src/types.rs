//! Core key and value types for ref trees.
//!
//! A [`RefName`] is the hierarchical key (`feature/login`), a [`RefHash`]
//! the opaque value it maps to. Hashes are never parsed or normalized here
//! beyond the trailing-whitespace trim applied when one is read from disk;
//! equality is exact string equality.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TreeError};
use crate::names::validate_structure;

/// A hierarchical, `/`-delimited ref name.
///
/// Invariants, enforced on construction: the name is non-empty, every
/// segment is non-empty, and no segment is `.` or `..`. Each segment maps
/// to one directory level on disk; the final segment names the leaf file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(String);

impl RefName {
    /// Create a ref name, validating its structure.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_structure(&name)?;
        Ok(Self(name))
    }

    /// The `/`-joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The final segment (the leaf file name).
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The name with the final segment removed, or `None` for a
    /// single-segment name.
    pub fn parent(&self) -> Option<RefName> {
        self.0.rsplit_once('/').map(|(head, _)| Self(head.to_string()))
    }

    /// Extend this name with one more segment.
    ///
    /// The segment must itself be valid: non-empty, no `/`, not `.` or
    /// `..`. Callers feeding directory-entry names satisfy this by
    /// construction.
    pub fn child(&self, segment: &str) -> RefName {
        debug_assert!(
            !segment.is_empty() && !segment.contains('/') && segment != "." && segment != "..",
            "invalid ref name segment: {segment:?}"
        );
        Self(format!("{}/{}", self.0, segment))
    }

    /// Concatenate two names.
    pub fn join(&self, other: &RefName) -> RefName {
        Self(format!("{}/{}", self.0, other.0))
    }

    /// The name as a relative filesystem path, one component per segment.
    pub fn to_path(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RefName {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// An opaque content identifier.
///
/// Stored and compared as an exact string. The tree layer trims trailing
/// whitespace when reading a hash from a leaf file; nothing else about the
/// value is interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RefHash(String);

impl RefHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RefHash {
    fn from(hash: &str) -> Self {
        Self::new(hash)
    }
}

impl From<String> for RefHash {
    fn from(hash: String) -> Self {
        Self::new(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_name() {
        let name = RefName::new("main").unwrap();
        assert_eq!(name.as_str(), "main");
        assert_eq!(name.leaf(), "main");
        assert!(name.parent().is_none());
        assert_eq!(name.segments().collect::<Vec<_>>(), vec!["main"]);
    }

    #[test]
    fn nested_name_segments() {
        let name = RefName::new("feature/deep/login").unwrap();
        assert_eq!(
            name.segments().collect::<Vec<_>>(),
            vec!["feature", "deep", "login"]
        );
        assert_eq!(name.leaf(), "login");
        assert_eq!(name.parent().unwrap().as_str(), "feature/deep");
    }

    #[test]
    fn child_and_join_compose() {
        let base = RefName::new("live/branch").unwrap();
        assert_eq!(base.child("main").as_str(), "live/branch/main");

        let tail = RefName::new("dead/tag").unwrap();
        assert_eq!(base.join(&tail).as_str(), "live/branch/dead/tag");
    }

    #[test]
    fn to_path_has_one_component_per_segment() {
        let name = RefName::new("a/b/c").unwrap();
        let path = name.to_path();
        assert_eq!(path.components().count(), 3);
    }

    #[test]
    fn reject_structurally_invalid_names() {
        assert!(RefName::new("").is_err());
        assert!(RefName::new("/leading").is_err());
        assert!(RefName::new("trailing/").is_err());
        assert!(RefName::new("a//b").is_err());
        assert!(RefName::new("a/../b").is_err());
        assert!(RefName::new(".").is_err());
    }

    #[test]
    fn hash_equality_is_exact() {
        assert_eq!(RefHash::from("abc"), RefHash::from("abc"));
        assert_ne!(RefHash::from("abc"), RefHash::from("ABC"));
        assert_ne!(RefHash::from("abc"), RefHash::from("abc "));
    }
}
