//! Ref-name validation for user-supplied input.
//!
//! Two tiers. `validate_structure` enforces only what the storage layout
//! requires (non-empty `/`-separated segments, no `.`/`..`) and backs
//! [`RefName::new`]; a walk over a tree written by another tool must not
//! reject what that tool created. [`validate_ref_name`] adds git-style
//! naming rules and applies to names arriving from the command line, such
//! as the namespace.
//!
//! [`RefName::new`]: crate::types::RefName::new

use crate::error::{Result, TreeError};

/// Characters that are forbidden anywhere in a user-supplied ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> TreeError {
    TreeError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Structural validation: what any stored ref name must satisfy.
pub(crate) fn validate_structure(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }
    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(invalid(name, "segments must not be empty"));
        }
        if segment == "." || segment == ".." {
            return Err(invalid(name, format!("segment {segment:?} is reserved")));
        }
        if segment.contains('\0') {
            return Err(invalid(name, "segments must not contain NUL"));
        }
    }
    Ok(())
}

/// Validate a user-supplied ref name (for example a namespace), following
/// git-style conventions on top of the structural rules.
///
/// # Examples
///
/// ```
/// use refkeep_tree::validate_ref_name;
///
/// assert!(validate_ref_name("mirrors/upstream").is_ok());
/// assert!(validate_ref_name("").is_err());
/// assert!(validate_ref_name("bad..name").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    validate_structure(name)?;

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
        }
    }

    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }

    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }

    if name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.lock'"));
    }

    for segment in name.split('/') {
        if segment.starts_with('.') || segment.ends_with('.') {
            return Err(invalid(
                name,
                format!("segment must not start or end with '.': {segment:?}"),
            ));
        }
    }

    Ok(())
}

/// Validate a remote name. Must be a single segment.
pub fn validate_remote_name(name: &str) -> Result<()> {
    if name.contains('/') {
        return Err(invalid(name, "remote name must not contain '/'"));
    }
    validate_ref_name(name)
}
