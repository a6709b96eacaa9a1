//! Archive batch sequence allocation.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, SyncError};

/// Compute the next free archive sequence number across `parents`.
///
/// Lists the immediate children of each given directory (skipping parents
/// that do not exist), parses each child's name as a non-negative integer
/// (silently ignoring names that do not parse), and returns one more than
/// the maximum seen, or `1` if none were found.
///
/// Called once per run with both the branch- and tag-archive parents for
/// the run's date, so both kinds share a single sequence number even when
/// one kind has more historical batches than the other.
pub fn take_next_seq(parents: &[PathBuf]) -> Result<u64> {
    let mut seq = 0u64;

    for dir in parents {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(SyncError::Io {
                    op: "list archive directory",
                    path: dir.clone(),
                    source: e,
                })
            }
        };

        for entry in entries {
            let entry = entry.map_err(|e| SyncError::Io {
                op: "list archive directory",
                path: dir.clone(),
                source: e,
            })?;
            if let Some(num) = entry.file_name().to_str().and_then(|s| s.parse::<u64>().ok()) {
                seq = seq.max(num);
            }
        }
    }

    debug!(seq = seq + 1, "allocated archive sequence");
    Ok(seq + 1)
}
