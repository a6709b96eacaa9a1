//! The ancestry oracle: "is B a straight-line descendant of A?".
//!
//! The synchronizer consults the oracle to distinguish a branch that moved
//! forward (benign, no archiving) from one whose history was rewritten
//! (fossilize the old tip). The real implementation shells out to git; the
//! trait seam lets synchronizer tests script answers instead.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::trace;

use refkeep_tree::RefHash;

use crate::error::OracleError;

/// Answers linear-ancestry queries between two hashes.
pub trait AncestryOracle {
    /// Returns `true` if `descendant` lies on a strict ancestry path from
    /// `ancestor`, `false` if no such path exists. Any inconsistent answer
    /// from the underlying implementation is an error, never a guess.
    fn is_ancestor(
        &self,
        ancestor: &RefHash,
        descendant: &RefHash,
    ) -> std::result::Result<bool, OracleError>;
}

/// Oracle backed by `git rev-list -n1 --ancestry-path <a>..<d>`.
///
/// The query asks for the ancestry path strictly after `ancestor` up to and
/// including `descendant`, limited to a single result. The contract:
///
/// - no output: no path, `Ok(false)`
/// - exactly the descendant hash: `Ok(true)`
/// - a failure exit status, or any other output: fatal
///   [`OracleError`] carrying the command and what was observed
///
/// The repository location is passed to the child via `GIT_DIR` on the
/// spawned command only; the parent environment is never touched. There is
/// no timeout: a hung git hangs the run.
pub struct GitAncestryOracle {
    git: PathBuf,
    git_dir: PathBuf,
}

impl GitAncestryOracle {
    pub fn new(git: impl Into<PathBuf>, git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            git_dir: git_dir.into(),
        }
    }

    fn render_command(&self, range: &str) -> String {
        format!(
            "{} rev-list -n1 --ancestry-path {range}",
            self.git.display()
        )
    }
}

impl AncestryOracle for GitAncestryOracle {
    fn is_ancestor(
        &self,
        ancestor: &RefHash,
        descendant: &RefHash,
    ) -> std::result::Result<bool, OracleError> {
        let range = format!("{ancestor}..{descendant}");
        let command = self.render_command(&range);
        trace!(%command, git_dir = %self.git_dir.display(), "querying ancestry");

        let output = Command::new(&self.git)
            .args(["rev-list", "-n1", "--ancestry-path", &range])
            .env("GIT_DIR", &self.git_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| OracleError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OracleError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim_end();
        if stdout.is_empty() {
            return Ok(false);
        }
        if stdout == descendant.as_str() {
            return Ok(true);
        }
        Err(OracleError::UnexpectedOutput {
            command,
            output: stdout.to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Write an executable stub standing in for git.
    fn stub_git(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-git");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn hashes() -> (RefHash, RefHash) {
        (RefHash::from("aaa111"), RefHash::from("bbb222"))
    }

    #[test]
    fn empty_output_means_no_ancestry() {
        let tmp = tempfile::tempdir().unwrap();
        let git = stub_git(tmp.path(), "exit 0");
        let oracle = GitAncestryOracle::new(git, tmp.path());

        let (a, d) = hashes();
        assert!(!oracle.is_ancestor(&a, &d).unwrap());
    }

    #[test]
    fn descendant_echo_means_ancestry_holds() {
        let tmp = tempfile::tempdir().unwrap();
        // print the part of the <a>..<d> range argument after the dots
        let git = stub_git(tmp.path(), r#"printf '%s\n' "${4##*..}""#);
        let oracle = GitAncestryOracle::new(git, tmp.path());

        let (a, d) = hashes();
        assert!(oracle.is_ancestor(&a, &d).unwrap());
    }

    #[test]
    fn failure_status_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let git = stub_git(tmp.path(), "echo 'fatal: bad revision' >&2; exit 128");
        let oracle = GitAncestryOracle::new(git, tmp.path());

        let (a, d) = hashes();
        let err = oracle.is_ancestor(&a, &d).unwrap_err();
        match err {
            OracleError::CommandFailed { stderr, .. } => {
                assert!(stderr.contains("bad revision"), "stderr was {stderr:?}");
            }
            other => panic!("expected CommandFailed, got {other}"),
        }
    }

    #[test]
    fn mismatching_output_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let git = stub_git(tmp.path(), "echo deadbeef");
        let oracle = GitAncestryOracle::new(git, tmp.path());

        let (a, d) = hashes();
        let err = oracle.is_ancestor(&a, &d).unwrap_err();
        match err {
            OracleError::UnexpectedOutput { output, .. } => assert_eq!(output, "deadbeef"),
            other => panic!("expected UnexpectedOutput, got {other}"),
        }
    }

    #[test]
    fn multi_line_output_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let git = stub_git(tmp.path(), r#"printf '%s\n%s\n' "${4##*..}" extra"#);
        let oracle = GitAncestryOracle::new(git, tmp.path());

        let (a, d) = hashes();
        assert!(matches!(
            oracle.is_ancestor(&a, &d),
            Err(OracleError::UnexpectedOutput { .. })
        ));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let oracle = GitAncestryOracle::new(tmp.path().join("no-such-git"), tmp.path());

        let (a, d) = hashes();
        assert!(matches!(
            oracle.is_ancestor(&a, &d),
            Err(OracleError::Spawn { .. })
        ));
    }

    #[test]
    fn git_dir_is_passed_to_the_child() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("seen-git-dir");
        let git = stub_git(
            tmp.path(),
            &format!(r#"printf '%s' "$GIT_DIR" > {}"#, marker.display()),
        );
        let oracle = GitAncestryOracle::new(git, tmp.path().join("repo.git"));

        let (a, d) = hashes();
        assert!(!oracle.is_ancestor(&a, &d).unwrap());
        let seen = fs::read_to_string(&marker).unwrap();
        assert_eq!(seen, tmp.path().join("repo.git").display().to_string());
    }
}
