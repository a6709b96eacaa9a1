use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Preserve another repository's branches and tags at the ref level.
///
/// Each invocation mirrors the current remote branches and tags into a
/// live tree, after fossilizing the previous value of any branch whose
/// history was rewritten or deleted upstream, and of any tag that changed
/// at all. Meant to run repeatedly from an automation pipeline against a
/// mirror of the remote.
#[derive(Parser)]
#[command(name = "refkeep", version)]
pub struct Cli {
    /// Path to the git repo
    pub repo: PathBuf,

    /// Path to the git binary
    #[arg(short, long, default_value = "git")]
    pub git: PathBuf,

    /// Associate this namespace with the tracked remote branches/tags
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// The name of the tracking remote
    #[arg(short, long, default_value = "origin")]
    pub remote: String,

    /// Override the current date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Log per-ref decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
