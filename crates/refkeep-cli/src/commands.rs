use anyhow::Context;
use chrono::Local;

use refkeep_sync::RunOptions;
use refkeep_tree::{validate_ref_name, validate_remote_name, RefName};

use crate::cli::Cli;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let namespace = match cli.namespace.as_deref() {
        Some(ns) => {
            validate_ref_name(ns).context("invalid namespace")?;
            Some(RefName::new(ns)?)
        }
        None => None,
    };
    validate_remote_name(&cli.remote).context("invalid remote name")?;

    let options = RunOptions {
        repo: cli.repo,
        git: cli.git,
        namespace,
        remote: cli.remote,
        date: cli.date.unwrap_or_else(|| Local::now().date_naive()),
    };

    refkeep_sync::run(&options)?;
    Ok(())
}
