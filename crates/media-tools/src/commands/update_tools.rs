//! Update-tools command: sync tool docs and code from the tracking spreadsheet.

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use media_tools_core::{Config, Credentials, ToolsUpdater, UpdateStats};

/// Log file written into the working directory on every run.
pub const UPDATE_LOG_FILE: &str = "update_log.txt";

/// Arguments for the `update-tools` subcommand.
#[derive(Args, Debug, Default)]
pub struct UpdateToolsArgs {
    /// Log what would change without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    dry_run: bool,
    stats: &'a UpdateStats,
    summary_file: &'a Utf8Path,
    notified: bool,
}

/// Run the tools update in `workdir`.
#[instrument(name = "cmd_update_tools", skip_all, fields(dry_run = args.dry_run))]
pub fn cmd_update_tools(
    args: UpdateToolsArgs,
    global_json: bool,
    config: &Config,
    workdir: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(dry_run = args.dry_run, workdir = %workdir, "executing update-tools command");

    let updater = ToolsUpdater::new(Credentials::from_config(config), args.dry_run);
    let outcome = updater.run(workdir).context("tools update failed")?;

    if global_json {
        let report = RunReport {
            dry_run: args.dry_run,
            stats: &outcome.stats,
            summary_file: &outcome.summary_path,
            notified: outcome.notified,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", outcome.summary);
        println!("{}: {}", "Summary written to".dimmed(), outcome.summary_path.cyan());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn dry_run_writes_summary() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let args = UpdateToolsArgs { dry_run: true };

        cmd_update_tools(args, true, &Config::default(), &dir).unwrap();

        let summary = std::fs::read_to_string(dir.join("last_update_summary.md")).unwrap();
        assert!(summary.contains("**Tools Processed:** 1"));
    }

    #[test]
    fn unwritable_workdir_fails() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().join("missing/dir")).unwrap();
        let err = cmd_update_tools(UpdateToolsArgs::default(), false, &Config::default(), &dir)
            .unwrap_err();
        assert!(err.to_string().contains("tools update failed"));
    }
}
