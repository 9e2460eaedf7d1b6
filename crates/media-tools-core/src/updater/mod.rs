//! Tools updater.
//!
//! Reads the tools tracking spreadsheet, brings each tool's documentation
//! and repository directory up to date, then posts a markdown summary to
//! Den and writes it to `last_update_summary.md`. Every integration goes
//! through a capability trait from [`capabilities`].

pub mod capabilities;
pub mod tool;

use std::fmt::Write as _;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Config;
use crate::error::{UpdateError, UpdateResult};

pub use capabilities::{
    DocsPublisher, LoggingDocs, LoggingNotifier, LoggingRepo, Notifier, RepoSync,
    SimulatedTracker, TrackerSource,
};
pub use tool::{ToolRecord, UpdateStats};

/// Tracking spreadsheet ID.
pub const SPREADSHEET_ID: &str = "1PR2yfkXdBnM4texzan_nBj79H9Fe_jpvaSZhBGuwTow";
/// Sheet holding the tool rows.
pub const SHEET_NAME: &str = "Tools Tracker";
/// Repository that holds the tools.
pub const GITHUB_REPO: &str = "dxaginfo/den-media-automation-tools";
/// File the summary is written to, relative to the working directory.
pub const SUMMARY_FILE: &str = "last_update_summary.md";

/// Browser link to the tracking spreadsheet.
pub fn spreadsheet_url() -> String {
    format!("https://docs.google.com/spreadsheets/d/{SPREADSHEET_ID}")
}

/// API credentials for the real integrations.
///
/// Neither is required: the logging defaults never use them, so a missing
/// credential is only warned about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// GitHub token (`github_token` / `GITHUB_TOKEN`).
    pub github_token: Option<String>,
    /// Google API key (`google_api_key` / `GOOGLE_API_KEY`).
    pub google_api_key: Option<String>,
}

impl Credentials {
    /// Credentials from loaded configuration.
    ///
    /// The config loader already folds in `GITHUB_TOKEN` and
    /// `GOOGLE_API_KEY`; blank values count as missing.
    pub fn from_config(config: &Config) -> Self {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Self {
            github_token: present(&config.github_token),
            google_api_key: present(&config.google_api_key),
        }
    }

    fn warn_missing(&self) {
        if self.github_token.is_none() {
            tracing::warn!(
                "GitHub token not found. Set GITHUB_TOKEN environment variable or provide in config."
            );
        }
        if self.google_api_key.is_none() {
            tracing::warn!(
                "Google API key not found. Set GOOGLE_API_KEY environment variable or provide in config."
            );
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Counters for the run.
    pub stats: UpdateStats,
    /// Markdown summary.
    pub summary: String,
    /// Where the summary was written.
    pub summary_path: Utf8PathBuf,
    /// Whether Den accepted the summary.
    pub notified: bool,
}

/// Drives one update run.
pub struct ToolsUpdater {
    credentials: Credentials,
    dry_run: bool,
    tracker: Box<dyn TrackerSource>,
    docs: Box<dyn DocsPublisher>,
    repo: Box<dyn RepoSync>,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for ToolsUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsUpdater")
            .field("dry_run", &self.dry_run)
            .field("has_github_token", &self.credentials.github_token.is_some())
            .field("has_google_api_key", &self.credentials.google_api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl ToolsUpdater {
    /// Updater with the logging integrations.
    pub fn new(credentials: Credentials, dry_run: bool) -> Self {
        credentials.warn_missing();
        Self {
            credentials,
            dry_run,
            tracker: Box::new(SimulatedTracker::new(dry_run)),
            docs: Box::new(LoggingDocs::new(dry_run)),
            repo: Box::new(LoggingRepo::new(dry_run)),
            notifier: Box::new(LoggingNotifier::new(dry_run)),
        }
    }

    /// Replace the tracker.
    #[must_use]
    pub fn with_tracker(mut self, tracker: impl TrackerSource + 'static) -> Self {
        self.tracker = Box::new(tracker);
        self
    }

    /// Replace the docs publisher.
    #[must_use]
    pub fn with_docs(mut self, docs: impl DocsPublisher + 'static) -> Self {
        self.docs = Box::new(docs);
        self
    }

    /// Replace the repository sync.
    #[must_use]
    pub fn with_repo(mut self, repo: impl RepoSync + 'static) -> Self {
        self.repo = Box::new(repo);
        self
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Whether this is a dry run.
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The credentials in use.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn update_one(
        &self,
        tool: &ToolRecord,
        today: &str,
        stats: &mut UpdateStats,
    ) -> UpdateResult<()> {
        tracing::info!(tool = %tool.name, "processing tool");

        if tool.has_docs() && self.docs.publish(tool)? {
            stats.docs_updated += 1;
        }

        if tool.has_repository() {
            if self.repo.ensure_directory(tool)? {
                stats.tools_updated += 1;
            }
            if self.repo.update_code(tool)? {
                stats.code_updated += 1;
            }
        }

        if !self.dry_run {
            self.tracker.touch_last_updated(tool, today)?;
        }
        Ok(())
    }

    /// Bring every tool in `tools` up to date.
    ///
    /// A failing tool is logged and counted in [`UpdateStats::errors`];
    /// the remaining tools are still processed.
    #[tracing::instrument(skip_all, fields(tools = tools.len(), dry_run = self.dry_run))]
    pub fn update_tools(&self, tools: &[ToolRecord]) -> UpdateStats {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let mut stats = UpdateStats {
            tools_processed: tools.len(),
            ..UpdateStats::default()
        };

        for tool in tools {
            if let Err(err) = self.update_one(tool, &today, &mut stats) {
                tracing::error!(tool = %tool.name, error = %err, "error updating tool");
                stats.errors += 1;
            }
        }
        stats
    }

    /// Run the full update and write the summary into `workdir`.
    ///
    /// # Errors
    ///
    /// Fails if the tracker cannot be read, Den rejects the summary with an
    /// error, or the summary file cannot be written.
    #[tracing::instrument(skip(self), fields(dry_run = self.dry_run))]
    pub fn run(&self, workdir: &Utf8Path) -> UpdateResult<UpdateOutcome> {
        let started = Instant::now();
        tracing::info!("starting tools update process");

        let tools = self.tracker.fetch_tools()?;
        let stats = self.update_tools(&tools);

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let summary = generate_summary_report(&stats, &timestamp);
        let notified = self.notifier.send(&summary)?;

        let summary_path = workdir.join(SUMMARY_FILE);
        std::fs::write(&summary_path, &summary).map_err(|source| UpdateError::Io {
            path: summary_path.clone(),
            source,
        })?;

        tracing::info!(
            "update process completed in {:.2} seconds",
            started.elapsed().as_secs_f64()
        );
        Ok(UpdateOutcome {
            stats,
            summary,
            summary_path,
            notified,
        })
    }
}

/// Markdown summary of a run, stamped with `timestamp`.
pub fn generate_summary_report(stats: &UpdateStats, timestamp: &str) -> String {
    let mut summary = String::from("# Media Automation Tools Update Report\n\n");
    let _ = write!(summary, "**Generated:** {timestamp}\n\n");

    summary.push_str("## Update Statistics\n\n");
    let _ = writeln!(summary, "- **Tools Processed:** {}", stats.tools_processed);
    let _ = writeln!(summary, "- **Tools Updated:** {}", stats.tools_updated);
    let _ = writeln!(summary, "- **Documentation Updated:** {}", stats.docs_updated);
    let _ = writeln!(summary, "- **Code Updated:** {}", stats.code_updated);
    let _ = writeln!(summary, "- **New Tools Added:** {}", stats.new_tools);
    let _ = write!(summary, "- **Errors Encountered:** {}\n\n", stats.errors);

    if stats.errors > 0 {
        summary.push_str(
            "⚠️ Some errors were encountered during the update process. Check the logs for details.\n\n",
        );
    } else {
        summary.push_str("✅ Update completed successfully with no errors.\n\n");
    }

    summary.push_str("## Details\n\n");
    let _ = write!(
        summary,
        "For detailed information about each tool, please refer to the [tracking spreadsheet]({}).\n\n",
        spreadsheet_url()
    );
    summary
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use tempfile::TempDir;

    struct FailingDocs;

    impl DocsPublisher for FailingDocs {
        fn publish(&self, tool: &ToolRecord) -> UpdateResult<bool> {
            Err(UpdateError::Capability {
                capability: "docs",
                tool: tool.name.clone(),
                message: "permission denied".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingTracker {
        rows: Vec<ToolRecord>,
        touched: Rc<RefCell<Vec<String>>>,
    }

    impl TrackerSource for RecordingTracker {
        fn fetch_tools(&self) -> UpdateResult<Vec<ToolRecord>> {
            Ok(self.rows.clone())
        }

        fn touch_last_updated(&self, tool: &ToolRecord, _date: &str) -> UpdateResult<bool> {
            self.touched.borrow_mut().push(tool.name.clone());
            Ok(true)
        }
    }

    fn row(name: &str, docs: bool, repo: bool) -> ToolRecord {
        ToolRecord {
            name: name.to_string(),
            documentation_url: if docs { format!("https://docs/{name}") } else { String::new() },
            repository_path: if repo { format!("tools/{name}") } else { String::new() },
            ..ToolRecord::default()
        }
    }

    #[test]
    fn live_run_counts_each_step() {
        let tracker = RecordingTracker {
            rows: vec![row("A", true, true), row("B", false, true), row("C", true, false)],
            ..RecordingTracker::default()
        };
        let touched = Rc::clone(&tracker.touched);
        let updater = ToolsUpdater::new(Credentials::default(), false).with_tracker(tracker);

        let stats = updater.update_tools(&updater.tracker.fetch_tools().unwrap());

        assert_eq!(
            stats,
            UpdateStats {
                tools_processed: 3,
                tools_updated: 2,
                docs_updated: 2,
                code_updated: 2,
                new_tools: 0,
                errors: 0,
            }
        );
        assert_eq!(*touched.borrow(), ["A", "B", "C"]);
    }

    #[test]
    fn dry_run_updates_nothing() {
        let tracker = RecordingTracker::default();
        let touched = Rc::clone(&tracker.touched);
        let updater = ToolsUpdater::new(Credentials::default(), true).with_tracker(tracker);

        let stats = updater.update_tools(&SimulatedTracker::rows());

        assert_eq!(stats.tools_processed, 1);
        assert_eq!(stats.tools_updated + stats.docs_updated + stats.code_updated, 0);
        assert_eq!(stats.errors, 0);
        assert!(touched.borrow().is_empty());
    }

    #[test]
    fn failing_tool_is_counted_and_skipped() {
        let updater = ToolsUpdater::new(Credentials::default(), false).with_docs(FailingDocs);

        let stats = updater.update_tools(&[row("A", true, true), row("B", false, true)]);

        assert_eq!(stats.errors, 1);
        // B has no docs, so it is fully processed
        assert_eq!(stats.tools_updated, 1);
        assert_eq!(stats.code_updated, 1);
    }

    #[test]
    fn summary_report_lists_counts() {
        let stats = UpdateStats {
            tools_processed: 4,
            tools_updated: 3,
            docs_updated: 2,
            code_updated: 1,
            new_tools: 0,
            errors: 0,
        };
        let report = generate_summary_report(&stats, "2025-06-21 09:00:00");

        assert!(report.starts_with("# Media Automation Tools Update Report\n\n"));
        assert!(report.contains("**Generated:** 2025-06-21 09:00:00"));
        assert!(report.contains("- **Tools Processed:** 4\n"));
        assert!(report.contains("- **Documentation Updated:** 2\n"));
        assert!(report.contains("✅ Update completed successfully with no errors."));
        assert!(report.contains(&spreadsheet_url()));
    }

    #[test]
    fn summary_report_flags_errors() {
        let stats = UpdateStats {
            errors: 2,
            ..UpdateStats::default()
        };
        let report = generate_summary_report(&stats, "now");
        assert!(report.contains("- **Errors Encountered:** 2\n\n⚠️"));
        assert!(!report.contains("✅"));
    }

    #[test]
    fn run_writes_summary_file() {
        let tmp = TempDir::new().unwrap();
        let workdir = Utf8Path::from_path(tmp.path()).unwrap();

        let outcome = ToolsUpdater::new(Credentials::default(), true)
            .run(workdir)
            .unwrap();

        assert_eq!(outcome.summary_path, workdir.join(SUMMARY_FILE));
        assert!(!outcome.notified);
        let written = std::fs::read_to_string(&outcome.summary_path).unwrap();
        assert_eq!(written, outcome.summary);
        assert!(written.contains("- **Tools Processed:** 1\n"));
    }

    #[test]
    fn credentials_ignore_blank_values() {
        let config = Config {
            github_token: Some("  ".to_string()),
            google_api_key: Some("gkey".to_string()),
            ..Config::default()
        };
        let creds = Credentials::from_config(&config);
        assert!(creds.github_token.is_none());
        assert_eq!(creds.google_api_key.as_deref(), Some("gkey"));
    }
}
