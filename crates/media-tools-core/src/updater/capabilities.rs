//! External integrations used by the updater.
//!
//! Each integration is a trait so a real spreadsheet, repository, docs or
//! messaging client can be plugged in. The defaults here only log what they
//! would do; in dry-run mode they log `[DRY RUN] Would …` and report that
//! nothing changed.

use crate::error::UpdateResult;
use crate::updater::tool::ToolRecord;
use crate::updater::{GITHUB_REPO, SHEET_NAME, SPREADSHEET_ID};

/// Source of tool rows, and where their timestamps are written back.
pub trait TrackerSource {
    /// Read every tool row.
    fn fetch_tools(&self) -> UpdateResult<Vec<ToolRecord>>;

    /// Set a tool's `Last Updated` cell to `date`.
    fn touch_last_updated(&self, tool: &ToolRecord, date: &str) -> UpdateResult<bool>;
}

/// Publishes tool documentation.
pub trait DocsPublisher {
    /// Refresh the documentation for `tool`. Returns whether anything changed.
    fn publish(&self, tool: &ToolRecord) -> UpdateResult<bool>;
}

/// Keeps the code repository in step with the tracker.
pub trait RepoSync {
    /// Make sure the tool's directory exists.
    fn ensure_directory(&self, tool: &ToolRecord) -> UpdateResult<bool>;

    /// Push the tool's latest code.
    fn update_code(&self, tool: &ToolRecord) -> UpdateResult<bool>;
}

/// Delivers the run summary to the team.
pub trait Notifier {
    /// Send `summary`. Returns whether it was delivered.
    fn send(&self, summary: &str) -> UpdateResult<bool>;
}

/// Tracker that serves a fixed row in place of the spreadsheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTracker {
    dry_run: bool,
}

impl SimulatedTracker {
    /// Simulated tracker.
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// The rows the simulation serves.
    pub fn rows() -> Vec<ToolRecord> {
        vec![ToolRecord {
            id: "T001".to_string(),
            name: "SceneValidator".to_string(),
            description: "Validates scene structure and continuity in scripts and media projects"
                .to_string(),
            dependencies: "Gemini API, Google Cloud Storage (optional)".to_string(),
            last_updated: "2025-06-21".to_string(),
            repository_path: "tools/SceneValidator".to_string(),
            documentation_url:
                "https://docs.google.com/document/d/1H92VkAMqgW06w0sA0805nQ5FOTnCjeJ2rhIQRJ8gIp8"
                    .to_string(),
            integration_points: "StoryboardGen, ContinuityTracker, TimelineAssembler".to_string(),
            primary_technology: "Python + Gemini API".to_string(),
            implementation_status: "In Progress".to_string(),
        }]
    }
}

impl TrackerSource for SimulatedTracker {
    fn fetch_tools(&self) -> UpdateResult<Vec<ToolRecord>> {
        tracing::info!(
            spreadsheet = SPREADSHEET_ID,
            sheet = SHEET_NAME,
            "retrieving tool data from spreadsheet"
        );
        let rows = Self::rows();
        tracing::info!(count = rows.len(), "retrieved tool data");
        Ok(rows)
    }

    fn touch_last_updated(&self, tool: &ToolRecord, date: &str) -> UpdateResult<bool> {
        tracing::info!(tool = %tool.name, date, "updating last updated timestamp");
        if self.dry_run {
            tracing::info!("[DRY RUN] Would update timestamp for {}", tool.name);
            return Ok(false);
        }
        tracing::info!(tool = %tool.name, "timestamp updated");
        Ok(true)
    }
}

/// Docs publisher that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDocs {
    dry_run: bool,
}

impl LoggingDocs {
    /// Logging docs publisher.
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl DocsPublisher for LoggingDocs {
    fn publish(&self, tool: &ToolRecord) -> UpdateResult<bool> {
        tracing::info!(tool = %tool.name, url = %tool.documentation_url, "updating documentation");
        if self.dry_run {
            tracing::info!("[DRY RUN] Would update documentation for {}", tool.name);
            return Ok(false);
        }
        tracing::info!(tool = %tool.name, "documentation updated");
        Ok(true)
    }
}

/// Repository sync that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRepo {
    dry_run: bool,
}

impl LoggingRepo {
    /// Logging repository sync.
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl RepoSync for LoggingRepo {
    fn ensure_directory(&self, tool: &ToolRecord) -> UpdateResult<bool> {
        if !tool.has_repository() {
            return Ok(false);
        }
        if self.dry_run {
            tracing::info!(
                "[DRY RUN] Would ensure directory exists: {}",
                tool.repository_path
            );
            return Ok(false);
        }
        tracing::info!(
            repo = GITHUB_REPO,
            path = %tool.repository_path,
            "ensured directory exists"
        );
        Ok(true)
    }

    fn update_code(&self, tool: &ToolRecord) -> UpdateResult<bool> {
        tracing::info!(tool = %tool.name, repo = GITHUB_REPO, "updating code");
        if self.dry_run {
            tracing::info!("[DRY RUN] Would update code for {}", tool.name);
            return Ok(false);
        }
        tracing::info!(tool = %tool.name, "code updated");
        Ok(true)
    }
}

/// Den notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier {
    dry_run: bool,
}

impl LoggingNotifier {
    /// Logging notifier.
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Notifier for LoggingNotifier {
    fn send(&self, summary: &str) -> UpdateResult<bool> {
        tracing::info!("sending summary message to Den");
        if self.dry_run {
            tracing::info!("[DRY RUN] Would send message to Den:\n{summary}");
            return Ok(false);
        }
        tracing::info!("summary message sent to Den");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> ToolRecord {
        SimulatedTracker::rows().remove(0)
    }

    #[test]
    fn simulated_tracker_serves_scene_validator() {
        let rows = SimulatedTracker::new(false).fetch_tools().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "T001");
        assert!(rows[0].has_docs());
        assert!(rows[0].has_repository());
    }

    #[test]
    fn dry_run_reports_no_changes() {
        let tool = tool();
        assert!(!LoggingDocs::new(true).publish(&tool).unwrap());
        assert!(!LoggingRepo::new(true).ensure_directory(&tool).unwrap());
        assert!(!LoggingRepo::new(true).update_code(&tool).unwrap());
        assert!(!SimulatedTracker::new(true)
            .touch_last_updated(&tool, "2025-01-01")
            .unwrap());
        assert!(!LoggingNotifier::new(true).send("hi").unwrap());
    }

    #[test]
    fn live_run_reports_changes() {
        let tool = tool();
        assert!(LoggingDocs::new(false).publish(&tool).unwrap());
        assert!(LoggingRepo::new(false).ensure_directory(&tool).unwrap());
        assert!(LoggingRepo::new(false).update_code(&tool).unwrap());
        assert!(LoggingNotifier::new(false).send("hi").unwrap());
    }

    #[test]
    fn directory_needs_repository_path() {
        let tool = ToolRecord::default();
        assert!(!LoggingRepo::new(false).ensure_directory(&tool).unwrap());
    }
}
