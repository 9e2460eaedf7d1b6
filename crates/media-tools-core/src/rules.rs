//! Rule-based script checks.
//!
//! [`RuleChecker`] runs an ordered list of [`ContentCheck`]s. The built-in
//! list is scene headers, continuity, then character consistency. The last
//! two are named stages that currently report nothing; they hold their
//! place in the pipeline so real checks can replace them without
//! reordering anything.

use crate::issue::{Issue, Severity};

/// File-type tags that are treated as screenplays.
pub const SCREENPLAY_TYPES: &[&str] = &[".fdx", ".fountain"];

/// Prefixes that mark a scene heading once the line is trimmed.
const SCENE_HEADER_PREFIXES: &[&str] = &["INT.", "EXT."];

/// One independent check over script content.
pub trait ContentCheck: Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Inspect `content` and report any issues found.
    fn check(&self, content: &str, file_type: &str) -> Vec<Issue>;
}

/// Flags screenplays that contain no `INT.`/`EXT.` scene headings.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneHeaderCheck;

impl ContentCheck for SceneHeaderCheck {
    fn name(&self) -> &'static str {
        "scene_headers"
    }

    fn check(&self, content: &str, file_type: &str) -> Vec<Issue> {
        if !SCREENPLAY_TYPES.contains(&file_type) {
            return Vec::new();
        }
        if scene_headers(content).next().is_some() {
            return Vec::new();
        }
        vec![Issue::new(
            "missing_scene_headers",
            "No standard scene headers (INT./EXT.) found",
            "entire script",
            Severity::Medium,
            &[
                "Add proper scene headers starting with INT. or EXT.",
                "Format scene headings according to screenplay standards",
            ],
        )]
    }
}

/// Continuity stage. Reports nothing yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContinuityCheck;

impl ContentCheck for ContinuityCheck {
    fn name(&self) -> &'static str {
        "continuity"
    }

    fn check(&self, _content: &str, _file_type: &str) -> Vec<Issue> {
        Vec::new()
    }
}

/// Character-consistency stage. Reports nothing yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharacterConsistencyCheck;

impl ContentCheck for CharacterConsistencyCheck {
    fn name(&self) -> &'static str {
        "character_consistency"
    }

    fn check(&self, _content: &str, _file_type: &str) -> Vec<Issue> {
        Vec::new()
    }
}

/// Lines that count as scene headings.
pub fn scene_headers(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').filter(|line| {
        let trimmed = line.trim();
        SCENE_HEADER_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
    })
}

/// The issue reported for empty content.
pub fn empty_content_issue() -> Issue {
    Issue::new(
        "empty_content",
        "The script content is empty",
        "entire file",
        Severity::High,
        &["Add content to the script file"],
    )
}

/// Ordered set of content checks.
pub struct RuleChecker {
    checks: Vec<Box<dyn ContentCheck>>,
}

impl Default for RuleChecker {
    fn default() -> Self {
        Self {
            checks: vec![
                Box::new(SceneHeaderCheck),
                Box::new(ContinuityCheck),
                Box::new(CharacterConsistencyCheck),
            ],
        }
    }
}

impl std::fmt::Debug for RuleChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChecker")
            .field("checks", &self.check_names())
            .finish()
    }
}

impl RuleChecker {
    /// Checker with the built-in checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check after the existing ones.
    #[must_use]
    pub fn with_check(mut self, check: impl ContentCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the checks, in run order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check over `content`.
    ///
    /// Empty content short-circuits: the only issue returned is
    /// [`empty_content_issue`] and no check runs.
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn check(&self, content: &str, file_type: &str) -> Vec<Issue> {
        if content.is_empty() {
            return vec![empty_content_issue()];
        }

        let mut issues = Vec::new();
        for check in &self.checks {
            let found = check.check(content, file_type);
            tracing::debug!(check = check.name(), found = found.len(), "check finished");
            issues.extend(found);
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysLow;

    impl ContentCheck for AlwaysLow {
        fn name(&self) -> &'static str {
            "always_low"
        }

        fn check(&self, _content: &str, _file_type: &str) -> Vec<Issue> {
            vec![Issue::new("custom", "", "", Severity::Low, &[])]
        }
    }

    fn kinds(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.kind.as_str()).collect()
    }

    #[test]
    fn empty_content_yields_single_high_issue() {
        let checker = RuleChecker::new().with_check(AlwaysLow);
        let issues = checker.check("", ".fountain");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, "empty_content");
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn screenplay_without_headers_is_flagged() {
        for tag in SCREENPLAY_TYPES {
            let issues = RuleChecker::new().check("Just some prose, no scene markers.", tag);
            assert_eq!(kinds(&issues), ["missing_scene_headers"]);
            assert_eq!(issues[0].severity, Severity::Medium);
            assert_eq!(issues[0].suggestions.len(), 2);
        }
    }

    #[test]
    fn indented_header_counts() {
        let content = "FADE IN:\n\n   EXT. BEACH - NIGHT\nWaves.";
        assert!(RuleChecker::new().check(content, ".fountain").is_empty());
    }

    #[test]
    fn interior_header_counts() {
        let content = "INT. KITCHEN - DAY\nSARAH makes coffee.";
        assert!(RuleChecker::new().check(content, ".fdx").is_empty());
    }

    #[test]
    fn lowercase_prefix_is_not_a_header() {
        let issues = RuleChecker::new().check("int. kitchen - day", ".fountain");
        assert_eq!(kinds(&issues), ["missing_scene_headers"]);
    }

    #[test]
    fn non_screenplay_types_skip_header_check() {
        assert!(RuleChecker::new().check("plain prose", ".txt").is_empty());
        assert!(RuleChecker::new().check("plain prose", ".md").is_empty());
    }

    #[test]
    fn whitespace_only_content_is_not_empty() {
        let issues = RuleChecker::new().check("   \n", ".fountain");
        assert_eq!(kinds(&issues), ["missing_scene_headers"]);
    }

    #[test]
    fn default_pipeline_order() {
        assert_eq!(
            RuleChecker::new().check_names(),
            ["scene_headers", "continuity", "character_consistency"]
        );
    }

    #[test]
    fn custom_checks_run_after_builtins() {
        let checker = RuleChecker::new().with_check(AlwaysLow);
        let issues = checker.check("prose", ".fountain");
        assert_eq!(kinds(&issues), ["missing_scene_headers", "custom"]);
    }

    #[test]
    fn scene_headers_lists_matching_lines() {
        let content = "INT. A\nnothing\n  EXT. B\n";
        let found: Vec<_> = scene_headers(content).map(str::trim).collect();
        assert_eq!(found, ["INT. A", "EXT. B"]);
    }
}
