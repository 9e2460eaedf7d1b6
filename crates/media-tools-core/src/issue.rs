//! Validation issue and result types.
//!
//! An [`Issue`] is one detected problem. A [`ValidationResult`] is the
//! aggregate of one validation run and is only ever built by
//! [`aggregate`], which keeps `valid` and `summary` derived from the issue
//! list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious an issue is. Only [`Severity::High`] blocks validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks validity.
    High,
    /// Worth fixing; does not block.
    Medium,
    /// Informational.
    Low,
}

impl Severity {
    /// Lowercase name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalised name for display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a severity from free-form service output.
    ///
    /// Case and surrounding whitespace are ignored. Anything unrecognised is
    /// treated as `medium`, the same value a missing severity gets.
    pub fn lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Category, e.g. `missing_scene_headers`.
    #[serde(rename = "issue_type")]
    pub kind: String,
    /// What is wrong.
    pub description: String,
    /// Where in the content the problem sits.
    pub location: String,
    /// How serious it is.
    pub severity: Severity,
    /// Ordered remediation hints.
    pub suggestions: Vec<String>,
}

impl Issue {
    /// Build an issue from borrowed parts.
    pub fn new(
        kind: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        severity: Severity,
        suggestions: &[&str],
    ) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            location: location.into(),
            severity,
            suggestions: suggestions.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    /// Number of high-severity issues.
    pub high: usize,
    /// Number of medium-severity issues.
    pub medium: usize,
    /// Number of low-severity issues.
    pub low: usize,
}

impl SeverityCounts {
    /// Count the issues in `issues` by severity.
    pub fn of(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut acc, issue| {
            match issue.severity {
                Severity::High => acc.high += 1,
                Severity::Medium => acc.medium += 1,
                Severity::Low => acc.low += 1,
            }
            acc
        })
    }

    /// Total number of issues counted.
    pub const fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff no issue is high severity.
    pub valid: bool,
    /// Issues in detection order.
    pub issues: Vec<Issue>,
    /// Human-readable restatement of the severity counts.
    pub summary: String,
}

impl ValidationResult {
    /// Severity counts over [`Self::issues`].
    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::of(&self.issues)
    }
}

/// Merge rule-based and AI-derived issues into a result.
///
/// Rule issues come first. `valid` and `summary` are derived from the
/// merged list and nothing else.
pub fn aggregate(rule_issues: Vec<Issue>, ai_issues: Vec<Issue>) -> ValidationResult {
    let mut issues = rule_issues;
    issues.extend(ai_issues);

    let counts = SeverityCounts::of(&issues);
    ValidationResult {
        valid: counts.high == 0,
        summary: summarize(&counts),
        issues,
    }
}

/// Summary sentence for a set of counts.
pub fn summarize(counts: &SeverityCounts) -> String {
    if counts.total() == 0 {
        "No issues found in the script.".to_string()
    } else {
        format!(
            "Found {} issues: {} high, {} medium, {} low severity.",
            counts.total(),
            counts.high,
            counts.medium,
            counts.low
        )
    }
}
