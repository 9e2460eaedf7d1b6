//! AI-backed issue extraction.
//!
//! Sends script content to a [`TextGenerator`] with a fixed instruction
//! template and maps the JSON it answers with onto [`Issue`] records.
//! Nothing in here fails the pipeline: a service error or an unparseable
//! answer becomes one low-severity issue describing what went wrong.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::gemini::TextGenerator;
use crate::issue::{Issue, Severity};
use crate::text;

/// Maximum characters of script sent for issue analysis.
pub const MAX_ANALYSIS_CHARS: usize = 30_000;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json(.*?)```").expect("valid regex"));
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));

/// Locate the JSON payload inside a free-form model answer.
///
/// Tries a fenced block tagged `json`, then the first fenced block of any
/// kind, then the whole text. The result is trimmed.
pub fn json_payload(response: &str) -> &str {
    JSON_FENCE
        .captures(response)
        .or_else(|| ANY_FENCE.captures(response))
        .and_then(|caps| caps.get(1))
        .map_or(response, |m| m.as_str())
        .trim()
}

/// Parse issue records out of a model answer.
///
/// Accepts a top-level array of records or an object with an `issues`
/// array. An object without `issues` yields no records. Missing fields get
/// placeholder values, but an entry that is not an object rejects the whole
/// payload.
pub fn parse_issues(response: &str) -> ServiceResult<Vec<Issue>> {
    let payload = json_payload(response);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| ServiceError::Parse(e.to_string()))?;

    let records: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("issues") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => {
                return Err(ServiceError::Parse(format!(
                    "`issues` is not an array: {other}"
                )));
            }
            None => &[],
        },
        other => {
            return Err(ServiceError::Parse(format!(
                "expected an array or object, got {other}"
            )));
        }
    };

    records.iter().map(issue_from_record).collect()
}

fn issue_from_record(record: &Value) -> ServiceResult<Issue> {
    if !record.is_object() {
        return Err(ServiceError::Parse(format!(
            "issue record is not an object: {record}"
        )));
    }
    let field = |name: &str, default: &str| {
        record
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };
    let suggestions = record
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Issue {
        kind: field("issue_type", "unknown"),
        description: field("description", "No description provided"),
        location: field("location", "unknown"),
        severity: record
            .get("severity")
            .and_then(Value::as_str)
            .map_or(Severity::Medium, Severity::lenient),
        suggestions,
    })
}

/// Build the analysis prompt around (possibly truncated) script content.
pub fn analysis_prompt(content: &str) -> String {
    format!(
        "Analyze the following script content for potential issues:

1. Identify continuity problems (e.g., objects appearing/disappearing, time inconsistencies)
2. Check for character consistency issues
3. Identify structural problems in the narrative
4. Look for logical flaws or plot holes

Respond in JSON format with found issues, each containing:
- issue_type: The category of issue
- description: Clear description of the problem
- location: Where in the script the issue occurs
- severity: \"high\", \"medium\", or \"low\"
- suggestions: Array of suggestions to fix the issue

Script content:
{content}
"
    )
}

/// Issue reported when the service call itself fails.
pub fn analysis_error_issue(err: &ServiceError) -> Issue {
    Issue::new(
        "gemini_analysis_error",
        format!("Error during Gemini analysis: {err}"),
        "analysis system",
        Severity::Low,
        &["Check Gemini API configuration", "Verify API key is valid"],
    )
}

/// Issue reported when the answer cannot be parsed.
pub fn parsing_error_issue() -> Issue {
    Issue::new(
        "gemini_parsing_error",
        "Error parsing Gemini analysis response",
        "analysis system",
        Severity::Low,
        &["Check Gemini API service status", "Try analyzing a shorter script"],
    )
}

/// Runs script content through a [`TextGenerator`] and collects issues.
pub struct IssueExtractor<'g> {
    generator: &'g dyn TextGenerator,
    max_chars: usize,
}

impl std::fmt::Debug for IssueExtractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueExtractor")
            .field("model", &self.generator.model())
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

impl<'g> IssueExtractor<'g> {
    /// Extractor using `generator`, truncating at [`MAX_ANALYSIS_CHARS`].
    pub fn new(generator: &'g dyn TextGenerator) -> Self {
        Self {
            generator,
            max_chars: MAX_ANALYSIS_CHARS,
        }
    }

    /// Override the truncation limit.
    #[must_use]
    pub const fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Analyse `content`. Always returns; failures become a single issue.
    #[tracing::instrument(
        skip_all,
        fields(model = self.generator.model(), content_len = content.len())
    )]
    pub fn extract(&self, content: &str) -> Vec<Issue> {
        let (body, truncated) = text::truncate_for_prompt(content, self.max_chars);
        if truncated {
            tracing::warn!(
                original_chars = content.chars().count(),
                max_chars = self.max_chars,
                "script content truncated for analysis"
            );
        }

        let response = match self.generator.generate(&analysis_prompt(&body)) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "error during Gemini analysis");
                return vec![analysis_error_issue(&err)];
            }
        };

        match parse_issues(&response) {
            Ok(issues) => {
                tracing::debug!(found = issues.len(), "analysis parsed");
                issues
            }
            Err(err) => {
                tracing::error!(error = %err, "error parsing Gemini response");
                vec![parsing_error_issue()]
            }
        }
    }
}
