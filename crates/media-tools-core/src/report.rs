//! Report rendering for validation results.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::issue::ValidationResult;
use crate::text::escape_html;

/// Output format for a validation report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Standalone HTML page.
    Html,
}

impl ReportFormat {
    /// Lowercase format name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            _ => Err(ValidationError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `result` in the requested format.
pub fn render(result: &ValidationResult, format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => render_json(result),
        ReportFormat::Html => render_html(result),
    }
}

/// Pretty-printed JSON with fields `valid`, `issues`, `summary`.
pub fn render_json(result: &ValidationResult) -> String {
    // Plain strings, bools and vectors cannot fail to serialize
    serde_json::to_string_pretty(result).unwrap_or_default()
}

const HTML_STYLE: &str = "body{font-family:Arial;max-width:800px;margin:0 auto;padding:20px}\
.valid{color:green}.invalid{color:red}\
.high{color:red}.medium{color:orange}.low{color:blue}\
table{width:100%;border-collapse:collapse}\
td,th{border:1px solid #ddd;padding:8px}";

/// Standalone HTML page. All interpolated text is escaped.
pub fn render_html(result: &ValidationResult) -> String {
    let (status_class, status_label) = if result.valid {
        ("valid", "Valid")
    } else {
        ("invalid", "Invalid")
    };

    let mut html = String::new();
    html.push_str("<html><head><title>Scene Validation Report</title>");
    let _ = write!(html, "<style>{HTML_STYLE}</style></head><body>");
    html.push_str("<h1>Scene Validation Report</h1>");
    let _ = write!(
        html,
        "<h2 class=\"{status_class}\">Status: {status_label}</h2>"
    );
    let _ = write!(
        html,
        "<h3>Summary</h3><p>{}</p>",
        escape_html(&result.summary)
    );

    if result.issues.is_empty() {
        html.push_str("<p>No issues found!</p>");
    } else {
        html.push_str("<h3>Issues</h3><table>");
        html.push_str(
            "<tr><th>Type</th><th>Description</th><th>Location</th><th>Severity</th><th>Suggestions</th></tr>",
        );
        for issue in &result.issues {
            let suggestions: String = issue
                .suggestions
                .iter()
                .map(|s| format!("<li>{}</li>", escape_html(s)))
                .collect();
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td><ul>{}</ul></td></tr>",
                escape_html(&issue.kind),
                escape_html(&issue.description),
                escape_html(&issue.location),
                issue.severity.as_str(),
                issue.severity.label(),
                suggestions,
            );
        }
        html.push_str("</table>");
    }

    html.push_str("</body></html>");
    html
}
