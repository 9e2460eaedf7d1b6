//! The script validation pipeline.
//!
//! Load → rule checks → optional AI extraction → aggregate. Each stage is
//! handed to [`SceneValidator`] explicitly, so a validator with no
//! [`TextGenerator`] simply skips the AI stage.

use camino::Utf8Path;

use crate::error::ScriptResult;
use crate::extract::IssueExtractor;
use crate::gemini::TextGenerator;
use crate::issue::{ValidationResult, aggregate};
use crate::loader::{self, ScriptSource};
use crate::rules::RuleChecker;

/// Validates scene structure and continuity in scripts.
pub struct SceneValidator<'g> {
    checker: RuleChecker,
    generator: Option<&'g dyn TextGenerator>,
}

impl std::fmt::Debug for SceneValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneValidator")
            .field("checker", &self.checker)
            .field("model", &self.generator.map(|g| g.model()))
            .finish()
    }
}

impl Default for SceneValidator<'_> {
    fn default() -> Self {
        Self::new(RuleChecker::default())
    }
}

impl<'g> SceneValidator<'g> {
    /// Validator running `checker` with no AI stage.
    pub fn new(checker: RuleChecker) -> Self {
        Self {
            checker,
            generator: None,
        }
    }

    /// Enable the AI stage.
    #[must_use]
    pub fn with_generator(mut self, generator: &'g dyn TextGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Whether the AI stage will run.
    pub const fn ai_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Load and validate a script file.
    ///
    /// # Errors
    ///
    /// Fails only when the file is missing or unreadable. Every later stage
    /// reports problems as issues.
    pub fn validate_file(&self, path: &Utf8Path) -> ScriptResult<ValidationResult> {
        let source = loader::load_file(path)?;
        Ok(self.validate_source(&source))
    }

    /// Validate already-loaded content.
    pub fn validate_source(&self, source: &ScriptSource) -> ValidationResult {
        self.validate_content(&source.content, &source.file_type)
    }

    /// Validate raw content tagged with `file_type` (e.g. `.fountain`).
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn validate_content(&self, content: &str, file_type: &str) -> ValidationResult {
        let rule_issues = self.checker.check(content, file_type);

        // Nothing else is worth running on an empty script
        if content.is_empty() {
            return aggregate(rule_issues, Vec::new());
        }

        let ai_issues = self
            .generator
            .map(|generator| IssueExtractor::new(generator).extract(content))
            .unwrap_or_default();

        let result = aggregate(rule_issues, ai_issues);
        tracing::info!(
            valid = result.valid,
            issues = result.issues.len(),
            "validation finished"
        );
        result
    }
}
