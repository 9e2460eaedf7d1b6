//! Script loading.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{ScriptResult, ValidationError};

/// Type tag used when a path has no extension.
pub const GENERIC_FILE_TYPE: &str = ".txt";

/// Script content plus the file-type tag that selects which rules apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    /// Full text content.
    pub content: String,
    /// Lower-cased extension including the leading dot, e.g. `.fountain`.
    pub file_type: String,
    /// Where the content came from, if it was a file.
    pub path: Option<Utf8PathBuf>,
}

impl ScriptSource {
    /// Wrap raw text with a caller-supplied type tag.
    pub fn from_text(content: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_type: file_type.into(),
            path: None,
        }
    }
}

/// Derive the type tag for `path`.
pub fn file_type_of(path: &Utf8Path) -> String {
    path.extension().map_or_else(
        || GENERIC_FILE_TYPE.to_string(),
        |ext| format!(".{}", ext.to_lowercase()),
    )
}

/// Read a script file.
///
/// # Errors
///
/// [`ValidationError::NotFound`] if nothing exists at `path`,
/// [`ValidationError::Read`] if it cannot be read as UTF-8 text.
#[tracing::instrument]
pub fn load_file(path: &Utf8Path) -> ScriptResult<ScriptSource> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ValidationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(bytes = content.len(), "script loaded");

    Ok(ScriptSource {
        content,
        file_type: file_type_of(path),
        path: Some(path.to_path_buf()),
    })
}
