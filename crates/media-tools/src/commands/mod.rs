//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use media_tools_core::ValidationError;

pub mod info;
pub mod storyboard;
pub mod update_tools;
pub mod validate;

/// Preflight an input file: it must exist and fit within the configured limit.
///
/// Only metadata is read here; the core library does the actual reading.
pub fn check_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()).into());
    }
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn file_with(tmp: &TempDir, body: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(tmp.path().join("scene.txt")).unwrap();
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn accepts_file_under_limit() {
        let tmp = TempDir::new().unwrap();
        let path = file_with(&tmp, "INT. HOUSE - DAY");
        assert!(check_input_file(&path, Some(1024)).is_ok());
    }

    #[test]
    fn rejects_oversized_file() {
        let tmp = TempDir::new().unwrap();
        let path = file_with(&tmp, "0123456789");
        let err = check_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn no_limit_accepts_anything() {
        let tmp = TempDir::new().unwrap();
        let path = file_with(&tmp, &"x".repeat(64));
        assert!(check_input_file(&path, None).is_ok());
    }

    #[test]
    fn missing_file_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("absent.fountain")).unwrap();
        let err = check_input_file(&path, None).unwrap_err();
        assert!(err.to_string().starts_with("script file not found"));
    }
}
