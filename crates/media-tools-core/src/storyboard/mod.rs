//! Storyboard generation.
//!
//! A script is split into scenes by the generative text service
//! ([`parser`]), each scene gets a placeholder card ([`placeholder`]), and
//! the resulting [`Storyboard`] can be exported as a PDF, an HTML page,
//! or a folder of frame images.

pub mod generator;
pub mod html;
pub mod parser;
pub mod pdf;
pub mod placeholder;
pub mod scene;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

pub use generator::StoryboardGenerator;
pub use parser::SceneParser;
pub use placeholder::PlaceholderRenderer;
pub use scene::{Scene, StoryboardFrame, frame_file_name};

/// Artifacts a storyboard can be exported as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated PDF.
    Pdf,
    /// Standalone HTML page.
    Html,
    /// Frame images copied to `frames/`.
    Frames,
    /// Every format.
    #[default]
    All,
}

impl ExportFormat {
    /// Whether exporting in `self` includes `other`.
    pub fn includes(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

/// A complete storyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storyboard {
    /// Title, normally the script's file name.
    pub title: String,
    /// Frames in scene order.
    pub frames: Vec<StoryboardFrame>,
    /// Directory that holds images and default export targets.
    pub output_dir: Utf8PathBuf,
}

fn write_file(path: &Utf8Path, contents: impl AsRef<[u8]>) -> ExportResult<()> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Storyboard {
    fn default_target(&self, extension: &str) -> Utf8PathBuf {
        self.output_dir
            .join(format!("{}_storyboard.{extension}", self.title))
    }

    /// Write the PDF to `output` or `<output_dir>/<title>_storyboard.pdf`.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be built or written. Unreadable frame
    /// images are logged and left out.
    #[tracing::instrument(skip(self), fields(title = %self.title))]
    pub fn export_pdf(&self, output: Option<&Utf8Path>) -> ExportResult<Utf8PathBuf> {
        let path = output.map_or_else(|| self.default_target("pdf"), Utf8Path::to_path_buf);
        let generated = chrono::Local::now().format("%Y-%m-%d").to_string();
        let bytes = pdf::render_pdf(self, &generated)?;
        write_file(&path, bytes)?;
        tracing::info!(path = %path, "exported storyboard to PDF");
        Ok(path)
    }

    /// Write the HTML page to `output` or `<output_dir>/<title>_storyboard.html`.
    ///
    /// # Errors
    ///
    /// Fails if the page cannot be written.
    #[tracing::instrument(skip(self), fields(title = %self.title))]
    pub fn export_html(&self, output: Option<&Utf8Path>) -> ExportResult<Utf8PathBuf> {
        let path = output.map_or_else(|| self.default_target("html"), Utf8Path::to_path_buf);
        let page_dir = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        write_file(&path, html::render_html(self, page_dir, &generated))?;
        tracing::info!(path = %path, "exported storyboard to HTML");
        Ok(path)
    }

    /// Copy frame images into `output` or `<output_dir>/frames`.
    ///
    /// Frames without an image on disk are skipped, as are individual copy
    /// failures (logged). Returns the paths written.
    ///
    /// # Errors
    ///
    /// Fails only if the target directory cannot be created.
    #[tracing::instrument(skip(self), fields(title = %self.title))]
    pub fn export_frames(&self, output: Option<&Utf8Path>) -> ExportResult<Vec<Utf8PathBuf>> {
        let dir = output.map_or_else(|| self.output_dir.join("frames"), Utf8Path::to_path_buf);
        std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut exported = Vec::new();
        for frame in &self.frames {
            let Some(source) = frame.image_path.as_deref().filter(|p| p.exists()) else {
                continue;
            };
            let target = dir.join(frame_file_name(&frame.scene_number));
            match std::fs::copy(source, &target) {
                Ok(_) => exported.push(target),
                Err(err) => {
                    tracing::error!(error = %err, source = %source, "error exporting frame");
                }
            }
        }
        tracing::info!(count = exported.len(), dir = %dir, "exported frames");
        Ok(exported)
    }

    /// Export every artifact `format` asks for, returning the files written.
    ///
    /// # Errors
    ///
    /// Stops at the first export that fails.
    pub fn export(&self, format: ExportFormat) -> ExportResult<Vec<Utf8PathBuf>> {
        let mut written = Vec::new();
        if format.includes(ExportFormat::Pdf) {
            written.push(self.export_pdf(None)?);
        }
        if format.includes(ExportFormat::Html) {
            written.push(self.export_html(None)?);
        }
        if format.includes(ExportFormat::Frames) {
            written.extend(self.export_frames(None)?);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storyboard_in(dir: &Utf8Path) -> Storyboard {
        let with_image = dir.join("scene_1.png");
        std::fs::write(&with_image, b"png-bytes").unwrap();
        let scene = |n: &str| Scene {
            scene_number: n.to_string(),
            ..Scene::default()
        };
        Storyboard {
            title: "short.fountain".to_string(),
            frames: vec![
                StoryboardFrame::from_scene(&scene("1"), Some(with_image)),
                StoryboardFrame::from_scene(&scene("2"), Some(dir.join("missing.png"))),
                StoryboardFrame::from_scene(&scene("3"), None),
            ],
            output_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn export_format_includes() {
        assert!(ExportFormat::All.includes(ExportFormat::Pdf));
        assert!(ExportFormat::Html.includes(ExportFormat::Html));
        assert!(!ExportFormat::Html.includes(ExportFormat::Frames));
    }

    #[test]
    fn frames_copy_only_existing_images() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();

        let exported = storyboard_in(dir).export_frames(None).unwrap();

        assert_eq!(exported, [dir.join("frames").join("scene_1.png")]);
        assert_eq!(std::fs::read(&exported[0]).unwrap(), b"png-bytes");
    }

    #[test]
    fn default_targets_use_title() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let mut storyboard = storyboard_in(dir);
        // Keep the PDF free of the fake image
        storyboard.frames.clear();

        let pdf = storyboard.export_pdf(None).unwrap();
        let html = storyboard.export_html(None).unwrap();

        assert_eq!(pdf, dir.join("short.fountain_storyboard.pdf"));
        assert_eq!(html, dir.join("short.fountain_storyboard.html"));
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn export_html_only() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();

        let written = storyboard_in(dir).export(ExportFormat::Html).unwrap();

        assert_eq!(written, [dir.join("short.fountain_storyboard.html")]);
        assert!(!dir.join("frames").exists());
    }
}
