//! Script → storyboard.

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Config;
use crate::error::{ConfigResult, ExportError, StoryboardResult};
use crate::gemini::TextGenerator;
use crate::storyboard::parser::SceneParser;
use crate::storyboard::placeholder::PlaceholderRenderer;
use crate::storyboard::scene::{Scene, StoryboardFrame};
use crate::storyboard::Storyboard;

/// Directory name used when no output directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "storyboard";

/// Builds storyboards from script files.
pub struct StoryboardGenerator<'g> {
    parser: SceneParser<'g>,
    renderer: Option<PlaceholderRenderer>,
    image_model: String,
}

impl std::fmt::Debug for StoryboardGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryboardGenerator")
            .field("parser", &self.parser)
            .field("generate_images", &self.renderer.is_some())
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl<'g> StoryboardGenerator<'g> {
    /// Set up a generator.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`](crate::error::ConfigError::MissingCredential)
    /// when no Gemini API key is configured.
    pub fn new(config: &Config, generator: &'g dyn TextGenerator) -> ConfigResult<Self> {
        config.require_gemini_key()?;
        let renderer = config.generate_images.then(PlaceholderRenderer::new);
        Ok(Self {
            parser: SceneParser::new(generator),
            renderer,
            image_model: config.gemini_image_model.clone(),
        })
    }

    /// Whether frames get placeholder images.
    pub const fn generates_images(&self) -> bool {
        self.renderer.is_some()
    }

    /// Image model configured for frame generation.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Split `script` into scenes.
    ///
    /// # Errors
    ///
    /// Fails if the script cannot be read.
    pub fn parse_script(&self, script: &Utf8Path) -> StoryboardResult<Vec<Scene>> {
        Ok(self.parser.parse_file(script)?)
    }

    /// Generate a storyboard for `script`.
    ///
    /// Images go to `output_dir`, or `<script dir>/storyboard` when none is
    /// given; the directory is created if missing.
    ///
    /// # Errors
    ///
    /// Fails if the script cannot be read or the output directory cannot be
    /// created. A frame whose image fails to render keeps no image.
    pub fn generate_from_script(
        &self,
        script: &Utf8Path,
        output_dir: Option<&Utf8Path>,
    ) -> StoryboardResult<Storyboard> {
        self.generate_with_progress(script, output_dir, |_, _| {})
    }

    /// [`Self::generate_from_script`], calling `progress(done, total)` after
    /// each frame.
    ///
    /// # Errors
    ///
    /// As [`Self::generate_from_script`].
    #[tracing::instrument(skip(self, progress))]
    pub fn generate_with_progress<F>(
        &self,
        script: &Utf8Path,
        output_dir: Option<&Utf8Path>,
        mut progress: F,
    ) -> StoryboardResult<Storyboard>
    where
        F: FnMut(usize, usize),
    {
        tracing::info!(script = %script, "generating storyboard from script");
        let output_dir =
            output_dir.map_or_else(|| default_output_dir(script), Utf8Path::to_path_buf);
        std::fs::create_dir_all(&output_dir).map_err(|source| ExportError::Io {
            path: output_dir.clone(),
            source,
        })?;

        let scenes = self.parse_script(script)?;
        let total = scenes.len();
        let mut frames = Vec::with_capacity(total);
        for (done, scene) in scenes.iter().enumerate() {
            let image_path = self.renderer.as_ref().and_then(|renderer| {
                renderer
                    .render_to(scene, &output_dir)
                    .map_err(|err| {
                        tracing::error!(
                            scene = %scene.scene_number,
                            error = %err,
                            "error generating image for scene"
                        );
                    })
                    .ok()
            });
            frames.push(StoryboardFrame::from_scene(scene, image_path));
            progress(done + 1, total);
        }

        let storyboard = Storyboard {
            title: script.file_name().unwrap_or(script.as_str()).to_string(),
            frames,
            output_dir,
        };
        tracing::info!(frames = storyboard.frames.len(), "created storyboard");
        Ok(storyboard)
    }
}

/// `<script dir>/storyboard`.
pub fn default_output_dir(script: &Utf8Path) -> Utf8PathBuf {
    script
        .parent()
        .unwrap_or_else(|| Utf8Path::new(""))
        .join(DEFAULT_OUTPUT_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, StoryboardError};
    use crate::extract::tests::Canned;
    use tempfile::TempDir;

    fn config(generate_images: bool) -> Config {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            generate_images,
            ..Config::default()
        }
    }

    fn script_in(tmp: &TempDir) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(tmp.path().join("short.fountain")).unwrap();
        std::fs::write(&path, "INT. OFFICE - DAY\nPhones ring.\n\nEXT. STREET - NIGHT\nRain.")
            .unwrap();
        path
    }

    const TWO_SCENES: &str = r#"Here you go:
[
  {"scene_number": "1", "location": "INT. OFFICE", "time_of_day": "DAY",
   "description": "Phones ring.", "characters": ["DANA"],
   "camera_suggestions": {"angle": "Wide Shot", "movement": "Pan"}},
  {"scene_number": 2, "location": "EXT. STREET", "description": "Rain.",
   "key_visual_elements": "puddles"}
]"#;

    #[test]
    fn missing_key_is_a_config_error() {
        let canned = Canned::ok("[]");
        let err = StoryboardGenerator::new(&Config::default(), &canned).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn frames_follow_scenes_without_images() {
        let tmp = TempDir::new().unwrap();
        let script = script_in(&tmp);
        let canned = Canned::ok(TWO_SCENES);
        let generator = StoryboardGenerator::new(&config(false), &canned).unwrap();

        let storyboard = generator.generate_from_script(&script, None).unwrap();

        assert_eq!(storyboard.title, "short.fountain");
        assert_eq!(storyboard.output_dir, default_output_dir(&script));
        assert!(storyboard.output_dir.is_dir());
        assert_eq!(storyboard.frames.len(), 2);
        assert_eq!(storyboard.frames[0].camera_angle, "Wide Shot");
        assert_eq!(storyboard.frames[1].scene_number, "2");
        assert_eq!(storyboard.frames[1].notes, "puddles");
        assert!(storyboard.frames.iter().all(|f| f.image_path.is_none()));
    }

    #[test]
    fn images_are_rendered_into_output_dir() {
        let tmp = TempDir::new().unwrap();
        let script = script_in(&tmp);
        let out = Utf8PathBuf::try_from(tmp.path().join("out")).unwrap();
        let canned = Canned::ok(TWO_SCENES);
        let generator = StoryboardGenerator::new(&config(true), &canned).unwrap();

        let mut seen = Vec::new();
        let storyboard = generator
            .generate_with_progress(&script, Some(&out), |done, total| seen.push((done, total)))
            .unwrap();

        assert_eq!(seen, [(1, 2), (2, 2)]);
        assert_eq!(
            storyboard.frames[0].image_path.as_deref(),
            Some(out.join("scene_1.png").as_path())
        );
        assert!(out.join("scene_2.png").is_file());
    }

    #[test]
    fn unparseable_answer_gives_default_frame() {
        let tmp = TempDir::new().unwrap();
        let script = script_in(&tmp);
        let canned = Canned::ok("no scenes, sorry");
        let generator = StoryboardGenerator::new(&config(false), &canned).unwrap();

        let storyboard = generator.generate_from_script(&script, None).unwrap();

        assert_eq!(storyboard.frames.len(), 1);
        assert_eq!(storyboard.frames[0].description, "Default scene");
    }

    #[test]
    fn missing_script_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let canned = Canned::ok("[]");
        let generator = StoryboardGenerator::new(&config(false), &canned).unwrap();
        let script = Utf8PathBuf::try_from(tmp.path().join("nope.fountain")).unwrap();

        let err = generator.generate_from_script(&script, None).unwrap_err();
        assert!(matches!(err, StoryboardError::Script(_)));
    }
}
