//! Scene segmentation through the generative text service.

use camino::Utf8Path;
use serde_json::Value;

use crate::error::ScriptResult;
use crate::gemini::TextGenerator;
use crate::loader;
use crate::storyboard::scene::Scene;
use crate::text;

/// Maximum characters of script sent for scene segmentation.
pub const MAX_SCENE_CHARS: usize = 50_000;

/// Build the segmentation prompt.
pub fn scene_prompt(content: &str) -> String {
    format!(
        "Parse the following script into a structured format with scenes.
For each scene, identify:
1. Scene number
2. Location (INT/EXT)
3. Time of day
4. Description
5. Characters present
6. Key visual elements
7. Camera suggestions

Format your response as a JSON array of scene objects with the fields
scene_number, location, time_of_day, description, characters,
key_visual_elements and camera_suggestions (an object with angle and movement).

Script content:
{content}
"
    )
}

/// The text from the first `[` through the last `]`, if both exist in order.
pub fn array_payload(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (end > start).then(|| &response[start..=end])
}

/// Interpret a service answer as a list of scenes.
///
/// Falls back to a single [`Scene::fallback`] when no array can be found
/// or the array is not valid JSON.
pub fn parse_scenes(response: &str) -> Vec<Scene> {
    let Some(payload) = array_payload(response) else {
        tracing::warn!("could not extract JSON array from response, using default scene structure");
        return vec![Scene::fallback()];
    };

    match serde_json::from_str::<Vec<Value>>(payload) {
        Ok(records) => records.iter().map(Scene::from_value).collect(),
        Err(err) => {
            tracing::error!(error = %err, "error parsing scene JSON");
            vec![Scene::fallback()]
        }
    }
}

/// Splits scripts into scenes using a [`TextGenerator`].
pub struct SceneParser<'g> {
    generator: &'g dyn TextGenerator,
    max_chars: usize,
}

impl std::fmt::Debug for SceneParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneParser")
            .field("model", &self.generator.model())
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

impl<'g> SceneParser<'g> {
    /// Parser using `generator`, truncating at [`MAX_SCENE_CHARS`].
    pub fn new(generator: &'g dyn TextGenerator) -> Self {
        Self {
            generator,
            max_chars: MAX_SCENE_CHARS,
        }
    }

    /// Override the truncation limit.
    #[must_use]
    pub const fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Read `path` and split it into scenes.
    ///
    /// # Errors
    ///
    /// Only loading the file can fail; service problems yield the
    /// fallback scene.
    #[tracing::instrument(skip(self))]
    pub fn parse_file(&self, path: &Utf8Path) -> ScriptResult<Vec<Scene>> {
        tracing::info!(script = %path, "parsing script");
        let source = loader::load_file(path)?;
        Ok(self.parse_content(&source.content))
    }

    /// Split already-loaded content into scenes.
    pub fn parse_content(&self, content: &str) -> Vec<Scene> {
        let (body, truncated) = text::truncate_for_prompt(content, self.max_chars);
        if truncated {
            tracing::warn!(
                max_chars = self.max_chars,
                "script content truncated for scene parsing"
            );
        }

        let scenes = match self.generator.generate(&scene_prompt(&body)) {
            Ok(response) => parse_scenes(&response),
            Err(err) => {
                tracing::error!(error = %err, "scene parsing request failed");
                vec![Scene::fallback()]
            }
        };
        tracing::info!(scenes = scenes.len(), "parsed scenes from script");
        scenes
    }
}
