//! Scene records returned by the scene parser, and the frames built from them.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Camera angle used when a scene carries no suggestion.
pub const DEFAULT_CAMERA_ANGLE: &str = "Medium Shot";

/// Camera movement used when a scene carries no suggestion.
pub const DEFAULT_CAMERA_MOVEMENT: &str = "Static";

/// One scene as described by the generative service.
///
/// The service answers loosely, so every field is optional and read
/// leniently by [`Scene::from_value`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene number as written by the service (`"1"`, `"12A"`, ...).
    pub scene_number: String,
    /// `INT.`/`EXT.` location.
    pub location: String,
    /// Time of day, e.g. `NIGHT`.
    pub time_of_day: String,
    /// What happens.
    pub description: String,
    /// Characters present, in order of mention.
    pub characters: Vec<String>,
    /// Notable props, set dressing, lighting.
    pub key_visual_elements: String,
    /// Suggested camera angle.
    pub camera_angle: Option<String>,
    /// Suggested camera movement.
    pub camera_movement: Option<String>,
}

impl Scene {
    /// The scene used when the service answer cannot be interpreted.
    pub fn fallback() -> Self {
        Self {
            scene_number: "1".to_string(),
            description: "Default scene".to_string(),
            ..Self::default()
        }
    }

    /// Read a scene from one element of the service's JSON array.
    ///
    /// Numbers are accepted where strings are expected, lists are joined
    /// with `", "`, and anything unrecognised is left empty.
    pub fn from_value(value: &Value) -> Self {
        let camera = value.get("camera_suggestions");
        let camera_field = |name: &str| {
            camera
                .and_then(|c| c.get(name))
                .map(text_of)
                .filter(|s| !s.is_empty())
        };

        Self {
            scene_number: value.get("scene_number").map(text_of).unwrap_or_default(),
            location: value.get("location").map(text_of).unwrap_or_default(),
            time_of_day: value.get("time_of_day").map(text_of).unwrap_or_default(),
            description: value.get("description").map(text_of).unwrap_or_default(),
            characters: value.get("characters").map(list_of).unwrap_or_default(),
            key_visual_elements: value
                .get("key_visual_elements")
                .map(text_of)
                .unwrap_or_default(),
            camera_angle: camera_field("angle"),
            camera_movement: camera_field("movement"),
        }
    }

    /// `"location - time_of_day"`, or just the location when no time is given.
    pub fn heading(&self) -> String {
        if self.time_of_day.is_empty() {
            self.location.clone()
        } else {
            format!("{} - {}", self.location, self.time_of_day)
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn list_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => {
            let text = text_of(other);
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    }
}

/// A single storyboard panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryboardFrame {
    /// Scene number the frame illustrates.
    pub scene_number: String,
    /// Scene description.
    pub description: String,
    /// Rendered frame image, if one was produced.
    pub image_path: Option<Utf8PathBuf>,
    /// Camera angle.
    pub camera_angle: String,
    /// Camera movement.
    pub camera_movement: String,
    /// Characters in frame.
    pub characters: Vec<String>,
    /// Free-form notes (the scene's key visual elements).
    pub notes: String,
}

impl StoryboardFrame {
    /// Build a frame from a parsed scene.
    pub fn from_scene(scene: &Scene, image_path: Option<Utf8PathBuf>) -> Self {
        Self {
            scene_number: scene.scene_number.clone(),
            description: scene.description.clone(),
            image_path,
            camera_angle: scene
                .camera_angle
                .clone()
                .unwrap_or_else(|| DEFAULT_CAMERA_ANGLE.to_string()),
            camera_movement: scene
                .camera_movement
                .clone()
                .unwrap_or_else(|| DEFAULT_CAMERA_MOVEMENT.to_string()),
            characters: scene.characters.clone(),
            notes: scene.key_visual_elements.clone(),
        }
    }
}

/// File name for a scene's frame image: `scene_<n>.png`.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced so a scene number can
/// never escape the output directory. An empty number becomes `0`.
pub fn frame_file_name(scene_number: &str) -> String {
    let stem: String = scene_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "scene_0.png".to_string()
    } else {
        format!("scene_{stem}.png")
    }
}
