//! Placeholder frame images.
//!
//! Until an image model is wired in, every scene gets an 800×450 card with
//! its number, heading, wrapped description and up to five characters.
//! The card is laid out as SVG and rasterized with `resvg`; text is turned
//! into outlines using the system fonts.

use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use resvg::{tiny_skia, usvg};
use usvg_text_layout::{TreeTextToPath, fontdb};

use crate::error::{ExportError, ExportResult};
use crate::storyboard::scene::{Scene, frame_file_name};
use crate::text::{escape_html, wrap_greedy};

/// Card width in pixels.
pub const WIDTH: u32 = 800;
/// Card height in pixels.
pub const HEIGHT: u32 = 450;
/// Width budget for wrapped description lines.
pub const WRAP_WIDTH: f32 = 760.0;
/// Characters listed on a card.
pub const MAX_CHARACTERS: usize = 5;

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
const LARGE_FONT: u32 = 20;
const SMALL_FONT: u32 = 14;
/// Advance assumed for every character of the small font.
const SMALL_ADVANCE: f32 = 8.0;
const LINE_HEIGHT: u32 = 20;
const MARGIN: u32 = 20;

/// Width of `line` in the small font.
pub fn measure(line: &str) -> f32 {
    line.chars().count() as f32 * SMALL_ADVANCE
}

/// Description lines as they appear on the card.
pub fn description_lines(description: &str) -> Vec<String> {
    wrap_greedy(description, WRAP_WIDTH, measure)
}

/// One positioned line of text on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    x: u32,
    /// Top of the line box.
    y: u32,
    size: u32,
    text: String,
}

fn layout(scene: &Scene) -> Vec<Label> {
    let number = if scene.scene_number.is_empty() {
        "0"
    } else {
        scene.scene_number.as_str()
    };
    let label = |x, y, size, text: String| Label { x, y, size, text };

    let mut labels = vec![
        label(MARGIN, 20, LARGE_FONT, format!("Scene {number}")),
        label(MARGIN, 50, LARGE_FONT, scene.heading()),
    ];

    let mut y = 90;
    let lines = description_lines(&scene.description);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            y += LINE_HEIGHT;
        }
        labels.push(label(MARGIN, y, SMALL_FONT, line.clone()));
    }

    y += 40;
    labels.push(label(MARGIN, y, SMALL_FONT, "Characters:".to_string()));
    y += LINE_HEIGHT;
    for character in scene.characters.iter().take(MAX_CHARACTERS) {
        labels.push(label(MARGIN * 2, y, SMALL_FONT, format!("- {character}")));
        y += LINE_HEIGHT;
    }

    labels
}

/// The card as an SVG document.
pub fn card_svg(scene: &Scene) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="rgb(240,240,240)"/>"#
    );
    for label in layout(scene) {
        if label.text.is_empty() {
            continue;
        }
        // SVG positions text by its baseline
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" fill="black">{}</text>"#,
            label.x,
            label.y + label.size,
            label.size,
            escape_html(&label.text),
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Rasterizes placeholder cards.
///
/// Holds the font database so system fonts are scanned once per run.
pub struct PlaceholderRenderer {
    fonts: fontdb::Database,
}

impl std::fmt::Debug for PlaceholderRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderRenderer")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderRenderer {
    /// Renderer using the system fonts.
    pub fn new() -> Self {
        let mut fonts = fontdb::Database::new();
        fonts.load_system_fonts();
        tracing::debug!(faces = fonts.len(), "loaded system fonts");
        Self { fonts }
    }

    /// Render `scene` to PNG bytes.
    pub fn render_png(&self, scene: &Scene) -> ExportResult<Vec<u8>> {
        let svg = card_svg(scene);
        let opt = usvg::Options::default();
        let mut tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        tree.convert_text(&self.fonts);

        let mut pixmap = tiny_skia::Pixmap::new(WIDTH, HEIGHT)
            .ok_or_else(|| ExportError::Render("could not allocate pixmap".to_string()))?;
        resvg::render(
            &tree,
            usvg::FitTo::Original,
            tiny_skia::Transform::default(),
            pixmap.as_mut(),
        );
        pixmap
            .encode_png()
            .map_err(|e| ExportError::Render(e.to_string()))
    }

    /// Render `scene` into `output_dir/scene_<n>.png` and return the path.
    #[tracing::instrument(skip(self, scene), fields(scene = %scene.scene_number))]
    pub fn render_to(&self, scene: &Scene, output_dir: &Utf8Path) -> ExportResult<Utf8PathBuf> {
        let path = output_dir.join(frame_file_name(&scene.scene_number));
        let png = self.render_png(scene)?;
        std::fs::write(&path, png).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path, "generated placeholder image");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scene() -> Scene {
        Scene {
            scene_number: "4".to_string(),
            location: "EXT. ROOFTOP".to_string(),
            time_of_day: "DAWN".to_string(),
            description: "The city wakes below while two figures argue about the plan. "
                .repeat(6),
            characters: ["A", "B", "C", "D", "E", "F", "G"]
                .map(String::from)
                .to_vec(),
            ..Scene::default()
        }
    }

    #[test]
    fn wrapped_lines_fit_budget() {
        let lines = description_lines(&scene().description);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure(line) <= WRAP_WIDTH, "{line:?} overflows");
        }
    }

    #[test]
    fn characters_are_capped_at_five() {
        let labels = layout(&scene());
        let listed: Vec<_> = labels
            .iter()
            .filter(|l| l.text.starts_with("- "))
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(listed, ["- A", "- B", "- C", "- D", "- E"]);
    }

    #[test]
    fn heading_and_number_come_first() {
        let labels = layout(&scene());
        assert_eq!(labels[0].text, "Scene 4");
        assert_eq!(labels[1].text, "EXT. ROOFTOP - DAWN");
        assert_eq!(labels[2].y, 90);
    }

    #[test]
    fn svg_escapes_text() {
        let scene = Scene {
            description: "Tom & Jerry <run>".to_string(),
            ..Scene::default()
        };
        let svg = card_svg(&scene);
        assert!(svg.contains("Tom &amp; Jerry &lt;run&gt;"));
        assert!(svg.contains("Scene 0"));
    }

    #[test]
    fn renders_png_file() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();

        let path = PlaceholderRenderer::new().render_to(&scene(), dir).unwrap();

        assert_eq!(path.file_name(), Some("scene_4.png"));
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (WIDTH, HEIGHT));
    }
}
