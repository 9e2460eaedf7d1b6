//! HTML export.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::storyboard::{Storyboard, StoryboardFrame};
use crate::text::escape_html;

const STYLE: &str = r"
        body {
            font-family: Arial, sans-serif;
            margin: 20px;
        }
        h1 {
            color: #333;
        }
        .frame {
            margin-bottom: 30px;
            border: 1px solid #ddd;
            padding: 15px;
            border-radius: 5px;
        }
        .frame-header {
            display: flex;
            justify-content: space-between;
        }
        .frame-image {
            max-width: 100%;
            height: auto;
            margin: 10px 0;
        }
        .frame-details {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 10px;
        }
        .frame-description {
            grid-column: 1 / 3;
        }
";

/// `path` expressed relative to the directory `base`.
///
/// Both paths are interpreted as given; when they share no prefix (one
/// absolute, one relative) `path` is returned unchanged.
pub fn relative_to(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() != base.is_absolute() {
        return path.to_path_buf();
    }
    let normal = |p: &Utf8Path| -> Vec<String> {
        p.components()
            .filter(|c| !matches!(c, Utf8Component::CurDir))
            .map(|c| c.as_str().to_string())
            .collect()
    };
    let path_parts = normal(path);
    let base_parts = normal(base);
    let shared = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = Utf8PathBuf::new();
    for _ in shared..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[shared..] {
        rel.push(part);
    }
    rel
}

fn frame_html(frame: &StoryboardFrame, page_dir: &Utf8Path) -> String {
    let image = frame
        .image_path
        .as_deref()
        .map(|path| {
            format!(
                r#"<img class="frame-image" src="{}" alt="Scene {}">"#,
                escape_html(relative_to(path, page_dir).as_str()),
                escape_html(&frame.scene_number)
            )
        })
        .unwrap_or_default();
    let characters: String = frame
        .characters
        .iter()
        .map(|c| format!("<li>{}</li>", escape_html(c)))
        .collect();

    format!(
        r#"
        <div class="frame">
            <div class="frame-header">
                <h2>Scene {number}</h2>
                <div>{angle}, {movement}</div>
            </div>
            {image}
            <div class="frame-details">
                <div class="frame-description">
                    <h3>Description</h3>
                    <p>{description}</p>
                </div>
                <div>
                    <h3>Characters</h3>
                    <ul>
                        {characters}
                    </ul>
                </div>
                <div>
                    <h3>Notes</h3>
                    <p>{notes}</p>
                </div>
            </div>
        </div>
"#,
        number = escape_html(&frame.scene_number),
        angle = escape_html(&frame.camera_angle),
        movement = escape_html(&frame.camera_movement),
        description = escape_html(&frame.description),
        notes = escape_html(&frame.notes),
    )
}

/// Render `storyboard` as a standalone page that will live in `page_dir`.
///
/// Image sources are written relative to `page_dir`.
pub fn render_html(storyboard: &Storyboard, page_dir: &Utf8Path, generated: &str) -> String {
    let title = escape_html(&storyboard.title);
    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Storyboard: {title}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <h1>Storyboard: {title}</h1>
    <p>Generated: {generated}</p>

    <div class="storyboard">
"#
    );
    for frame in &storyboard.frames {
        html.push_str(&frame_html(frame, page_dir));
    }
    html.push_str(
        "
    </div>
</body>
</html>
",
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storyboard::scene::Scene;

    #[test]
    fn sibling_file_is_bare_name() {
        assert_eq!(
            relative_to(Utf8Path::new("/out/sb/scene_1.png"), Utf8Path::new("/out/sb")),
            "scene_1.png"
        );
    }

    #[test]
    fn file_elsewhere_walks_up() {
        assert_eq!(
            relative_to(Utf8Path::new("/out/img/scene_1.png"), Utf8Path::new("/out/sb")),
            "../img/scene_1.png"
        );
        assert_eq!(
            relative_to(Utf8Path::new("out/scene_1.png"), Utf8Path::new("./out/pages/a")),
            "../../scene_1.png"
        );
    }

    #[test]
    fn mixed_roots_are_left_alone() {
        assert_eq!(
            relative_to(Utf8Path::new("/abs/x.png"), Utf8Path::new("rel")),
            "/abs/x.png"
        );
    }

    #[test]
    fn page_lists_frames_with_relative_images() {
        let scene = Scene {
            scene_number: "2".to_string(),
            description: "Lights <flicker>".to_string(),
            characters: vec!["NOOR".to_string()],
            ..Scene::default()
        };
        let storyboard = Storyboard {
            title: "ep1.fountain".to_string(),
            frames: vec![StoryboardFrame::from_scene(
                &scene,
                Some(Utf8PathBuf::from("/tmp/sb/scene_2.png")),
            )],
            output_dir: Utf8PathBuf::from("/tmp/sb"),
        };

        let html = render_html(&storyboard, Utf8Path::new("/tmp/sb"), "2024-05-01 10:00:00");

        assert!(html.contains("<title>Storyboard: ep1.fountain</title>"));
        assert!(html.contains("<p>Generated: 2024-05-01 10:00:00</p>"));
        assert!(html.contains(r#"<img class="frame-image" src="scene_2.png" alt="Scene 2">"#));
        assert!(html.contains("<div>Medium Shot, Static</div>"));
        assert!(html.contains("<li>NOOR</li>"));
        assert!(html.contains("Lights &lt;flicker&gt;"));
    }

    #[test]
    fn frame_without_image_has_no_img_tag() {
        let storyboard = Storyboard {
            title: "t".to_string(),
            frames: vec![StoryboardFrame::from_scene(&Scene::fallback(), None)],
            output_dir: Utf8PathBuf::from("."),
        };
        let html = render_html(&storyboard, Utf8Path::new("."), "now");
        assert!(!html.contains("<img"));
        assert!(html.contains("Default scene"));
    }
}
