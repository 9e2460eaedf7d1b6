//! PDF export.
//!
//! US Letter pages with three frames each. The first page opens with the
//! storyboard title and generation date. Frame images are embedded as
//! uncompressed RGB image XObjects and drawn 450×100 points.

use camino::Utf8Path;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::{ExportError, ExportResult};
use crate::storyboard::{Storyboard, StoryboardFrame};
use crate::text::take_chars;

/// Frames placed on each page.
pub const FRAMES_PER_PAGE: usize = 3;
/// Characters of description printed per frame.
pub const DESCRIPTION_CHARS: usize = 200;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const LEFT: i64 = 72;
const IMAGE_WIDTH: i64 = 450;
const IMAGE_HEIGHT: i64 = 100;
const BODY_LEADING: i64 = 12;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Pages needed for `frames` frames. A storyboard always has at least one.
pub const fn page_count(frames: usize) -> usize {
    if frames == 0 {
        1
    } else {
        frames.div_ceil(FRAMES_PER_PAGE)
    }
}

/// Text lines printed under a frame's heading and image.
pub fn frame_body(frame: &StoryboardFrame) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Description: {}...",
            take_chars(&frame.description, DESCRIPTION_CHARS)
        ),
        String::new(),
        format!("Camera: {}, {}", frame.camera_angle, frame.camera_movement),
        format!("Characters: {}", frame.characters.join(", ")),
    ];
    if !frame.notes.is_empty() {
        lines.push(format!("Notes: {}", frame.notes));
    }
    lines
}

/// Byte for `c` in `WinAnsiEncoding`, or `?` when the font cannot show it.
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Text string for fonts declared with `WinAnsiEncoding`.
fn pdf_text(text: &str) -> Object {
    Object::String(text.chars().map(win_ansi).collect(), StringFormat::Literal)
}

fn text_ops(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    ops.push(Operation::new("Tj", vec![pdf_text(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Decode `path` and add it to `doc` as an image XObject.
fn image_xobject(doc: &mut Document, path: &Utf8Path) -> ExportResult<ObjectId> {
    let rgb = image::open(path)
        .map_err(|source| ExportError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(width)),
            "Height" => Object::Integer(i64::from(height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        rgb.into_raw(),
    );
    Ok(doc.add_object(stream))
}

struct PageBuilder {
    ops: Vec<Operation>,
    images: Dictionary,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            images: Dictionary::new(),
        }
    }
}

/// Lay out `storyboard` and serialize it to PDF bytes.
///
/// `generated` is the date printed under the title.
pub fn render_pdf(storyboard: &Storyboard, generated: &str) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut pages: Vec<PageBuilder> = vec![PageBuilder::new()];
    let first = &mut pages[0].ops;
    text_ops(
        first,
        BOLD,
        18,
        LEFT,
        PAGE_HEIGHT - 72,
        &format!("Storyboard: {}", storyboard.title),
    );
    text_ops(
        first,
        REGULAR,
        12,
        LEFT,
        PAGE_HEIGHT - 90,
        &format!("Generated: {generated}"),
    );

    let mut y = PAGE_HEIGHT - 130;
    for (index, frame) in storyboard.frames.iter().enumerate() {
        if index > 0 && index % FRAMES_PER_PAGE == 0 {
            pages.push(PageBuilder::new());
            y = PAGE_HEIGHT - 72;
        }
        let image_name = format!("Im{}", index + 1);
        let Some(page) = pages.last_mut() else {
            break;
        };

        text_ops(
            &mut page.ops,
            BOLD,
            12,
            LEFT,
            y,
            &format!("Scene {}", frame.scene_number),
        );
        y -= 15;

        if let Some(path) = frame.image_path.as_deref().filter(|p| p.exists()) {
            match image_xobject(&mut doc, path) {
                Ok(image_id) => {
                    page.images
                        .set(image_name.as_bytes().to_vec(), Object::Reference(image_id));
                    page.ops.push(Operation::new("q", vec![]));
                    page.ops.push(Operation::new(
                        "cm",
                        vec![
                            Object::Integer(IMAGE_WIDTH),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Integer(IMAGE_HEIGHT),
                            Object::Integer(LEFT),
                            Object::Integer(y - IMAGE_HEIGHT),
                        ],
                    ));
                    page.ops.push(Operation::new(
                        "Do",
                        vec![Object::Name(image_name.into_bytes())],
                    ));
                    page.ops.push(Operation::new("Q", vec![]));
                    y -= IMAGE_HEIGHT + 10;
                }
                Err(err) => {
                    tracing::error!(error = %err, "error drawing image");
                    y -= 20;
                }
            }
        }

        for (line_no, line) in frame_body(frame).iter().enumerate() {
            let line_y = y - BODY_LEADING * i64::try_from(line_no).unwrap_or(0);
            if !line.is_empty() {
                text_ops(&mut page.ops, REGULAR, 10, LEFT, line_y, line);
            }
        }
        y -= 60;
    }

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let mut resources = dictionary! {
            "Font" => dictionary! {
                REGULAR => Object::Reference(regular_id),
                BOLD => Object::Reference(bold_id),
            },
        };
        if !page.images.is_empty() {
            resources.set("XObject", Object::Dictionary(page.images));
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(format!("save failed: {e}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storyboard::scene::{Scene, StoryboardFrame};
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn storyboard(frames: usize, image: Option<Utf8PathBuf>) -> Storyboard {
        let frames = (1..=frames)
            .map(|n| {
                let scene = Scene {
                    scene_number: n.to_string(),
                    description: format!("Scene {n} happens (quickly)."),
                    characters: vec!["ANA".to_string()],
                    ..Scene::default()
                };
                StoryboardFrame::from_scene(&scene, image.clone())
            })
            .collect();
        Storyboard {
            title: "pilot.fountain".to_string(),
            frames,
            output_dir: Utf8PathBuf::from("."),
        }
    }

    fn pages_in(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(3), 1);
        assert_eq!(page_count(4), 2);
        assert_eq!(page_count(7), 3);
    }

    #[test]
    fn pdf_has_one_page_per_three_frames() {
        for frames in [0, 1, 3, 4, 7] {
            let bytes = render_pdf(&storyboard(frames, None), "2024-01-01").unwrap();
            assert_eq!(pages_in(&bytes), page_count(frames), "{frames} frames");
        }
    }

    #[test]
    fn description_is_cut_at_two_hundred_chars() {
        let scene = Scene {
            description: "x".repeat(500),
            ..Scene::default()
        };
        let body = frame_body(&StoryboardFrame::from_scene(&scene, None));
        assert_eq!(body[0], format!("Description: {}...", "x".repeat(200)));
        assert_eq!(body[2], "Camera: Medium Shot, Static");
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn notes_line_only_when_present() {
        let scene = Scene {
            key_visual_elements: "red balloon".to_string(),
            ..Scene::default()
        };
        let body = frame_body(&StoryboardFrame::from_scene(&scene, None));
        assert_eq!(body.last().map(String::as_str), Some("Notes: red balloon"));
    }

    #[test]
    fn fonts_declare_win_ansi_encoding() {
        let bytes = render_pdf(&storyboard(1, None), "2024-01-01").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let fonts: Vec<&Dictionary> = doc
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| {
                d.get(b"Type")
                    .and_then(Object::as_name)
                    .is_ok_and(|n| n == b"Font")
            })
            .collect();
        assert_eq!(fonts.len(), 2);
        for font in fonts {
            assert_eq!(
                font.get(b"Encoding").and_then(Object::as_name).unwrap(),
                b"WinAnsiEncoding"
            );
        }
    }

    #[test]
    fn text_maps_to_win_ansi_bytes() {
        let text = "Caf\u{e9} \u{201c}hi\u{201d} \u{2014} \u{20ac}5 \u{4e2d}";
        let Object::String(bytes, _) = pdf_text(text) else {
            panic!("expected a string object");
        };
        assert_eq!(bytes, b"Caf\xe9 \x93hi\x94 \x97 \x805 ?");
    }

    #[test]
    fn frame_images_are_embedded() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("scene_1.png")).unwrap();
        image::RgbImage::from_pixel(8, 4, image::Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();

        let bytes = render_pdf(&storyboard(2, Some(path)), "2024-01-01").unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let images = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| {
                s.dict
                    .get(b"Subtype")
                    .and_then(Object::as_name)
                    .is_ok_and(|n| n == b"Image")
            })
            .count();
        assert_eq!(images, 2);
    }

    #[test]
    fn unreadable_image_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("broken.png")).unwrap();
        std::fs::write(&path, b"not a png").unwrap();

        let bytes = render_pdf(&storyboard(1, Some(path)), "2024-01-01").unwrap();
        assert_eq!(pages_in(&bytes), 1);
    }
}
