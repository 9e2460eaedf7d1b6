//! Storyboard command: script → frames → PDF/HTML/image exports.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use media_tools_core::{Config, ExportFormat, GeminiClient, Storyboard, StoryboardGenerator};

use super::check_input_file;

/// Arguments for the `storyboard` subcommand.
#[derive(Args, Debug)]
pub struct StoryboardArgs {
    /// Script file to turn into a storyboard.
    pub script: Utf8PathBuf,

    /// Directory for images and exports (default: `<script dir>/storyboard`).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<Utf8PathBuf>,

    /// What to export.
    #[arg(long, value_enum, default_value_t)]
    pub format: ExportFormat,
}

#[derive(Serialize)]
struct StoryboardSummary<'a> {
    title: &'a str,
    output_dir: &'a Utf8Path,
    frames: usize,
    images: usize,
    written: &'a [Utf8PathBuf],
}

impl<'a> StoryboardSummary<'a> {
    fn new(storyboard: &'a Storyboard, written: &'a [Utf8PathBuf]) -> Self {
        Self {
            title: &storyboard.title,
            output_dir: &storyboard.output_dir,
            frames: storyboard.frames.len(),
            images: storyboard
                .frames
                .iter()
                .filter(|f| f.image_path.is_some())
                .count(),
            written,
        }
    }
}

fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("analyzing script");
    bar
}

/// Generate a storyboard and export it.
#[instrument(name = "cmd_storyboard", skip_all, fields(script = %args.script))]
pub fn cmd_storyboard(
    args: StoryboardArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        script = %args.script,
        output = ?args.output,
        format = ?args.format,
        "executing storyboard command"
    );

    config.require_gemini_key()?;
    check_input_file(&args.script, max_input_bytes)?;

    let client = GeminiClient::from_config(config).context("Gemini client unavailable")?;
    let generator = StoryboardGenerator::new(config, &client)?;

    let bar = progress_bar(global_json || quiet);
    let storyboard = generator
        .generate_with_progress(&args.script, args.output.as_deref(), |done, total| {
            bar.set_length(total as u64);
            bar.set_message("rendering frames");
            bar.set_position(done as u64);
        })
        .with_context(|| format!("failed to generate storyboard for {}", args.script))?;
    bar.finish_and_clear();

    let written = storyboard
        .export(args.format)
        .with_context(|| format!("failed to export storyboard to {}", storyboard.output_dir))?;

    let summary = StoryboardSummary::new(&storyboard, &written);
    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {} ({} frames, {} images)",
            "Storyboard:".green(),
            summary.title.bold(),
            summary.frames,
            summary.images,
        );
        for path in summary.written {
            println!("  {}", path.cyan());
        }
    }
    Ok(())
}
