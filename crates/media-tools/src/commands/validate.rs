//! Validate command: rule checks plus optional AI analysis of a script.

use camino::Utf8PathBuf;
use clap::Args;
use tracing::{debug, instrument};

use media_tools_core::{Config, GeminiClient, ReportFormat, SceneValidator, report};

use super::check_input_file;

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Script file to validate.
    pub file: Utf8PathBuf,

    /// Report format (json or html).
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: String,
}

/// Validate a script and print the report.
///
/// An invalid script is not a failure: the report says so and the command
/// still succeeds. AI analysis runs only when a Gemini key is configured.
#[instrument(name = "cmd_validate", skip_all, fields(file = %args.file))]
pub fn cmd_validate(
    args: ValidateArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, format = %args.format, "executing validate command");

    let format = if global_json {
        ReportFormat::Json
    } else {
        args.format.parse::<ReportFormat>()?
    };

    check_input_file(&args.file, max_input_bytes)?;

    let client = GeminiClient::from_config(config);
    let mut validator = SceneValidator::default();
    if let Some(ref client) = client {
        validator = validator.with_generator(client);
    } else {
        debug!("no Gemini API key configured; skipping AI analysis");
    }

    let result = validator.validate_file(&args.file)?;
    println!("{}", report::render(&result, format));
    Ok(())
}
