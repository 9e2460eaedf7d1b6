//! Error types for media-tools-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A component that cannot run without a credential did not get one.
    #[error("{what} not found. Set {env} environment variable or provide `{key}` in config.")]
    MissingCredential {
        /// Human-readable credential name.
        what: &'static str,
        /// Config key that would supply it.
        key: &'static str,
        /// Environment variable that would supply it.
        env: &'static str,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the validation pipeline.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The input script does not exist.
    #[error("script file not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The input script exists but could not be read.
    #[error("failed to read {path}")]
    Read {
        /// File that failed to read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A report format other than `json` or `html` was requested.
    #[error("unsupported report format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias using [`ValidationError`].
pub type ScriptResult<T> = Result<T, ValidationError>;

/// Failures talking to, or interpreting, the generative text service.
///
/// These never abort a run; callers turn them into placeholder output.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The HTTP request failed before a response arrived.
    #[error("request to generative service failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("generative service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response did not contain any generated text.
    #[error("generative service returned no text")]
    EmptyResponse,

    /// The generated text did not contain the expected JSON payload.
    #[error("could not parse generated JSON: {0}")]
    Parse(String),
}

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors writing storyboard artifacts.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure.
    #[error("failed to write {path}")]
    Io {
        /// Path being written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Decoding a frame image for embedding failed.
    #[error("failed to load image {path}: {source}")]
    Image {
        /// Image path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Rasterizing a placeholder frame failed.
    #[error("failed to render placeholder: {0}")]
    Render(String),

    /// Building or serializing the PDF failed.
    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

/// Result type alias using [`ExportError`].
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that stop storyboard generation.
#[derive(Error, Debug)]
pub enum StoryboardError {
    /// The generator could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The script could not be loaded.
    #[error(transparent)]
    Script(#[from] ValidationError),

    /// An artifact could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type alias using [`StoryboardError`].
pub type StoryboardResult<T> = Result<T, StoryboardError>;

/// Errors raised by the tools updater.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// A tracker, repository, docs or messaging capability failed.
    #[error("{capability} failed for {tool}: {message}")]
    Capability {
        /// Which capability failed.
        capability: &'static str,
        /// Tool being processed.
        tool: String,
        /// Failure detail.
        message: String,
    },

    /// Writing the summary file failed.
    #[error("failed to write {path}")]
    Io {
        /// Path being written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`UpdateError`].
pub type UpdateResult<T> = Result<T, UpdateError>;
