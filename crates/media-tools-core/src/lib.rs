//! Core library for media-tools.
//!
//! This crate provides the script validator, storyboard generator and tools
//! updater used by the `media-tools` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`loader`], [`rules`], [`extract`], [`issue`], [`report`] - The
//!   validation pipeline, driven by [`validator::SceneValidator`]
//! - [`gemini`] - Generative text client
//! - [`storyboard`] - Scene parsing, placeholder frames and exports
//! - [`updater`] - Tracking-spreadsheet driven tool updates
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use media_tools_core::{ConfigLoader, ReportFormat, SceneValidator, report};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let result = SceneValidator::default()
//!     .validate_file(Utf8Path::new("pilot.fountain"))
//!     .expect("script should load");
//! println!("{}", report::render(&result, ReportFormat::Json));
//! # let _ = config;
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod issue;
pub mod loader;
pub mod report;
pub mod rules;
pub mod storyboard;
pub mod text;
pub mod updater;
pub mod validator;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    ConfigError, ConfigResult, ExportError, ExportResult, ScriptResult, ServiceError,
    ServiceResult, StoryboardError, StoryboardResult, UpdateError, UpdateResult, ValidationError,
};
pub use gemini::{GeminiClient, GeminiSettings, TextGenerator};
pub use issue::{Issue, Severity, ValidationResult};
pub use report::ReportFormat;
pub use storyboard::{ExportFormat, Storyboard, StoryboardFrame, StoryboardGenerator};
pub use updater::{Credentials, ToolsUpdater, UpdateStats};
pub use validator::SceneValidator;
