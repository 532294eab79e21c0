//! Error taxonomy for the configuration engine
//!
//! Every failure in the resolution pipeline is detected synchronously and
//! surfaced to the caller; nothing is downgraded to a warning. The CLI maps
//! any of these to a non-zero exit status.

use std::io;
use std::path::PathBuf;

/// Errors produced while loading, resolving, or persisting project
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Project name fails the allowed-character rule.
    #[error("{0} is not a valid project name")]
    InvalidProjectName(String),

    /// Project name is already registered to a different project root.
    #[error("project name '{name}' is already in use by the project at {root}")]
    NameInUse { name: String, root: PathBuf },

    /// Docroot is absolute or escapes the project root.
    #[error("docroot '{docroot}' is invalid: {reason}")]
    InvalidDocroot { docroot: String, reason: &'static str },

    /// Unknown project type tag.
    #[error("'{0}' is not a valid project type")]
    InvalidProjectType(String),

    /// Configuration operations are never permitted in this directory.
    #[error("localdev config is not allowed in {0}")]
    DisallowedLocation(PathBuf),

    /// A new project was requested inside an existing project's tree.
    #[error("project root '{root}' already contains a project. You may want to remove the existing project before continuing")]
    ConflictingProject { root: PathBuf },

    /// A file in the config file set failed to parse.
    #[error("failed to parse {file}: {message}")]
    MalformedConfig { file: PathBuf, message: String },

    /// A field value failed validation (database spec, hook stage, ...).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// No project configuration exists at or above the working directory.
    #[error("No project configuration currently exists")]
    NoProject,

    /// Write or rename failure while persisting. Not retried.
    #[error("failed to persist configuration: {0}")]
    PersistenceError(String),

    /// Read-side filesystem failure.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
