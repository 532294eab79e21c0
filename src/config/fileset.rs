//! Config file set discovery
//!
//! One project's configuration lives in `.localdev/` under the project
//! root: the read-write primary `config.yaml` plus any number of read-only
//! override files matching `config.*.yaml` (conventionally
//! `config.local.yaml`). Overrides are ordered ascending by filename so
//! precedence is deterministic, and every override outranks the primary.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;

/// Directory under the project root that holds the configuration.
pub const CONFIG_DIR: &str = ".localdev";

/// The primary (read-write) configuration file name.
pub const PRIMARY_FILE: &str = "config.yaml";

/// The ordered collection of files contributing to one project's
/// configuration.
#[derive(Debug, Clone)]
pub struct ConfigFileSet {
    /// The primary file path; may not exist yet for a new project.
    pub primary: PathBuf,

    /// Override files in ascending precedence order. Read-only to the
    /// engine; discovered only once a primary file exists.
    pub overrides: Vec<PathBuf>,
}

impl ConfigFileSet {
    /// Discover the file set for a project root by listing `.localdev/`.
    pub fn discover(project_root: &Path) -> Result<Self, ConfigError> {
        let dir = project_root.join(CONFIG_DIR);
        let primary = dir.join(PRIMARY_FILE);
        let mut overrides = Vec::new();

        // Overrides only apply to an existing project; a stray
        // config.local.yaml without a primary is ignored.
        if primary.exists() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with("config.") && name.ends_with(".yaml") && name != PRIMARY_FILE {
                    overrides.push(entry.path());
                }
            }
            overrides.sort();
        }

        Ok(Self { primary, overrides })
    }

    /// All layers in ascending precedence order: primary first, then
    /// overrides.
    pub fn layers(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.primary).chain(self.overrides.iter())
    }
}
