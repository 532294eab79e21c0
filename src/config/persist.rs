//! Atomic persistence of the primary configuration file
//!
//! Writes only `.localdev/config.yaml`, never an override file. The write
//! goes to a temp file in the same directory followed by a rename, so a
//! crash mid-write never leaves a truncated primary file. Failures are
//! surfaced as `PersistenceError` and never retried.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::fileset::{CONFIG_DIR, PRIMARY_FILE};
use super::schema::ProjectConfig;

/// Contents of the managed `.localdev/.gitignore`: overrides and the
/// ignore file itself stay untracked, the primary stays tracked.
const GITIGNORE: &str = "\
# Managed by localdev. config.yaml is meant to be committed.
/.gitignore
/config.*.yaml
";

/// Serialize the base configuration to the project's primary file,
/// creating `.localdev/` if needed. Returns the primary file path.
pub fn write_primary(project_root: &Path, config: &ProjectConfig) -> Result<PathBuf, ConfigError> {
    let dir = project_root.join(CONFIG_DIR);
    fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", dir.display())))?;

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| ConfigError::PersistenceError(e.to_string()))?;

    let path = dir.join(PRIMARY_FILE);
    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, &yaml)
        .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", tmp.display())))?;
    fs::rename(&tmp, &path)
        .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", path.display())))?;

    write_gitignore(&dir)?;

    Ok(path)
}

fn write_gitignore(config_dir: &Path) -> Result<(), ConfigError> {
    let path = config_dir.join(".gitignore");
    // Only written when missing; a user-edited ignore file is left alone.
    if path.exists() {
        return Ok(());
    }
    fs::write(&path, GITIGNORE)
        .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", path.display())))
}
