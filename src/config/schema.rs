//! Project configuration schema (.localdev/config.yaml)
//!
//! `ProjectConfig` is the on-disk document for one project. Every field
//! carries `#[serde(default)]` and is skipped on serialization when it holds
//! its zero value, so an unset field is simply absent from the file. The
//! zero value is also what the merge and reset logic treat as "not set".

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::ConfigError;

/// Database engine and version, e.g. `mariadb` / `10.11`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDesc {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub db_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl DatabaseDesc {
    pub fn new(db_type: &str, version: &str) -> Self {
        Self {
            db_type: db_type.to_string(),
            version: version.to_string(),
        }
    }

    /// Parse a `TYPE:VERSION` flag value.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        match spec.split_once(':') {
            Some((db_type, version)) if !db_type.is_empty() && !version.is_empty() => {
                Ok(Self::new(db_type, version))
            }
            _ => Err(ConfigError::ValidationError(format!(
                "invalid database '{spec}': expected TYPE:VERSION, e.g. mariadb:10.11"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.db_type.is_empty() && self.version.is_empty()
    }
}

/// A single hook task: task-type → command, e.g. `exec-host: touch hello`.
pub type HookTask = BTreeMap<String, String>;

/// Lifecycle stages that may carry hooks.
pub const HOOK_STAGES: &[&str] = &[
    "pre-config",
    "post-config",
    "pre-start",
    "post-start",
    "pre-stop",
    "post-stop",
    "pre-import-db",
    "post-import-db",
    "pre-import-files",
    "post-import-files",
    "pre-pause",
    "post-pause",
    "pre-snapshot",
    "post-snapshot",
    "pre-restore-snapshot",
    "post-restore-snapshot",
];

/// Base configuration for one project.
///
/// The persisted `type` may be a legacy alias (`drupal`); consumers must go
/// through [`crate::project_type::ProjectType::resolve`] to get the
/// canonical tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub project_type: String,

    /// Relative to the project root; `""` means the root itself. Stored
    /// verbatim as supplied (a leading `./` is preserved).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docroot: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub php_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub webserver_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub web_image: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nodejs_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub composer_root: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub composer_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timezone: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_tld: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_container_timeout: String,

    // Ports are opaque strings; the engine does not range-check them.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub router_http_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub router_https_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_db_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_webserver_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host_https_port: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mailpit_http_port: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub xdebug_enabled: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub no_project_mount: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_upload_dirs_warning: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub corepack_enable: bool,

    #[serde(default, skip_serializing_if = "DatabaseDesc::is_empty")]
    pub database: DatabaseDesc,

    /// Service name ("web", "db") → working directory override. Empty map
    /// means "use image defaults".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub working_dir: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_hostnames: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_fqdns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omit_containers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upload_dirs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webimage_extra_packages: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dbimage_extra_packages: Vec<String>,

    /// `KEY=VALUE` entries, unique by KEY, kept sorted by KEY after any
    /// merge operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_environment: Vec<String>,

    /// Lifecycle stage → ordered task list. Executed by external
    /// collaborators; this engine only persists and shape-validates them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: BTreeMap<String, Vec<HookTask>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ProjectConfig {
    /// Validate hook stage names and task shape.
    pub fn validate_hooks(&self) -> Result<(), ConfigError> {
        for (stage, tasks) in &self.hooks {
            if !HOOK_STAGES.contains(&stage.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "unknown hook stage '{stage}'"
                )));
            }
            for task in tasks {
                if task.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "empty hook task in stage '{stage}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validate a project name against the allowed charset: ASCII letters,
/// digits, hyphens, and dots. No spaces, underscores, or commas.
pub fn validate_project_name(name: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9.-]*$").unwrap();
    if name.is_empty() || !re.is_match(name) {
        return Err(ConfigError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Derive a default project name from the project root's directory name,
/// replacing characters outside the allowed charset with hyphens.
pub fn default_project_name(root: &std::path::Path) -> String {
    let base = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    cleaned.trim_matches('-').to_string()
}
