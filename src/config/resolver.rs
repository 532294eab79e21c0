//! Field-level change requests
//!
//! `FieldRequests` carries one optional request per configurable field,
//! produced from command flags:
//! - `Some(value)` on a scalar replaces the field unconditionally
//! - a `*_default` reset clears the field back to its zero value
//! - `Some(vec)` on a list replaces it; an explicitly empty vec (from
//!   `--flag=""`) clears the list, while `None` leaves it untouched
//! - `web_environment_add` unions new entries with the existing set,
//!   deduplicating by KEY (the last occurrence inside one batch wins) and
//!   sorting the result by KEY
//!
//! A request with every field unset is a no-op, which is what makes
//! repeated `--auto` runs idempotent.

use std::collections::BTreeMap;

use super::error::ConfigError;
use super::schema::{DatabaseDesc, ProjectConfig};

/// One configuration operation's worth of field changes.
#[derive(Debug, Clone, Default)]
pub struct FieldRequests {
    pub name: Option<String>,
    pub project_type: Option<String>,
    pub docroot: Option<String>,
    pub php_version: Option<String>,
    /// `TYPE:VERSION`, e.g. `mariadb:10.11`.
    pub database: Option<String>,
    pub webserver_type: Option<String>,
    pub web_image: Option<String>,
    pub nodejs_version: Option<String>,
    pub composer_root: Option<String>,
    pub composer_version: Option<String>,
    pub timezone: Option<String>,
    pub project_tld: Option<String>,
    pub default_container_timeout: Option<String>,

    pub router_http_port: Option<String>,
    pub router_https_port: Option<String>,
    pub host_db_port: Option<String>,
    pub host_webserver_port: Option<String>,
    pub host_https_port: Option<String>,
    pub mailpit_http_port: Option<String>,

    pub xdebug_enabled: Option<bool>,
    pub no_project_mount: Option<bool>,
    pub disable_upload_dirs_warning: Option<bool>,
    pub corepack_enable: Option<bool>,

    pub web_working_dir: Option<String>,
    pub db_working_dir: Option<String>,

    // Reset-to-default requests: clear regardless of current value.
    pub web_image_default: bool,
    pub composer_root_default: bool,
    pub web_working_dir_default: bool,
    pub db_working_dir_default: bool,
    /// Grouped reset for all image fields.
    pub image_defaults: bool,
    /// Grouped reset for all working-dir overrides.
    pub working_dir_defaults: bool,

    pub additional_hostnames: Option<Vec<String>>,
    pub additional_fqdns: Option<Vec<String>>,
    pub omit_containers: Option<Vec<String>>,
    pub upload_dirs: Option<Vec<String>>,
    pub webimage_extra_packages: Option<Vec<String>>,
    pub dbimage_extra_packages: Option<Vec<String>>,
    pub web_environment: Option<Vec<String>>,
    pub web_environment_add: Option<Vec<String>>,
}

/// Parse a comma-separated flag value into list entries. `--flag=""`
/// yields an empty list, which clears the field.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge `KEY=VALUE` additions into an existing environment list,
/// deduplicating by KEY and returning the entries sorted by KEY. The last
/// occurrence of a repeated KEY in `additions` wins.
pub fn merge_environment(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut by_key: BTreeMap<String, String> = BTreeMap::new();
    for entry in existing.iter().chain(additions.iter()) {
        let (key, value) = entry
            .split_once('=')
            .unwrap_or((entry.as_str(), ""));
        by_key.insert(key.to_string(), value.to_string());
    }
    by_key
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect()
}

impl FieldRequests {
    /// True when no field change was requested.
    pub fn is_empty(&self) -> bool {
        let defaults = !(self.web_image_default
            || self.composer_root_default
            || self.web_working_dir_default
            || self.db_working_dir_default
            || self.image_defaults
            || self.working_dir_defaults);
        defaults
            && self.name.is_none()
            && self.project_type.is_none()
            && self.docroot.is_none()
            && self.php_version.is_none()
            && self.database.is_none()
            && self.webserver_type.is_none()
            && self.web_image.is_none()
            && self.nodejs_version.is_none()
            && self.composer_root.is_none()
            && self.composer_version.is_none()
            && self.timezone.is_none()
            && self.project_tld.is_none()
            && self.default_container_timeout.is_none()
            && self.router_http_port.is_none()
            && self.router_https_port.is_none()
            && self.host_db_port.is_none()
            && self.host_webserver_port.is_none()
            && self.host_https_port.is_none()
            && self.mailpit_http_port.is_none()
            && self.xdebug_enabled.is_none()
            && self.no_project_mount.is_none()
            && self.disable_upload_dirs_warning.is_none()
            && self.corepack_enable.is_none()
            && self.web_working_dir.is_none()
            && self.db_working_dir.is_none()
            && self.additional_hostnames.is_none()
            && self.additional_fqdns.is_none()
            && self.omit_containers.is_none()
            && self.upload_dirs.is_none()
            && self.webimage_extra_packages.is_none()
            && self.dbimage_extra_packages.is_none()
            && self.web_environment.is_none()
            && self.web_environment_add.is_none()
    }

    /// Apply the requested changes to a base configuration. Fields with no
    /// request are never modified.
    pub fn apply(&self, config: &mut ProjectConfig) -> Result<(), ConfigError> {
        // Scalars: unconditional replace when requested. The docroot is
        // applied by the operation pipeline after validation, not here.
        set_scalar(&mut config.name, &self.name);
        set_scalar(&mut config.project_type, &self.project_type);
        set_scalar(&mut config.php_version, &self.php_version);
        set_scalar(&mut config.webserver_type, &self.webserver_type);
        set_scalar(&mut config.web_image, &self.web_image);
        set_scalar(&mut config.nodejs_version, &self.nodejs_version);
        set_scalar(&mut config.composer_root, &self.composer_root);
        set_scalar(&mut config.composer_version, &self.composer_version);
        set_scalar(&mut config.timezone, &self.timezone);
        set_scalar(&mut config.project_tld, &self.project_tld);
        set_scalar(&mut config.default_container_timeout, &self.default_container_timeout);
        set_scalar(&mut config.router_http_port, &self.router_http_port);
        set_scalar(&mut config.router_https_port, &self.router_https_port);
        set_scalar(&mut config.host_db_port, &self.host_db_port);
        set_scalar(&mut config.host_webserver_port, &self.host_webserver_port);
        set_scalar(&mut config.host_https_port, &self.host_https_port);
        set_scalar(&mut config.mailpit_http_port, &self.mailpit_http_port);

        if let Some(spec) = &self.database {
            config.database = DatabaseDesc::parse(spec)?;
        }

        if let Some(enabled) = self.xdebug_enabled {
            config.xdebug_enabled = enabled;
        }
        if let Some(enabled) = self.no_project_mount {
            config.no_project_mount = enabled;
        }
        if let Some(enabled) = self.disable_upload_dirs_warning {
            config.disable_upload_dirs_warning = enabled;
        }
        if let Some(enabled) = self.corepack_enable {
            config.corepack_enable = enabled;
        }

        if let Some(dir) = &self.web_working_dir {
            config.working_dir.insert("web".to_string(), dir.clone());
        }
        if let Some(dir) = &self.db_working_dir {
            config.working_dir.insert("db".to_string(), dir.clone());
        }

        // Resets run after explicit sets so `--web-image-default` wins even
        // when combined with `--web-image` in one invocation.
        if self.web_image_default || self.image_defaults {
            config.web_image.clear();
        }
        if self.composer_root_default {
            config.composer_root.clear();
        }
        if self.working_dir_defaults {
            config.working_dir.clear();
        } else {
            if self.web_working_dir_default {
                config.working_dir.remove("web");
            }
            if self.db_working_dir_default {
                config.working_dir.remove("db");
            }
        }

        set_list(&mut config.additional_hostnames, &self.additional_hostnames);
        set_list(&mut config.additional_fqdns, &self.additional_fqdns);
        set_list(&mut config.omit_containers, &self.omit_containers);
        set_list(&mut config.upload_dirs, &self.upload_dirs);
        set_list(&mut config.webimage_extra_packages, &self.webimage_extra_packages);
        set_list(&mut config.dbimage_extra_packages, &self.dbimage_extra_packages);

        if let Some(entries) = &self.web_environment {
            // Replace keeps the merge invariant: unique by key, key-sorted.
            config.web_environment = merge_environment(&[], entries);
        }
        if let Some(additions) = &self.web_environment_add {
            config.web_environment = merge_environment(&config.web_environment, additions);
        }

        Ok(())
    }
}

fn set_scalar(field: &mut String, request: &Option<String>) {
    if let Some(value) = request {
        *field = value.clone();
    }
}

fn set_list(field: &mut Vec<String>, request: &Option<Vec<String>>) {
    if let Some(entries) = request {
        *field = entries.clone();
    }
}
