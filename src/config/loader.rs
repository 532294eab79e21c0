//! Layered configuration loading
//!
//! Reads the config file set in ascending precedence order and folds the
//! layers into one in-memory `ProjectConfig`. Merge semantics are
//! last-non-empty-wins, field by field:
//! - scalars: a non-empty value in a later layer replaces the earlier one
//! - lists and maps: a non-empty value in a later layer REPLACES the whole
//!   field (no concatenation)
//! - an empty/absent field in a later layer never erases an earlier value
//!
//! The loader never writes to any file.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::fileset::ConfigFileSet;
use super::schema::ProjectConfig;

/// The merged in-memory view plus the contributing source paths in
/// ascending precedence order.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub config: ProjectConfig,
    pub sources: Vec<PathBuf>,
}

/// Read and parse one configuration file.
///
/// An empty (or whitespace-only) file parses as an all-default config; a
/// project created by `touch .localdev/config.yaml` is valid.
pub fn read_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::MalformedConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Build the merged view of a config file set.
pub fn load(fileset: &ConfigFileSet) -> Result<MergedConfig, ConfigError> {
    let mut config = ProjectConfig::default();
    let mut sources = Vec::new();

    for path in fileset.layers() {
        if !path.exists() {
            continue;
        }
        let layer = read_config_file(path)?;
        merge_layer(&mut config, layer);
        sources.push(path.clone());
    }

    Ok(MergedConfig { config, sources })
}

macro_rules! take_if_set {
    ($base:expr, $overlay:expr, $($field:ident),+ $(,)?) => {
        $(
            if !$overlay.$field.is_empty() {
                $base.$field = $overlay.$field;
            }
        )+
    };
}

/// Merge one higher-precedence layer into the accumulated base.
///
/// Booleans follow the same rule as other scalars: `false` is the zero
/// value, so a layer can set a flag but not unset one set by a lower
/// layer.
pub fn merge_layer(base: &mut ProjectConfig, overlay: ProjectConfig) {
    take_if_set!(
        base,
        overlay,
        name,
        project_type,
        docroot,
        php_version,
        webserver_type,
        web_image,
        nodejs_version,
        composer_root,
        composer_version,
        timezone,
        project_tld,
        default_container_timeout,
        router_http_port,
        router_https_port,
        host_db_port,
        host_webserver_port,
        host_https_port,
        mailpit_http_port,
        // nested and list fields: whole-field replace when non-empty
        database,
        working_dir,
        additional_hostnames,
        additional_fqdns,
        omit_containers,
        upload_dirs,
        webimage_extra_packages,
        dbimage_extra_packages,
        web_environment,
        hooks,
    );

    base.xdebug_enabled |= overlay.xdebug_enabled;
    base.no_project_mount |= overlay.no_project_mount;
    base.disable_upload_dirs_warning |= overlay.disable_upload_dirs_warning;
    base.corepack_enable |= overlay.corepack_enable;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fileset::{CONFIG_DIR, PRIMARY_FILE};
    use crate::config::schema::DatabaseDesc;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        tmp
    }

    #[test]
    fn test_override_wins_for_scalars() {
        let tmp = project_with(&[
            (PRIMARY_FILE, "name: primary-name\nphp_version: \"8.1\"\n"),
            ("config.local.yaml", "name: override-name\n"),
        ]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();

        assert_eq!(merged.config.name, "override-name");
        // Absent in the override, preserved from the primary.
        assert_eq!(merged.config.php_version, "8.1");
        assert_eq!(merged.sources.len(), 2);
    }

    #[test]
    fn test_lists_replace_not_append() {
        let tmp = project_with(&[
            (PRIMARY_FILE, "additional_hostnames: [a, b, c]\n"),
            ("config.local.yaml", "additional_hostnames: [x]\n"),
        ]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();
        assert_eq!(merged.config.additional_hostnames, vec!["x"]);
    }

    #[test]
    fn test_empty_override_field_preserves_base() {
        let tmp = project_with(&[
            (PRIMARY_FILE, "docroot: web\nadditional_fqdns: [a.com]\n"),
            ("config.local.yaml", "xdebug_enabled: true\n"),
        ]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();
        assert_eq!(merged.config.docroot, "web");
        assert_eq!(merged.config.additional_fqdns, vec!["a.com"]);
        assert!(merged.config.xdebug_enabled);
    }

    #[test]
    fn test_nested_database_replaces_wholesale() {
        let tmp = project_with(&[
            (PRIMARY_FILE, "database:\n  type: mariadb\n  version: \"10.11\"\n"),
            ("config.local.yaml", "database:\n  type: postgres\n  version: \"17\"\n"),
        ]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();
        assert_eq!(merged.config.database, DatabaseDesc::new("postgres", "17"));
    }

    #[test]
    fn test_malformed_file_names_offender() {
        let tmp = project_with(&[
            (PRIMARY_FILE, "name: ok\n"),
            ("config.local.yaml", "name: [unclosed\n"),
        ]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let err = load(&fileset).unwrap_err();
        match err {
            ConfigError::MalformedConfig { file, .. } => {
                assert!(file.to_string_lossy().contains("config.local.yaml"));
            }
            other => panic!("expected MalformedConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_primary_is_valid() {
        let tmp = project_with(&[(PRIMARY_FILE, "")]);
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();
        assert_eq!(merged.config, ProjectConfig::default());
        assert_eq!(merged.sources.len(), 1);
    }

    #[test]
    fn test_missing_primary_yields_default() {
        let tmp = TempDir::new().unwrap();
        let fileset = ConfigFileSet::discover(tmp.path()).unwrap();
        let merged = load(&fileset).unwrap();
        assert_eq!(merged.config, ProjectConfig::default());
        assert!(merged.sources.is_empty());
    }
}
