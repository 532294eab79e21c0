//! Project types, aliases, and type-driven defaults
//!
//! A project's persisted `type` tag may be a canonical type (`drupal11`,
//! `wordpress`) or a legacy alias (`drupal`). Aliases resolve to the
//! current latest stable concrete type at resolution time; the mapping is
//! a small versioned lookup table, independent of the rest of the schema,
//! and moves forward between releases. Downstream consumers always see
//! the canonical tag; the stored alias is only rewritten when an
//! operation writes the primary file anyway.

mod detect;

pub use detect::{detect_docroot, detect_type};

use std::path::Path;

use crate::config::{ConfigError, DatabaseDesc, ProjectConfig};

/// Default PHP version applied when a type has no more specific one.
pub const PHP_DEFAULT: &str = "8.3";

/// Base database applied when nothing more specific is configured.
pub const DATABASE_DEFAULT: (&str, &str) = ("mariadb", "10.11");

/// Canonical project types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Php,
    Backdrop,
    CraftCms,
    Drupal6,
    Drupal7,
    Drupal8,
    Drupal9,
    Drupal10,
    Drupal11,
    Laravel,
    Magento2,
    Shopware6,
    Silverstripe,
    Typo3,
    Wordpress,
}

/// What the `drupal` alias resolves to as of this release.
pub const DRUPAL_LATEST_STABLE: ProjectType = ProjectType::Drupal11;

/// Alias tag → canonical type, versioned independently of the schema.
const ALIASES: &[(&str, ProjectType)] = &[("drupal", DRUPAL_LATEST_STABLE)];

/// Type-specific default values. Applied non-destructively: only unset
/// fields ever receive a default.
#[derive(Debug, Clone, Copy)]
pub struct TypeDefaults {
    /// Conventional docroot for the type; applied only when the directory
    /// actually exists in the project.
    pub docroot: &'static str,
    pub database: (&'static str, &'static str),
    pub php_version: &'static str,
    pub corepack_enable: bool,
    /// Conventional user-upload directories, relative to the docroot.
    pub upload_dirs: &'static [&'static str],
}

impl ProjectType {
    /// Resolve a stored tag (canonical or alias) to a canonical type.
    pub fn resolve(tag: &str) -> Result<Self, ConfigError> {
        if let Some((_, ty)) = ALIASES.iter().find(|(alias, _)| *alias == tag) {
            return Ok(*ty);
        }
        match tag {
            "php" => Ok(Self::Php),
            "backdrop" => Ok(Self::Backdrop),
            "craftcms" => Ok(Self::CraftCms),
            "drupal6" => Ok(Self::Drupal6),
            "drupal7" => Ok(Self::Drupal7),
            "drupal8" => Ok(Self::Drupal8),
            "drupal9" => Ok(Self::Drupal9),
            "drupal10" => Ok(Self::Drupal10),
            "drupal11" => Ok(Self::Drupal11),
            "laravel" => Ok(Self::Laravel),
            "magento2" => Ok(Self::Magento2),
            "shopware6" => Ok(Self::Shopware6),
            "silverstripe" => Ok(Self::Silverstripe),
            "typo3" => Ok(Self::Typo3),
            "wordpress" => Ok(Self::Wordpress),
            other => Err(ConfigError::InvalidProjectType(other.to_string())),
        }
    }

    /// True when `tag` is an alias rather than a canonical tag.
    pub fn is_alias(tag: &str) -> bool {
        ALIASES.iter().any(|(alias, _)| *alias == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::Backdrop => "backdrop",
            Self::CraftCms => "craftcms",
            Self::Drupal6 => "drupal6",
            Self::Drupal7 => "drupal7",
            Self::Drupal8 => "drupal8",
            Self::Drupal9 => "drupal9",
            Self::Drupal10 => "drupal10",
            Self::Drupal11 => "drupal11",
            Self::Laravel => "laravel",
            Self::Magento2 => "magento2",
            Self::Shopware6 => "shopware6",
            Self::Silverstripe => "silverstripe",
            Self::Typo3 => "typo3",
            Self::Wordpress => "wordpress",
        }
    }

    /// The defaulting bundle for this type.
    pub fn defaults(&self) -> TypeDefaults {
        let base = TypeDefaults {
            docroot: "",
            database: DATABASE_DEFAULT,
            php_version: PHP_DEFAULT,
            corepack_enable: false,
            upload_dirs: &[],
        };
        match self {
            Self::Php => base,
            Self::Drupal6 => TypeDefaults {
                php_version: "5.6",
                upload_dirs: &["sites/default/files"],
                ..base
            },
            Self::Drupal7 => TypeDefaults {
                php_version: "7.4",
                upload_dirs: &["sites/default/files"],
                ..base
            },
            Self::Drupal8 => TypeDefaults {
                docroot: "web",
                php_version: "7.4",
                upload_dirs: &["sites/default/files"],
                ..base
            },
            Self::Drupal9 | Self::Drupal10 => TypeDefaults {
                docroot: "web",
                upload_dirs: &["sites/default/files"],
                ..base
            },
            Self::Drupal11 => TypeDefaults {
                docroot: "web",
                corepack_enable: true,
                upload_dirs: &["sites/default/files"],
                ..base
            },
            Self::Backdrop => TypeDefaults {
                upload_dirs: &["files"],
                ..base
            },
            Self::CraftCms => TypeDefaults {
                docroot: "web",
                database: ("mysql", "8.0"),
                ..base
            },
            Self::Laravel => TypeDefaults {
                docroot: "public",
                ..base
            },
            Self::Magento2 => TypeDefaults {
                docroot: "pub",
                database: ("mysql", "8.0"),
                upload_dirs: &["media"],
                ..base
            },
            Self::Shopware6 => TypeDefaults {
                docroot: "public",
                database: ("mysql", "8.0"),
                upload_dirs: &["media"],
                ..base
            },
            Self::Silverstripe => TypeDefaults {
                docroot: "public",
                upload_dirs: &["assets"],
                ..base
            },
            Self::Typo3 => TypeDefaults {
                docroot: "public",
                upload_dirs: &["fileadmin"],
                ..base
            },
            Self::Wordpress => TypeDefaults {
                upload_dirs: &["wp-content/uploads"],
                ..base
            },
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill unset fields of `config` with this type's defaults. Explicit
/// values are never overwritten. The docroot default is only taken when
/// the conventional directory already exists under the project root.
pub fn apply_defaults(config: &mut ProjectConfig, ty: ProjectType, project_root: &Path) {
    let d = ty.defaults();

    if config.php_version.is_empty() {
        config.php_version = d.php_version.to_string();
    }
    if config.database.is_empty() {
        config.database = DatabaseDesc::new(d.database.0, d.database.1);
    }
    if config.docroot.is_empty()
        && !d.docroot.is_empty()
        && project_root.join(d.docroot).is_dir()
    {
        config.docroot = d.docroot.to_string();
    }
    if config.upload_dirs.is_empty() {
        config.upload_dirs = d.upload_dirs.iter().map(|s| s.to_string()).collect();
    }
    if d.corepack_enable {
        config.corepack_enable = true;
    }
}

/// Re-apply the current defaulting ruleset to an existing configuration
/// (the `--update` migration).
///
/// A field is migrated when its value is unset or still equals the base
/// (pre-type) default; a value that differs is treated as user-supplied
/// and left alone. This is a heuristic: a user who explicitly set a field
/// to the old default is indistinguishable from one who never touched it.
pub fn apply_update(config: &mut ProjectConfig, ty: ProjectType, project_root: &Path) {
    let base = ProjectType::Php.defaults();
    let d = ty.defaults();

    if config.php_version.is_empty() || config.php_version == base.php_version {
        config.php_version = d.php_version.to_string();
    }
    let base_db = DatabaseDesc::new(base.database.0, base.database.1);
    if config.database.is_empty() || config.database == base_db {
        config.database = DatabaseDesc::new(d.database.0, d.database.1);
    }
    if config.docroot.is_empty()
        && !d.docroot.is_empty()
        && project_root.join(d.docroot).is_dir()
    {
        config.docroot = d.docroot.to_string();
    }
    if config.upload_dirs.is_empty() {
        config.upload_dirs = d.upload_dirs.iter().map(|s| s.to_string()).collect();
    }
    config.corepack_enable = config.corepack_enable || d.corepack_enable;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_canonical() {
        assert_eq!(ProjectType::resolve("php").unwrap(), ProjectType::Php);
        assert_eq!(ProjectType::resolve("drupal11").unwrap(), ProjectType::Drupal11);
        assert_eq!(ProjectType::resolve("wordpress").unwrap(), ProjectType::Wordpress);
    }

    #[test]
    fn test_resolve_alias_to_latest_stable() {
        assert_eq!(ProjectType::resolve("drupal").unwrap(), DRUPAL_LATEST_STABLE);
        assert!(ProjectType::is_alias("drupal"));
        assert!(!ProjectType::is_alias("drupal11"));
    }

    #[test]
    fn test_resolve_unknown_tag() {
        let err = ProjectType::resolve("joomla").unwrap_err();
        assert!(err.to_string().contains("joomla"));
    }

    #[test]
    fn test_round_trip_as_str() {
        for tag in ["php", "drupal6", "drupal11", "craftcms", "magento2", "typo3"] {
            assert_eq!(ProjectType::resolve(tag).unwrap().as_str(), tag);
        }
    }

    #[test]
    fn test_defaults_non_destructive() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("web")).unwrap();

        let mut config = ProjectConfig {
            php_version: "8.1".to_string(),
            docroot: "html".to_string(),
            ..Default::default()
        };
        apply_defaults(&mut config, ProjectType::Drupal11, tmp.path());

        // Explicit values survive.
        assert_eq!(config.php_version, "8.1");
        assert_eq!(config.docroot, "html");
        // Unset fields get type defaults.
        assert_eq!(config.database, DatabaseDesc::new("mariadb", "10.11"));
        assert_eq!(config.upload_dirs, vec!["sites/default/files"]);
        assert!(config.corepack_enable);
    }

    #[test]
    fn test_explicit_upload_dirs_survive_defaults() {
        let tmp = TempDir::new().unwrap();
        let mut config = ProjectConfig {
            upload_dirs: vec!["custom/files".to_string()],
            ..Default::default()
        };
        apply_defaults(&mut config, ProjectType::Wordpress, tmp.path());
        assert_eq!(config.upload_dirs, vec!["custom/files"]);
    }

    #[test]
    fn test_docroot_default_requires_existing_dir() {
        let tmp = TempDir::new().unwrap();
        let mut config = ProjectConfig::default();
        apply_defaults(&mut config, ProjectType::Drupal11, tmp.path());
        assert_eq!(config.docroot, "");

        fs::create_dir(tmp.path().join("web")).unwrap();
        let mut config = ProjectConfig::default();
        apply_defaults(&mut config, ProjectType::Drupal11, tmp.path());
        assert_eq!(config.docroot, "web");
    }

    #[test]
    fn test_update_migrates_base_defaults() {
        let tmp = TempDir::new().unwrap();
        // craftcms: base mariadb default moves to mysql:8.0 on update.
        let mut config = ProjectConfig {
            php_version: PHP_DEFAULT.to_string(),
            database: DatabaseDesc::new(DATABASE_DEFAULT.0, DATABASE_DEFAULT.1),
            ..Default::default()
        };
        apply_update(&mut config, ProjectType::CraftCms, tmp.path());
        assert_eq!(config.database, DatabaseDesc::new("mysql", "8.0"));
    }

    #[test]
    fn test_update_leaves_user_overrides() {
        let tmp = TempDir::new().unwrap();
        let mut config = ProjectConfig {
            database: DatabaseDesc::new("postgres", "17"),
            php_version: "8.1".to_string(),
            ..Default::default()
        };
        apply_update(&mut config, ProjectType::CraftCms, tmp.path());
        assert_eq!(config.database, DatabaseDesc::new("postgres", "17"));
        assert_eq!(config.php_version, "8.1");
    }

    #[test]
    fn test_update_drupal11_enables_corepack_and_docroot() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("web")).unwrap();

        let mut config = ProjectConfig::default();
        apply_update(&mut config, ProjectType::Drupal11, tmp.path());
        assert!(config.corepack_enable);
        assert_eq!(config.docroot, "web");
    }

    #[test]
    fn test_update_drupal11_without_web_dir_keeps_empty_docroot() {
        let tmp = TempDir::new().unwrap();
        let mut config = ProjectConfig::default();
        apply_update(&mut config, ProjectType::Drupal11, tmp.path());
        assert_eq!(config.docroot, "");
        assert!(config.corepack_enable);
    }
}
