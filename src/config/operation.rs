//! The configuration operation pipeline
//!
//! One invocation of the engine: guard the location, resolve the project
//! root, load the layered view, apply detection and field requests,
//! resolve the project type and its defaults, validate, persist, register.
//! Persistence only happens after every validation step has succeeded, so
//! a failing operation leaves no partial write behind.

use std::path::{Path, PathBuf};

use crate::docroot::validate_docroot;
use crate::location::{ensure_allowed_location, find_project_root, resolve_project_root};
use crate::project_type::{
    apply_defaults, apply_update, detect_docroot, detect_type, ProjectType,
};
use crate::registry::{ProjectRegistry, RegisteredProject};

use super::error::ConfigError;
use super::fileset::ConfigFileSet;
use super::loader::{self, merge_layer, read_config_file, MergedConfig};
use super::persist::write_primary;
use super::resolver::FieldRequests;
use super::schema::{default_project_name, validate_project_name, ProjectConfig};

/// A single create-or-update configuration operation.
pub struct ConfigOperation<'a> {
    pub cwd: PathBuf,
    /// The user's home directory; config operations are refused there.
    pub home: PathBuf,
    pub requests: FieldRequests,
    /// Fill unset fields from filesystem detection without changing
    /// anything already set.
    pub auto: bool,
    /// Re-apply the current type-default ruleset to existing config.
    pub update: bool,
    pub registry: &'a mut dyn ProjectRegistry,
}

/// What a successful operation produced.
#[derive(Debug)]
pub struct ConfigOutcome {
    pub root: PathBuf,
    pub primary: PathBuf,
    /// The persisted base configuration (overrides never fold in).
    pub config: ProjectConfig,
    /// Canonical type all downstream consumers observe.
    pub resolved_type: ProjectType,
    /// Effective project name, which may come from an override file and
    /// then never appears in the primary.
    pub name: String,
    /// Set when a legacy alias tag was resolved, for informational output.
    pub resolved_alias: Option<String>,
}

impl ConfigOperation<'_> {
    pub fn run(self) -> Result<ConfigOutcome, ConfigError> {
        ensure_allowed_location(&self.cwd, &self.home)?;

        let names_new_project = self.requests.name.is_some();
        let root = resolve_project_root(&self.cwd, names_new_project)?;

        let fileset = ConfigFileSet::discover(&root)?;
        let is_new = !fileset.primary.exists();

        let mut base = if is_new {
            ProjectConfig::default()
        } else {
            read_config_file(&fileset.primary)?
        };

        // Parse every override up front so a malformed file aborts the
        // whole resolution before any mutation or write.
        let mut override_layers = Vec::with_capacity(fileset.overrides.len());
        for path in &fileset.overrides {
            override_layers.push(read_config_file(path)?);
        }

        self.requests.apply(&mut base)?;

        // Docroot: an explicit request is validated as given; otherwise
        // detection may fill an unset docroot on create/auto/update runs.
        if let Some(docroot) = &self.requests.docroot {
            base.docroot = validate_docroot(&root, docroot)?;
        } else if base.docroot.is_empty() && (is_new || self.auto || self.update) {
            if let Some(detected) = detect_docroot(&root) {
                base.docroot = validate_docroot(&root, &detected)?;
            }
        } else if !base.docroot.is_empty() {
            // Re-validate what is already stored; recreates the directory
            // if it went missing.
            base.docroot = validate_docroot(&root, &base.docroot.clone())?;
        }

        // Project type: explicit flag or stored tag, detection for update
        // runs and for projects that never declared one.
        let mut resolved_alias = None;
        if self.update {
            if let Some(detected) = detect_type(&root, &base.docroot) {
                base.project_type = detected.as_str().to_string();
            }
        }
        if base.project_type.is_empty() {
            let detected = detect_type(&root, &base.docroot).unwrap_or(ProjectType::Php);
            base.project_type = detected.as_str().to_string();
        }
        if ProjectType::is_alias(&base.project_type) {
            resolved_alias = Some(base.project_type.clone());
        }
        let resolved_type = ProjectType::resolve(&base.project_type)?;
        // This operation rewrites the primary anyway, so the canonical tag
        // replaces a stored alias here. Pure reads never do this.
        base.project_type = resolved_type.as_str().to_string();

        if self.update {
            apply_update(&mut base, resolved_type, &root);
        } else {
            apply_defaults(&mut base, resolved_type, &root);
        }

        // Effective name: overrides outrank the primary. When an override
        // supplies the name, the primary keeps whatever it had (possibly
        // nothing).
        let override_name = {
            let mut effective = base.clone();
            for layer in override_layers {
                merge_layer(&mut effective, layer);
            }
            if effective.name != base.name {
                Some(effective.name)
            } else {
                None
            }
        };
        if base.name.is_empty() && override_name.is_none() {
            base.name = default_project_name(&root);
        }
        let name = override_name.unwrap_or_else(|| base.name.clone());
        validate_project_name(&name)?;

        if let Some(existing) = self.registry.lookup(&name) {
            if existing.root != root {
                return Err(ConfigError::NameInUse {
                    name,
                    root: existing.root,
                });
            }
        }

        base.validate_hooks()?;

        let primary = write_primary(&root, &base)?;
        self.registry.register(RegisteredProject {
            name: name.clone(),
            root: root.clone(),
        })?;

        Ok(ConfigOutcome {
            root,
            primary,
            config: base,
            resolved_type,
            name,
            resolved_alias,
        })
    }
}

/// Report the primary configuration file for the project containing
/// `cwd`, or fail when none exists.
pub fn show_config_location(cwd: &Path) -> Result<PathBuf, ConfigError> {
    let root = find_project_root(cwd).ok_or(ConfigError::NoProject)?;
    Ok(ConfigFileSet::discover(&root)?.primary)
}

/// The resolved (merged, canonical-type) view of the project containing
/// `cwd`. Read-only: the stored alias tag is not rewritten.
pub fn describe(cwd: &Path) -> Result<(PathBuf, MergedConfig), ConfigError> {
    let root = find_project_root(cwd).ok_or(ConfigError::NoProject)?;
    let fileset = ConfigFileSet::discover(&root)?;
    let mut merged = loader::load(&fileset)?;

    if !merged.config.project_type.is_empty() {
        let resolved = ProjectType::resolve(&merged.config.project_type)?;
        merged.config.project_type = resolved.as_str().to_string();
    }

    Ok((root, merged))
}
