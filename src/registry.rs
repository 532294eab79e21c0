//! Process-wide project registry
//!
//! Project names must be unique across all registered projects. The
//! registry is an injected collaborator so the resolution engine stays
//! testable in isolation: the CLI wires up the file-backed implementation
//! under the user's global `.localdev` directory, tests use the in-memory
//! one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// A registered project: its unique name and its root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredProject {
    pub name: String,
    pub root: PathBuf,
}

/// Lookup, register, remove. Registering a name that already belongs to a
/// different root fails with `NameInUse`; re-registering the same
/// name/root pair is a no-op.
pub trait ProjectRegistry {
    fn lookup(&self, name: &str) -> Option<RegisteredProject>;
    fn register(&mut self, project: RegisteredProject) -> Result<(), ConfigError>;
    fn remove(&mut self, name: &str) -> Result<(), ConfigError>;
}

fn check_collision(
    projects: &BTreeMap<String, RegisteredProject>,
    candidate: &RegisteredProject,
) -> Result<(), ConfigError> {
    if let Some(existing) = projects.get(&candidate.name) {
        if existing.root != candidate.root {
            return Err(ConfigError::NameInUse {
                name: candidate.name.clone(),
                root: existing.root.clone(),
            });
        }
    }
    Ok(())
}

/// In-memory registry for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    projects: BTreeMap<String, RegisteredProject>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectRegistry for InMemoryRegistry {
    fn lookup(&self, name: &str) -> Option<RegisteredProject> {
        self.projects.get(name).cloned()
    }

    fn register(&mut self, project: RegisteredProject) -> Result<(), ConfigError> {
        check_collision(&self.projects, &project)?;
        self.projects.insert(project.name.clone(), project);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), ConfigError> {
        self.projects.remove(name);
        Ok(())
    }
}

/// File-backed registry: a YAML map persisted with the same atomic
/// write-then-rename discipline as the primary config file.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    projects: BTreeMap<String, RegisteredProject>,
}

impl FileRegistry {
    /// Conventional registry location under the user's home directory.
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".localdev").join("projects.yaml")
    }

    /// Load the registry, starting empty when the file does not exist.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let projects = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&contents).map_err(|e| ConfigError::MalformedConfig {
                    file: path.clone(),
                    message: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, projects })
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", parent.display())))?;
        }
        let yaml = serde_yaml::to_string(&self.projects)
            .map_err(|e| ConfigError::PersistenceError(e.to_string()))?;
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| ConfigError::PersistenceError(format!("{}: {e}", self.path.display())))?;
        Ok(())
    }
}

impl ProjectRegistry for FileRegistry {
    fn lookup(&self, name: &str) -> Option<RegisteredProject> {
        self.projects.get(name).cloned()
    }

    fn register(&mut self, project: RegisteredProject) -> Result<(), ConfigError> {
        check_collision(&self.projects, &project)?;
        self.projects.insert(project.name.clone(), project);
        self.save()
    }

    fn remove(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.projects.remove(name).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(name: &str, root: &str) -> RegisteredProject {
        RegisteredProject {
            name: name.to_string(),
            root: PathBuf::from(root),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InMemoryRegistry::new();
        registry.register(project("site-a", "/tmp/a")).unwrap();
        assert_eq!(registry.lookup("site-a").unwrap().root, PathBuf::from("/tmp/a"));
        assert!(registry.lookup("site-b").is_none());
    }

    #[test]
    fn test_name_collision_refused() {
        let mut registry = InMemoryRegistry::new();
        registry.register(project("site", "/tmp/a")).unwrap();

        let err = registry.register(project("site", "/tmp/b")).unwrap_err();
        assert!(err.to_string().contains("already in use"));
    }

    #[test]
    fn test_reregister_same_root_ok() {
        let mut registry = InMemoryRegistry::new();
        registry.register(project("site", "/tmp/a")).unwrap();
        registry.register(project("site", "/tmp/a")).unwrap();
    }

    #[test]
    fn test_remove() {
        let mut registry = InMemoryRegistry::new();
        registry.register(project("site", "/tmp/a")).unwrap();
        registry.remove("site").unwrap();
        assert!(registry.lookup("site").is_none());
        // Removing an unknown name is not an error.
        registry.remove("site").unwrap();
    }

    #[test]
    fn test_file_registry_persists() {
        let tmp = TempDir::new().unwrap();
        let path = FileRegistry::default_path(tmp.path());

        let mut registry = FileRegistry::load(path.clone()).unwrap();
        registry.register(project("persisted", "/tmp/p")).unwrap();

        let reloaded = FileRegistry::load(path).unwrap();
        assert_eq!(
            reloaded.lookup("persisted").unwrap().root,
            PathBuf::from("/tmp/p")
        );
    }

    #[test]
    fn test_file_registry_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = FileRegistry::load(FileRegistry::default_path(tmp.path())).unwrap();
        assert!(registry.lookup("anything").is_none());
    }
}
