//! Allowed-location rules and project root resolution
//!
//! Configuration operations are never permitted in the user's home
//! directory. For everything else the project root is found by walking
//! upward from the working directory: the nearest directory holding a
//! primary config file wins, and a primary file in the working directory
//! itself makes it an independent root regardless of ancestors.
//!
//! Traversal is read-only; nothing here touches the filesystem beyond
//! existence checks.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, CONFIG_DIR, PRIMARY_FILE};

fn has_primary(dir: &Path) -> bool {
    dir.join(CONFIG_DIR).join(PRIMARY_FILE).exists()
}

/// Fail when the working directory is the home directory exactly.
pub fn ensure_allowed_location(cwd: &Path, home: &Path) -> Result<(), ConfigError> {
    if cwd == home {
        return Err(ConfigError::DisallowedLocation(home.to_path_buf()));
    }
    Ok(())
}

/// Walk upward from `start` to the filesystem root looking for an
/// existing project. Returns the nearest project root.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| has_primary(dir))
        .map(Path::to_path_buf)
}

/// Determine the project root for an operation run in `cwd`.
///
/// `names_new_project` is true when the request establishes a new project
/// identity (a project name was supplied). Creating a new project from a
/// subdirectory of an existing project's tree is refused; field updates
/// from the same subdirectory are applied to the ancestor project.
pub fn resolve_project_root(cwd: &Path, names_new_project: bool) -> Result<PathBuf, ConfigError> {
    match find_project_root(cwd) {
        Some(root) if root == cwd => Ok(root),
        Some(root) => {
            if names_new_project {
                Err(ConfigError::ConflictingProject { root })
            } else {
                Ok(root)
            }
        }
        None => Ok(cwd.to_path_buf()),
    }
}
