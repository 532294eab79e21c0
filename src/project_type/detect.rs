//! Filesystem-based project detection
//!
//! Used by `--auto`, `--update`, and initial project creation to fill
//! unset fields. Detection is read-only and best-effort: when nothing
//! matches, the caller falls back to the generic `php` type.

use regex_lite::Regex;
use std::fs;
use std::path::Path;

use super::ProjectType;

/// Conventional docroot directory names, checked in order.
const DOCROOT_CANDIDATES: &[&str] = &["web", "docroot", "public", "htdocs"];

/// Detect the docroot by looking for a conventional subdirectory holding
/// an index file. Returns `None` when the project root itself is the best
/// guess.
pub fn detect_docroot(project_root: &Path) -> Option<String> {
    for candidate in DOCROOT_CANDIDATES {
        let dir = project_root.join(candidate);
        if dir.join("index.php").is_file() || dir.join("index.html").is_file() {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Detect the project type from signature files, looking in the project
/// root and in the effective docroot.
pub fn detect_type(project_root: &Path, docroot: &str) -> Option<ProjectType> {
    let base = if docroot.is_empty() {
        project_root.to_path_buf()
    } else {
        project_root.join(docroot)
    };

    // Root-level signatures first: these identify the application no
    // matter where the docroot lives.
    if project_root.join("craft").is_file() {
        return Some(ProjectType::CraftCms);
    }
    if project_root.join("artisan").is_file() {
        return Some(ProjectType::Laravel);
    }
    if project_root.join("bin/magento").is_file() {
        return Some(ProjectType::Magento2);
    }

    // Docroot signatures.
    if base.join("misc/ahah.js").is_file() {
        return Some(ProjectType::Drupal6);
    }
    if base.join("misc/druplicon.png").is_file() {
        return Some(ProjectType::Drupal7);
    }
    if base.join("core/lib/Drupal.php").is_file() {
        return Some(drupal_version(&base.join("core/lib/Drupal.php")));
    }
    if base.join("core/modules/layout").is_dir() {
        return Some(ProjectType::Backdrop);
    }
    if base.join("wp-settings.php").is_file() {
        return Some(ProjectType::Wordpress);
    }
    if base.join("typo3").is_dir() {
        return Some(ProjectType::Typo3);
    }

    if base.join("index.php").is_file() {
        return Some(ProjectType::Php);
    }

    None
}

/// Map the VERSION constant in core/lib/Drupal.php to a concrete type.
/// Unreadable or unexpected contents fall back to latest stable.
fn drupal_version(drupal_php: &Path) -> ProjectType {
    let contents = match fs::read_to_string(drupal_php) {
        Ok(c) => c,
        Err(_) => return super::DRUPAL_LATEST_STABLE,
    };
    let re = Regex::new(r#"const VERSION = '(\d+)"#).unwrap();
    let major = re
        .captures(&contents)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    match major {
        Some(8) => ProjectType::Drupal8,
        Some(9) => ProjectType::Drupal9,
        Some(10) => ProjectType::Drupal10,
        Some(11) => ProjectType::Drupal11,
        _ => super::DRUPAL_LATEST_STABLE,
    }
}
