//! Docroot validation
//!
//! A docroot is a path relative to the project root; the empty string
//! denotes the root itself. The literal form supplied by the user is
//! preserved verbatim (a leading `./` is not canonicalized away).
//! Successful validation creates the directory; that is part of the
//! contract, not a separate step.

use std::fs;
use std::path::{Component, Path};

use crate::config::ConfigError;

const REASON_ABSOLUTE: &str = "docroot cannot be an absolute path";
const REASON_ESCAPES: &str = "docroot must remain inside the project";

/// Validate a candidate docroot against the project root, returning the
/// normalized (verbatim) relative form.
pub fn validate_docroot(project_root: &Path, input: &str) -> Result<String, ConfigError> {
    if input.is_empty() {
        return Ok(String::new());
    }

    if input.starts_with('/') || Path::new(input).is_absolute() {
        return Err(ConfigError::InvalidDocroot {
            docroot: input.to_string(),
            reason: REASON_ABSOLUTE,
        });
    }

    // Lexical containment check: track directory depth while walking the
    // components; dropping below the root is an escape.
    let mut depth: i32 = 0;
    for component in Path::new(input).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return Err(ConfigError::InvalidDocroot {
                        docroot: input.to_string(),
                        reason: REASON_ESCAPES,
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::InvalidDocroot {
                    docroot: input.to_string(),
                    reason: REASON_ABSOLUTE,
                });
            }
        }
    }

    fs::create_dir_all(project_root.join(input))?;

    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_docroot_matrix() {
        // (input, expected stored form, expected error substring)
        let matrix: &[(&str, &str, &str)] = &[
            ("", "", ""),
            (".", ".", ""),
            ("./", "./", ""),
            ("./test", "./test", ""),
            ("test", "test", ""),
            ("test/dir", "test/dir", ""),
            ("./test/dir", "./test/dir", ""),
            ("../somewhere-else", "", "must remain inside the project"),
            ("//test", "", "cannot be an absolute path"),
            ("/abs", "", "cannot be an absolute path"),
        ];

        for (input, expected, error) in matrix {
            let tmp = TempDir::new().unwrap();
            let result = validate_docroot(tmp.path(), input);
            if error.is_empty() {
                let stored = result.unwrap_or_else(|e| panic!("'{input}' should be valid: {e}"));
                assert_eq!(&stored, expected, "stored form for '{input}'");
                assert!(
                    tmp.path().join(input).is_dir(),
                    "docroot dir for '{input}' should exist"
                );
            } else {
                let err = result.expect_err(&format!("'{input}' should fail"));
                assert!(
                    err.to_string().contains(error),
                    "error for '{input}' should contain '{error}', got '{err}'"
                );
            }
        }
    }

    #[test]
    fn test_parent_traversal_inside_root_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let stored = validate_docroot(tmp.path(), "a/../b").unwrap();
        assert_eq!(stored, "a/../b");
        assert!(tmp.path().join("b").is_dir());
    }

    #[test]
    fn test_escape_after_descent() {
        let tmp = TempDir::new().unwrap();
        let err = validate_docroot(tmp.path(), "a/../../elsewhere").unwrap_err();
        assert!(err.to_string().contains("must remain inside the project"));
    }

    #[test]
    fn test_no_directory_created_on_failure() {
        let tmp = TempDir::new().unwrap();
        let _ = validate_docroot(tmp.path(), "../escape");
        assert!(!tmp.path().parent().unwrap().join("escape").exists());
    }
}
