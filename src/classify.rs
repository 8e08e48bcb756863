//! Test file classification
//!
//! A path is a test file when its file name ends in `.spec.<ext>` or
//! `.test.<ext>` for a known source extension, or when it is a test-runner
//! configuration file (`playwright.config.ts` and friends). Changes to the
//! runner config affect every test, so it is classified with the tests.

use std::sync::LazyLock;

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Source extensions tried by import resolution and accepted after
/// `.spec.` / `.test.`
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// File-name globs for test-runner configuration files
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["playwright.config.*", "jest.config.*", "vitest.config.*"];

static DEFAULT_CLASSIFIER: LazyLock<TestFileClassifier> =
    LazyLock::new(TestFileClassifier::default);

/// Is `path` a test file under the default rules?
pub fn is_test_file(path: &str) -> bool {
    DEFAULT_CLASSIFIER.is_test_file(path)
}

#[derive(Debug, Clone)]
pub struct TestFileClassifier {
    suffixes: Vec<String>,
    config_files: GlobSet,
}

impl TestFileClassifier {
    /// Build from extension list (`.ts` form) and config-file globs.
    pub fn new<E, G>(extensions: &[E], config_globs: &[G]) -> Result<Self, globset::Error>
    where
        E: AsRef<str>,
        G: AsRef<str>,
    {
        let mut suffixes = Vec::with_capacity(extensions.len() * 2);
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            suffixes.push(format!(".spec.{}", ext));
            suffixes.push(format!(".test.{}", ext));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in config_globs {
            builder.add(Glob::new(pattern.as_ref())?);
        }

        Ok(Self {
            suffixes,
            config_files: builder.build()?,
        })
    }

    pub fn is_test_file(&self, path: &str) -> bool {
        let name = file_name(path);
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || self.config_files.is_match(name)
    }
}

impl Default for TestFileClassifier {
    fn default() -> Self {
        let suffixes = DEFAULT_EXTENSIONS
            .iter()
            .flat_map(|ext| {
                let ext = ext.trim_start_matches('.');
                [format!(".spec.{}", ext), format!(".test.{}", ext)]
            })
            .collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in DEFAULT_CONFIG_FILES {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        Self {
            suffixes,
            config_files: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_and_test_suffixes() {
        assert!(is_test_file("tests/sessions.spec.ts"));
        assert!(is_test_file("src/button.test.tsx"));
        assert!(is_test_file("e2e/login.spec.mjs"));
        assert!(is_test_file("a.test.cjs"));
    }

    #[test]
    fn test_non_test_files() {
        assert!(!is_test_file("package.json"));
        assert!(!is_test_file("tests/utils/helpers.ts"));
        assert!(!is_test_file("docs/spec.md"));
        assert!(!is_test_file("tests/a.spec.py"));
        // suffix must be on the file name, not a directory
        assert!(!is_test_file("a.spec.ts/readme.md"));
    }

    #[test]
    fn test_runner_config_files() {
        assert!(is_test_file("playwright.config.ts"));
        assert!(is_test_file("packages/web/jest.config.js"));
        assert!(!is_test_file("playwright.ts"));
    }

    #[test]
    fn test_custom_classifier() {
        let c = TestFileClassifier::new(&["py"], &["conftest.py"]).unwrap();
        assert!(c.is_test_file("tests/a.test.py"));
        assert!(c.is_test_file("tests/conftest.py"));
        assert!(!c.is_test_file("tests/a.spec.ts"));
    }

    #[test]
    fn test_invalid_glob_errors() {
        assert!(TestFileClassifier::new(&[".ts"], &["[unclosed"]).is_err());
    }

    #[test]
    fn test_windows_separator() {
        assert!(is_test_file(r"tests\login.spec.ts"));
    }
}
