//! Configuration file support for tia
//!
//! Config files are loaded in order (later overrides earlier):
//! 1. `~/.config/tia/config.toml` (user defaults)
//! 2. `.tia.toml` in the repository root (project overrides)
//!
//! CLI flags override all config file values.

use std::path::Path;

use serde::Deserialize;

use crate::classify::{TestFileClassifier, DEFAULT_CONFIG_FILES, DEFAULT_EXTENSIONS};
use crate::extract::{TestExtractor, DEFAULT_MAX_CAPTURE_LINES};
use crate::imports::ImportResolver;

/// Configuration options loaded from config files
///
/// # Example
///
/// ```toml
/// # ~/.config/tia/config.toml or .tia.toml
/// base = "origin/main"            # Default base revision
/// head = "HEAD"                   # Default head revision
/// runner = "npx playwright test"  # Prefix for --format command
/// extensions = [".ts", ".tsx", ".js"]
/// config_files = ["playwright.config.*"]
/// max_capture_lines = 500
/// quiet = false
/// verbose = false
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base: Option<String>,
    pub head: Option<String>,
    pub runner: Option<String>,
    /// Import resolution extensions, also accepted after `.spec.` / `.test.`
    pub extensions: Option<Vec<String>>,
    /// File-name globs for test-runner config files
    pub config_files: Option<Vec<String>>,
    /// Body capture cap per declaration
    pub max_capture_lines: Option<usize>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Load configuration from user and project config files
    pub fn load(project_root: &Path) -> Self {
        let user_config = dirs::config_dir()
            .map(|d| d.join("tia/config.toml"))
            .and_then(|p| Self::load_file(&p))
            .unwrap_or_default();

        let project_config = Self::load_file(&project_root.join(".tia.toml")).unwrap_or_default();

        // Project overrides user
        let merged = user_config.override_with(project_config);
        tracing::debug!(
            base = ?merged.base,
            head = ?merged.head,
            runner = ?merged.runner,
            max_capture_lines = ?merged.max_capture_lines,
            "Effective config after merge"
        );
        merged
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Layer another config on top (other overrides self where present)
    pub fn override_with(self, other: Self) -> Self {
        Config {
            base: other.base.or(self.base),
            head: other.head.or(self.head),
            runner: other.runner.or(self.runner),
            extensions: other.extensions.or(self.extensions),
            config_files: other.config_files.or(self.config_files),
            max_capture_lines: other.max_capture_lines.or(self.max_capture_lines),
            quiet: other.quiet.or(self.quiet),
            verbose: other.verbose.or(self.verbose),
        }
    }

    // ===== Accessors with defaults =====

    pub const DEFAULT_BASE: &'static str = "main";
    pub const DEFAULT_HEAD: &'static str = "HEAD";
    pub const DEFAULT_RUNNER: &'static str = "npx playwright test";

    pub fn base_or_default(&self) -> &str {
        self.base.as_deref().unwrap_or(Self::DEFAULT_BASE)
    }

    pub fn head_or_default(&self) -> &str {
        self.head.as_deref().unwrap_or(Self::DEFAULT_HEAD)
    }

    pub fn runner_or_default(&self) -> &str {
        self.runner.as_deref().unwrap_or(Self::DEFAULT_RUNNER)
    }

    pub fn max_capture_lines_or_default(&self) -> usize {
        self.max_capture_lines.unwrap_or(DEFAULT_MAX_CAPTURE_LINES)
    }

    pub fn quiet_or_default(&self) -> bool {
        self.quiet.unwrap_or(false)
    }

    pub fn verbose_or_default(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    fn extensions_or_default(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts.clone(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    // ===== Analysis components =====

    pub fn extractor(&self) -> TestExtractor {
        TestExtractor::new(self.max_capture_lines_or_default())
    }

    pub fn resolver(&self) -> ImportResolver {
        ImportResolver::new(&self.extensions_or_default())
    }

    /// Fails on an invalid `config_files` glob.
    pub fn classifier(&self) -> Result<TestFileClassifier, globset::Error> {
        let globs: Vec<String> = match &self.config_files {
            Some(g) => g.clone(),
            None => DEFAULT_CONFIG_FILES.iter().map(|g| g.to_string()).collect(),
        };
        TestFileClassifier::new(&self.extensions_or_default(), &globs)
    }
}
