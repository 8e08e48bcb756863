//! Repository root detection and config file application

use std::path::{Path, PathBuf};

use tia::Config;

use super::Cli;

/// Find the repository root by walking up to the nearest `.git`.
///
/// `.git` may be a directory or, in worktrees and submodules, a file.
pub(crate) fn find_repo_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match find_repo_root_from(&cwd) {
        Some(root) => root,
        None => {
            // Fall back to CWD; git itself reports the real problem later
            tracing::warn!("No git repository found, using current directory");
            cwd
        }
    }
}

fn find_repo_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Apply config file defaults to CLI options
/// CLI flags always override config values
pub(crate) fn apply_config_defaults(cli: &mut Cli, config: &Config) {
    if cli.base.is_none() {
        cli.base = Some(config.base_or_default().to_string());
    }
    if cli.head.is_none() {
        cli.head = Some(config.head_or_default().to_string());
    }
    if cli.runner.is_none() {
        cli.runner = Some(config.runner_or_default().to_string());
    }
    if !cli.quiet && config.quiet_or_default() {
        cli.quiet = true;
    }
    if !cli.verbose && config.verbose_or_default() {
        cli.verbose = true;
    }
}
