//! Common test fixtures and helpers
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::two_revisions;
//! ```

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tia::MemoryRepo;

/// In-memory repository with a `base` and a `head` snapshot
pub fn two_revisions(base: &[(&str, &str)], head: &[(&str, &str)]) -> MemoryRepo {
    MemoryRepo::new()
        .with_revision("base", base.iter().copied())
        .with_revision("head", head.iter().copied())
}

/// Render a spec file with one `test(...)` per name
pub fn spec_file(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("test('{}', async ({{ page }}) => {{\n  await page.goto('/');\n}});\n", n))
        .collect()
}

/// Whether a usable `git` binary is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialize a repository on branch `main` with no commits
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Write files (creating parent dirs), stage everything and commit
pub fn commit_files(dir: &Path, files: &[(&str, &str)], message: &str) -> String {
    for (path, content) in files {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create dir");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}
