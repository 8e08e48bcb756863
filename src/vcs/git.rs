//! `git` subprocess backend

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{ChangeKind, ChangedFile, Revisions, VcsError};

/// A git working copy queried through the `git` binary
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<Output, VcsError> {
        Command::new("git")
            .arg("--no-pager")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(VcsError::Io)
    }

    /// Run a query whose failure is fatal for the caller.
    fn run_checked(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reject names git would parse as options.
fn check_arg(value: &str) -> Result<(), VcsError> {
    if value.starts_with('-') {
        return Err(VcsError::UnknownRevision(value.to_string()));
    }
    Ok(())
}

impl Revisions for GitRepo {
    fn file_content(&self, path: &str, revision: &str) -> Result<Option<String>, VcsError> {
        check_arg(revision)?;
        let spec = format!("{}:{}", revision, path);
        let output = self.run(&["cat-file", "blob", &spec])?;
        if !output.status.success() {
            // Missing path, directory, bad object: all read as "absent"
            tracing::debug!(
                path,
                revision,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "No content at revision"
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    fn file_exists(&self, path: &str, revision: &str) -> Result<bool, VcsError> {
        check_arg(revision)?;
        let spec = format!("{}:{}", revision, path);
        let output = self.run(&["cat-file", "-t", &spec])?;
        // Directories exist as trees but are not importable files
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "blob")
    }

    fn list_files(&self, revision: &str) -> Result<Vec<String>, VcsError> {
        let _span = tracing::debug_span!("git_list_files", revision).entered();
        check_arg(revision)?;
        let stdout = self.run_checked(&["ls-tree", "-r", "-z", "--name-only", revision])?;
        Ok(stdout
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>, VcsError> {
        let _span = tracing::debug_span!("git_changed_files", base, head).entered();
        check_arg(base)?;
        check_arg(head)?;
        let stdout = self.run_checked(&["diff", "--name-status", "-z", "-M", base, head])?;
        Ok(parse_name_status(&stdout))
    }

    fn verify_revision(&self, revision: &str) -> Result<(), VcsError> {
        check_arg(revision)?;
        let spec = format!("{}^{{commit}}", revision);
        let output = self.run(&["rev-parse", "--verify", "--quiet", &spec])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(VcsError::UnknownRevision(revision.to_string()))
        }
    }
}

/// Parse NUL-delimited `git diff --name-status -z` output.
///
/// Records are `status\0path\0`, or `Rnnn\0old\0new\0` for renames and
/// copies. Copies count as additions of the new path; type changes as
/// modifications.
pub fn parse_name_status(output: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());

    while let Some(status) = fields.next() {
        let status = status.trim();
        let code = status.chars().next().unwrap_or(' ');
        match code {
            'R' | 'C' => {
                let (Some(old), Some(new)) = (fields.next(), fields.next()) else {
                    tracing::warn!(status, "Truncated rename/copy record in git diff output");
                    break;
                };
                if code == 'R' {
                    files.push(ChangedFile::renamed(old, new));
                } else {
                    files.push(ChangedFile::new(new, ChangeKind::Added));
                }
            }
            'A' | 'D' | 'M' | 'T' => {
                let Some(path) = fields.next() else {
                    tracing::warn!(status, "Truncated record in git diff output");
                    break;
                };
                let change = match code {
                    'A' => ChangeKind::Added,
                    'D' => ChangeKind::Deleted,
                    _ => ChangeKind::Modified,
                };
                files.push(ChangedFile::new(path, change));
            }
            _ => {
                // Unmerged / unknown: skip its path too
                let path = fields.next().unwrap_or_default();
                tracing::warn!(status, path, "Skipping unsupported git diff status");
            }
        }
    }

    files
}
