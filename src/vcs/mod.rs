//! Revision-content abstraction
//!
//! The analysis core never talks to git directly. Everything it needs from
//! history goes through the [`Revisions`] trait: file text at a revision, the
//! file list at a revision, and the path-level changes between two revisions.
//!
//! - [`GitRepo`] shells out to `git` for a real checkout.
//! - [`MemoryRepo`] holds named snapshots in memory (tests, dry runs).
//! - [`CachedRevisions`] memoizes content lookups for any implementation.

mod cache;
mod git;
mod memory;

pub use cache::CachedRevisions;
pub use git::{parse_name_status, GitRepo};
pub use memory::MemoryRepo;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown revision: {0}")]
    UnknownRevision(String),
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Path-level change kind between two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Deleted => write!(f, "deleted"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Renamed => write!(f, "renamed"),
        }
    }
}

/// One file touched between two revisions
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChangedFile {
    /// Path at the head revision (base path for deletions)
    pub path: String,
    /// Path at the base revision, set only for renames
    pub old_path: Option<String>,
    pub change: ChangeKind,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, change: ChangeKind) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            change,
        }
    }

    pub fn renamed(old_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: Some(old_path.into()),
            change: ChangeKind::Renamed,
        }
    }

    /// Path to read on the base side, `None` when the file did not exist there
    pub fn base_path(&self) -> Option<&str> {
        match self.change {
            ChangeKind::Added => None,
            ChangeKind::Renamed => Some(self.old_path.as_deref().unwrap_or(&self.path)),
            ChangeKind::Deleted | ChangeKind::Modified => Some(&self.path),
        }
    }

    /// Path to read on the head side, `None` when the file was deleted
    pub fn head_path(&self) -> Option<&str> {
        match self.change {
            ChangeKind::Deleted => None,
            _ => Some(&self.path),
        }
    }
}

/// Read-only view of repository history
///
/// Implementations must be safe to share across the rayon worker pool; the
/// analysis issues content queries for independent files concurrently.
pub trait Revisions: Send + Sync {
    /// Text of `path` at `revision`, or `None` if the file does not exist there.
    fn file_content(&self, path: &str, revision: &str) -> Result<Option<String>, VcsError>;

    /// Whether `path` exists at `revision`.
    fn file_exists(&self, path: &str, revision: &str) -> Result<bool, VcsError> {
        Ok(self.file_content(path, revision)?.is_some())
    }

    /// Every file path in the tree at `revision`.
    fn list_files(&self, revision: &str) -> Result<Vec<String>, VcsError>;

    /// Path-level changes from `base` to `head`.
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>, VcsError>;

    /// Fail early if `revision` does not name a snapshot.
    fn verify_revision(&self, _revision: &str) -> Result<(), VcsError> {
        Ok(())
    }
}

impl<T: Revisions + ?Sized> Revisions for &T {
    fn file_content(&self, path: &str, revision: &str) -> Result<Option<String>, VcsError> {
        (**self).file_content(path, revision)
    }

    fn file_exists(&self, path: &str, revision: &str) -> Result<bool, VcsError> {
        (**self).file_exists(path, revision)
    }

    fn list_files(&self, revision: &str) -> Result<Vec<String>, VcsError> {
        (**self).list_files(revision)
    }

    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>, VcsError> {
        (**self).changed_files(base, head)
    }

    fn verify_revision(&self, revision: &str) -> Result<(), VcsError> {
        (**self).verify_revision(revision)
    }
}
