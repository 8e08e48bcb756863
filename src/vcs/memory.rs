//! In-memory snapshots implementing [`Revisions`]

use std::collections::{BTreeMap, HashMap};

use super::{ChangeKind, ChangedFile, Revisions, VcsError};

/// Named snapshots of `path -> text`
///
/// Changed files are derived by comparing two snapshots, so renames show up
/// as a deletion plus an addition.
///
/// ```
/// use tia::vcs::{MemoryRepo, Revisions};
///
/// let repo = MemoryRepo::new()
///     .with_revision("base", [("src/a.ts", "export const a = 1;")])
///     .with_revision("head", [("src/a.ts", "export const a = 2;")]);
/// assert_eq!(repo.changed_files("base", "head").unwrap().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryRepo {
    snapshots: HashMap<String, BTreeMap<String, String>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a snapshot named `revision`.
    pub fn with_revision<I, P, C>(mut self, revision: &str, files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        self.insert_revision(revision, files);
        self
    }

    pub fn insert_revision<I, P, C>(&mut self, revision: &str, files: I)
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let tree = files
            .into_iter()
            .map(|(p, c)| (p.into(), c.into()))
            .collect();
        self.snapshots.insert(revision.to_string(), tree);
    }

    fn snapshot(&self, revision: &str) -> Result<&BTreeMap<String, String>, VcsError> {
        self.snapshots
            .get(revision)
            .ok_or_else(|| VcsError::UnknownRevision(revision.to_string()))
    }
}

impl Revisions for MemoryRepo {
    fn file_content(&self, path: &str, revision: &str) -> Result<Option<String>, VcsError> {
        Ok(self.snapshot(revision)?.get(path).cloned())
    }

    fn file_exists(&self, path: &str, revision: &str) -> Result<bool, VcsError> {
        Ok(self.snapshot(revision)?.contains_key(path))
    }

    fn list_files(&self, revision: &str) -> Result<Vec<String>, VcsError> {
        Ok(self.snapshot(revision)?.keys().cloned().collect())
    }

    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>, VcsError> {
        let base_tree = self.snapshot(base)?;
        let head_tree = self.snapshot(head)?;

        let mut changed = Vec::new();
        for (path, text) in head_tree {
            match base_tree.get(path) {
                None => changed.push(ChangedFile::new(path.as_str(), ChangeKind::Added)),
                Some(old) if old != text => {
                    changed.push(ChangedFile::new(path.as_str(), ChangeKind::Modified))
                }
                Some(_) => {}
            }
        }
        for path in base_tree.keys() {
            if !head_tree.contains_key(path) {
                changed.push(ChangedFile::new(path.as_str(), ChangeKind::Deleted));
            }
        }
        changed.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(changed)
    }

    fn verify_revision(&self, revision: &str) -> Result<(), VcsError> {
        self.snapshot(revision).map(|_| ())
    }
}
