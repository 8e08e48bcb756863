//! Memoizing wrapper around any [`Revisions`] backend

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ChangedFile, Revisions, VcsError};

type Key = (String, String);

/// Caches content and existence lookups by exact `(path, revision)`.
///
/// Revisions are immutable once named, so entries live for the lifetime of
/// the wrapper. Errors are never cached.
pub struct CachedRevisions<R> {
    inner: R,
    content: Mutex<HashMap<Key, Option<String>>>,
    exists: Mutex<HashMap<Key, bool>>,
}

impl<R: Revisions> CachedRevisions<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            content: Mutex::new(HashMap::new()),
            exists: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

fn key(path: &str, revision: &str) -> Key {
    (path.to_string(), revision.to_string())
}

impl<R: Revisions> Revisions for CachedRevisions<R> {
    fn file_content(&self, path: &str, revision: &str) -> Result<Option<String>, VcsError> {
        let k = key(path, revision);
        if let Ok(cache) = self.content.lock() {
            if let Some(hit) = cache.get(&k) {
                return Ok(hit.clone());
            }
        }
        // Lock released while the backend runs; a racing miss just queries twice
        let text = self.inner.file_content(path, revision)?;
        if let Ok(mut cache) = self.content.lock() {
            cache.insert(k, text.clone());
        }
        Ok(text)
    }

    fn file_exists(&self, path: &str, revision: &str) -> Result<bool, VcsError> {
        let k = key(path, revision);
        if let Ok(cache) = self.content.lock() {
            if let Some(hit) = cache.get(&k) {
                return Ok(hit.is_some());
            }
        }
        if let Ok(cache) = self.exists.lock() {
            if let Some(&hit) = cache.get(&k) {
                return Ok(hit);
            }
        }
        let found = self.inner.file_exists(path, revision)?;
        if let Ok(mut cache) = self.exists.lock() {
            cache.insert(k, found);
        }
        Ok(found)
    }

    fn list_files(&self, revision: &str) -> Result<Vec<String>, VcsError> {
        self.inner.list_files(revision)
    }

    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>, VcsError> {
        self.inner.changed_files(base, head)
    }

    fn verify_revision(&self, revision: &str) -> Result<(), VcsError> {
        self.inner.verify_revision(revision)
    }
}
