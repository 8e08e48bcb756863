//! Specifier to repository path resolution

use std::collections::HashSet;

use crate::classify::DEFAULT_EXTENSIONS;
use crate::vcs::Revisions;

/// Resolves relative and root-absolute specifiers to files at a revision.
///
/// Bare specifiers (`react`, `@playwright/test`) are package references and
/// never resolve. Candidate order: the literal path, the path plus each
/// extension, then `<path>/index` plus each extension.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    extensions: Vec<String>,
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl ImportResolver {
    /// Extensions may be given with or without the leading dot.
    pub fn new<E: AsRef<str>>(extensions: &[E]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty() && *e != ".")
            .map(|e| {
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        Self { extensions }
    }

    /// Candidate paths for an already-normalized target, in lookup order.
    pub fn candidates(&self, target: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(1 + self.extensions.len() * 2);
        out.push(target.to_string());
        for ext in &self.extensions {
            out.push(format!("{}{}", target, ext));
        }
        for ext in &self.extensions {
            out.push(format!("{}/index{}", target, ext));
        }
        out
    }

    /// Resolve `specifier` as written in `from_path` against `revision`.
    ///
    /// Returns the first candidate that exists, or `None` for external or
    /// unresolvable specifiers.
    pub fn resolve(
        &self,
        revisions: &dyn Revisions,
        specifier: &str,
        from_path: &str,
        revision: &str,
    ) -> Option<String> {
        let target = normalize_specifier(specifier, from_path)?;

        for candidate in self.candidates(&target) {
            match revisions.file_exists(&candidate, revision) {
                Ok(true) => return Some(candidate),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        candidate = %candidate,
                        revision,
                        error = %e,
                        "Existence check failed, treating as missing"
                    );
                }
            }
        }

        tracing::trace!(specifier, from = from_path, "Specifier did not resolve");
        None
    }

    /// Resolve against a known file list instead of checking each candidate.
    ///
    /// Same candidate order as [`resolve`](Self::resolve); `tree` is every file
    /// path at the revision, as returned by `Revisions::list_files`.
    pub fn resolve_in_tree(
        &self,
        tree: &HashSet<String>,
        specifier: &str,
        from_path: &str,
    ) -> Option<String> {
        let target = normalize_specifier(specifier, from_path)?;
        self.candidates(&target)
            .into_iter()
            .find(|candidate| tree.contains(candidate))
    }
}

/// Join `specifier` onto the directory of `from_path`, folding `.` and `..`.
///
/// A leading `/` anchors at the repository root. Returns `None` for bare
/// package specifiers and for paths that climb above the root.
pub fn normalize_specifier(specifier: &str, from_path: &str) -> Option<String> {
    let specifier = specifier.trim();
    let mut parts: Vec<&str> = if specifier.starts_with('/') {
        Vec::new()
    } else if specifier.starts_with('.') {
        let mut dir: Vec<&str> = from_path.split('/').filter(|p| !p.is_empty()).collect();
        dir.pop(); // file name
        dir
    } else {
        return None;
    };

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            name => parts.push(name),
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
