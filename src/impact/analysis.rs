//! Analysis driver: direct diffing plus indirect import impact

use std::collections::HashSet;

use rayon::prelude::*;
use thiserror::Error;

use crate::classify::TestFileClassifier;
use crate::extract::TestExtractor;
use crate::imports::ImportResolver;
use crate::vcs::{ChangedFile, Revisions, VcsError};

use super::diff::diff_file_pair;
use super::types::{
    ChangeType, FileChangeSummary, FileRevisionPair, ImpactAnalysisResult, ImpactSummary,
    TestChangeRecord,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid revision '{revision}': {source}")]
    InvalidRevision {
        revision: String,
        #[source]
        source: VcsError,
    },
    #[error("Repository query failed: {0}")]
    Vcs(#[from] VcsError),
}

/// Runs impact analysis against one repository.
///
/// Holds no per-run state; `analyze` is a pure function of the two
/// revisions and the backend's answers.
pub struct Analyzer<'a> {
    pub(super) revisions: &'a dyn Revisions,
    pub(super) extractor: TestExtractor,
    pub(super) resolver: ImportResolver,
    pub(super) classifier: TestFileClassifier,
}

impl<'a> Analyzer<'a> {
    pub fn new(revisions: &'a dyn Revisions) -> Self {
        Self {
            revisions,
            extractor: TestExtractor::default(),
            resolver: ImportResolver::default(),
            classifier: TestFileClassifier::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: TestExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_resolver(mut self, resolver: ImportResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_classifier(mut self, classifier: TestFileClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Analyze `base..head`.
    ///
    /// Invalid revisions and failed list queries are fatal. Per-file read
    /// problems in the indirect pass are logged and skipped.
    pub fn analyze(&self, base: &str, head: &str) -> Result<ImpactAnalysisResult, AnalysisError> {
        let _span = tracing::info_span!("analyze", base, head).entered();

        for revision in [base, head] {
            self.revisions
                .verify_revision(revision)
                .map_err(|source| AnalysisError::InvalidRevision {
                    revision: revision.to_string(),
                    source,
                })?;
        }

        let mut changed = self.revisions.changed_files(base, head)?;
        changed.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(changed = changed.len(), "Listed changed files");

        let (test_changes, other_changes): (Vec<&ChangedFile>, Vec<&ChangedFile>) =
            changed.iter().partition(|f| self.is_test_change(f));

        // Direct pass: one atomic batch of records per changed test file
        let direct_batches: Vec<(FileChangeSummary, Vec<TestChangeRecord>)> = test_changes
            .par_iter()
            .map(|file| self.diff_changed_test(file, base, head))
            .collect::<Result<_, VcsError>>()?;

        let changed_test_files: HashSet<String> =
            test_changes.iter().map(|f| f.path.clone()).collect();
        let changed_non_test_files: HashSet<String> =
            other_changes.iter().map(|f| f.path.clone()).collect();

        let indirect = if changed_non_test_files.is_empty() {
            Vec::new()
        } else {
            // One listing answers every import existence check
            let head_files: HashSet<String> =
                self.revisions.list_files(head)?.into_iter().collect();
            self.resolve_indirect(
                &changed_non_test_files,
                &head_files,
                &changed_test_files,
                head,
            )
        };

        let mut files: Vec<FileChangeSummary> = Vec::with_capacity(changed.len());
        let mut direct = Vec::new();
        for (summary, records) in direct_batches {
            files.push(summary);
            direct.extend(records);
        }
        files.extend(other_changes.iter().map(|f| FileChangeSummary {
            path: f.path.clone(),
            old_path: f.old_path.clone(),
            change: f.change,
            is_test_file: false,
            tests_added: 0,
            tests_removed: 0,
            tests_modified: 0,
        }));
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let summary = summarize(&files, &direct, &indirect);
        tracing::info!(
            direct = direct.len(),
            indirect = indirect.len(),
            test_files_changed = summary.test_files_changed,
            "Analysis complete"
        );

        Ok(ImpactAnalysisResult {
            base: base.to_string(),
            head: head.to_string(),
            files,
            direct,
            indirect,
            summary,
        })
    }

    /// A rename counts as a test change if either side is a test file.
    fn is_test_change(&self, file: &ChangedFile) -> bool {
        self.classifier.is_test_file(&file.path)
            || file
                .old_path
                .as_deref()
                .is_some_and(|p| self.classifier.is_test_file(p))
    }

    fn diff_changed_test(
        &self,
        file: &ChangedFile,
        base: &str,
        head: &str,
    ) -> Result<(FileChangeSummary, Vec<TestChangeRecord>), VcsError> {
        let base_text = match file.base_path() {
            Some(p) => self.revisions.file_content(p, base)?,
            None => None,
        };
        let head_text = match file.head_path() {
            Some(p) => self.revisions.file_content(p, head)?,
            None => None,
        };

        let pair = FileRevisionPair {
            path: file.path.clone(),
            base: base_text,
            head: head_text,
        };
        let records = diff_file_pair(&pair, &self.extractor);

        let count = |t: ChangeType| records.iter().filter(|r| r.change_type == t).count();
        let summary = FileChangeSummary {
            path: file.path.clone(),
            old_path: file.old_path.clone(),
            change: file.change,
            is_test_file: true,
            tests_added: count(ChangeType::Added),
            tests_removed: count(ChangeType::Removed),
            tests_modified: count(ChangeType::Modified),
        };
        Ok((summary, records))
    }
}

/// Counters over the combined record lists.
fn summarize(
    files: &[FileChangeSummary],
    direct: &[TestChangeRecord],
    indirect: &[TestChangeRecord],
) -> ImpactSummary {
    let count = |t: ChangeType| direct.iter().filter(|r| r.change_type == t).count();
    ImpactSummary {
        total_files_changed: files.len(),
        test_files_changed: files.iter().filter(|f| f.is_test_file).count(),
        tests_added: count(ChangeType::Added),
        tests_removed: count(ChangeType::Removed),
        tests_modified: count(ChangeType::Modified),
        tests_indirectly_impacted: indirect.len(),
    }
}

/// Analyze with default extraction, resolution and classification rules.
pub fn analyze(
    revisions: &dyn Revisions,
    base: &str,
    head: &str,
) -> Result<ImpactAnalysisResult, AnalysisError> {
    Analyzer::new(revisions).analyze(base, head)
}
