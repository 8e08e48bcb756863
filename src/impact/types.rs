//! Data types for test impact analysis

use std::collections::BTreeSet;

use crate::extract::DeclarationKind;
use crate::vcs::ChangeKind;

/// How a declaration changed between base and head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Added => write!(f, "added"),
            ChangeType::Removed => write!(f, "removed"),
            ChangeType::Modified => write!(f, "modified"),
        }
    }
}

/// Whether a test changed itself or sits in a file importing changed code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactOrigin {
    Direct,
    Indirect,
}

impl std::fmt::Display for ImpactOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactOrigin::Direct => write!(f, "direct"),
            ImpactOrigin::Indirect => write!(f, "indirect"),
        }
    }
}

/// One impacted test or suite
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TestChangeRecord {
    pub change_type: ChangeType,
    pub test_name: String,
    pub file_path: String,
    /// Head line for added/modified/indirect records, base line for removals
    pub line_number: u32,
    pub kind: DeclarationKind,
    pub impact_origin: ImpactOrigin,
    /// Changed file whose import caused an indirect record
    pub impacted_by: Option<String>,
}

impl TestChangeRecord {
    /// Serialize with a fixed key set (null `impacted_by` for direct records).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// A file's text at both revisions; `None` means absent at that revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRevisionPair {
    pub path: String,
    pub base: Option<String>,
    pub head: Option<String>,
}

/// Per-file change metadata
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileChangeSummary {
    pub path: String,
    pub old_path: Option<String>,
    pub change: ChangeKind,
    pub is_test_file: bool,
    pub tests_added: usize,
    pub tests_removed: usize,
    pub tests_modified: usize,
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImpactSummary {
    pub total_files_changed: usize,
    pub test_files_changed: usize,
    pub tests_added: usize,
    pub tests_removed: usize,
    pub tests_modified: usize,
    pub tests_indirectly_impacted: usize,
}

/// Complete result of analyzing a base/head pair
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImpactAnalysisResult {
    pub base: String,
    pub head: String,
    pub files: Vec<FileChangeSummary>,
    pub direct: Vec<TestChangeRecord>,
    pub indirect: Vec<TestChangeRecord>,
    pub summary: ImpactSummary,
}

impl ImpactAnalysisResult {
    /// True when no test needs to run.
    pub fn is_empty(&self) -> bool {
        self.impacted_test_files().is_empty()
    }

    /// Test files a runner must execute, sorted.
    ///
    /// Files whose only direct records are removals have nothing left to
    /// run and are excluded.
    pub fn impacted_test_files(&self) -> Vec<&str> {
        let files: BTreeSet<&str> = self
            .direct
            .iter()
            .filter(|r| r.change_type != ChangeType::Removed)
            .chain(self.indirect.iter())
            .map(|r| r.file_path.as_str())
            .collect();
        files.into_iter().collect()
    }

    /// All records, direct first.
    pub fn records(&self) -> impl Iterator<Item = &TestChangeRecord> {
        self.direct.iter().chain(self.indirect.iter())
    }
}
