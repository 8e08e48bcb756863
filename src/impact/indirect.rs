//! Indirect impact: unchanged test files importing changed files

use std::collections::HashSet;

use rayon::prelude::*;

use crate::imports::extract_references;

use super::analysis::Analyzer;
use super::types::{ChangeType, ImpactOrigin, TestChangeRecord};

impl Analyzer<'_> {
    /// Attribute every declaration in an unchanged test file that imports a
    /// changed non-test file.
    ///
    /// Files in `changed_test_files` are skipped; their impact is already
    /// covered by direct diffing. References are resolved in order and the
    /// first one landing in `changed_non_test_files` wins, so each file gets
    /// at most one `impacted_by`. Only direct imports count.
    ///
    /// `head_files` is the full file list at `head`; candidate test files
    /// come from it and import specifiers are resolved against it.
    pub fn resolve_indirect(
        &self,
        changed_non_test_files: &HashSet<String>,
        head_files: &HashSet<String>,
        changed_test_files: &HashSet<String>,
        head: &str,
    ) -> Vec<TestChangeRecord> {
        if changed_non_test_files.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<&String> = head_files
            .iter()
            .filter(|p| self.classifier.is_test_file(p) && !changed_test_files.contains(*p))
            .collect();
        candidates.sort();

        let _span = tracing::info_span!(
            "resolve_indirect",
            changed = changed_non_test_files.len(),
            candidates = candidates.len()
        )
        .entered();

        let batches: Vec<Vec<TestChangeRecord>> = candidates
            .par_iter()
            .map(|path| self.indirect_for_file(path, changed_non_test_files, head_files, head))
            .collect();

        batches.into_iter().flatten().collect()
    }

    fn indirect_for_file(
        &self,
        path: &str,
        changed_non_test_files: &HashSet<String>,
        head_files: &HashSet<String>,
        head: &str,
    ) -> Vec<TestChangeRecord> {
        let text = match self.revisions.file_content(path, head) {
            Ok(Some(t)) => t,
            Ok(None) => {
                tracing::debug!(file = path, "Test file missing at head, skipping");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(file = path, error = %e, "Failed to read test file, skipping");
                return Vec::new();
            }
        };

        let Some(trigger) = self.first_changed_import(path, &text, changed_non_test_files, head_files)
        else {
            return Vec::new();
        };

        let records: Vec<TestChangeRecord> = self
            .extractor
            .extract(&text)
            .into_iter()
            .map(|decl| TestChangeRecord {
                change_type: ChangeType::Modified,
                test_name: decl.name,
                file_path: path.to_string(),
                line_number: decl.start_line,
                kind: decl.kind,
                impact_origin: ImpactOrigin::Indirect,
                impacted_by: Some(trigger.clone()),
            })
            .collect();
        tracing::debug!(
            file = path,
            impacted_by = %trigger,
            tests = records.len(),
            "Indirectly impacted test file"
        );
        records
    }

    fn first_changed_import(
        &self,
        path: &str,
        text: &str,
        changed_non_test_files: &HashSet<String>,
        head_files: &HashSet<String>,
    ) -> Option<String> {
        extract_references(text).into_iter().find_map(|reference| {
            self.resolver
                .resolve_in_tree(head_files, &reference.specifier, path)
                .filter(|resolved| changed_non_test_files.contains(resolved))
        })
    }
}
