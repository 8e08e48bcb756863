//! Declaration diffing between two revisions of one file

use std::collections::{HashMap, VecDeque};

use crate::extract::{DeclarationKind, TestDeclaration, TestExtractor};

use super::types::{ChangeType, FileRevisionPair, ImpactOrigin, TestChangeRecord};

/// Classify each declaration as added, removed or modified.
///
/// Head declarations are matched to the first unmatched base declaration
/// with the same `(name, kind)`. Matched pairs with identical bodies are
/// unchanged and produce nothing; position and line number are not part of
/// the identity, so a test that only moved is not reported. Records come out
/// in head order, followed by removals in base order.
pub fn diff_declarations(
    file_path: &str,
    base: &[TestDeclaration],
    head: &[TestDeclaration],
) -> Vec<TestChangeRecord> {
    // key -> unmatched base indices, in file order
    let mut pending: HashMap<(&str, DeclarationKind), VecDeque<usize>> = HashMap::new();
    for (idx, decl) in base.iter().enumerate() {
        pending.entry(decl.key()).or_default().push_back(idx);
    }

    let mut matched = vec![false; base.len()];
    let mut records = Vec::new();

    for decl in head {
        let counterpart = pending.get_mut(&decl.key()).and_then(VecDeque::pop_front);
        match counterpart {
            None => records.push(direct(ChangeType::Added, file_path, decl)),
            Some(idx) => {
                matched[idx] = true;
                if base[idx].body != decl.body {
                    records.push(direct(ChangeType::Modified, file_path, decl));
                }
            }
        }
    }

    for (idx, decl) in base.iter().enumerate() {
        if !matched[idx] {
            records.push(direct(ChangeType::Removed, file_path, decl));
        }
    }

    records
}

/// Extract both sides of a file pair and diff them.
///
/// Absent base content makes every head declaration an addition; absent
/// head content makes every base declaration a removal.
pub fn diff_file_pair(pair: &FileRevisionPair, extractor: &TestExtractor) -> Vec<TestChangeRecord> {
    let base = pair
        .base
        .as_deref()
        .map(|t| extractor.extract(t))
        .unwrap_or_default();
    let head = pair
        .head
        .as_deref()
        .map(|t| extractor.extract(t))
        .unwrap_or_default();
    let records = diff_declarations(&pair.path, &base, &head);
    tracing::debug!(
        file = %pair.path,
        base_decls = base.len(),
        head_decls = head.len(),
        records = records.len(),
        "Diffed test file"
    );
    records
}

fn direct(change_type: ChangeType, file_path: &str, decl: &TestDeclaration) -> TestChangeRecord {
    TestChangeRecord {
        change_type,
        test_name: decl.name.clone(),
        file_path: file_path.to_string(),
        line_number: decl.start_line,
        kind: decl.kind,
        impact_origin: ImpactOrigin::Direct,
        impacted_by: None,
    }
}
