//! End-to-end analysis tests over in-memory repositories

mod common;

use std::collections::HashSet;

use common::{spec_file, two_revisions};
use tia::{
    analyze, impact_to_json, runnable_command, AnalysisError, ChangeKind, ChangeType,
    DeclarationKind, ImpactOrigin, ImpactSummary,
};

#[test]
fn test_added_test_is_direct() {
    let base = spec_file(&["List sessions"]);
    let head = format!(
        "{}test('Filter sessions by user', async () => {{\n  await filter();\n}});\n",
        base
    );
    let repo = two_revisions(
        &[("tests/sessions.spec.ts", &base)],
        &[("tests/sessions.spec.ts", &head)],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    assert_eq!(result.direct.len(), 1);
    let r = &result.direct[0];
    assert_eq!(r.change_type, ChangeType::Added);
    assert_eq!(r.impact_origin, ImpactOrigin::Direct);
    assert_eq!(r.kind, DeclarationKind::Test);
    assert_eq!(r.test_name, "Filter sessions by user");
    assert_eq!(r.file_path, "tests/sessions.spec.ts");
    assert_eq!(r.line_number, 4);
    assert!(result.indirect.is_empty());
}

#[test]
fn test_removed_test_inside_suite() {
    let base = "\
test.describe('Suite', () => {
  test('keep', async () => {
    expect(1).toBe(1);
  });
  test('drop', async () => {
    expect(2).toBe(2);
  });
});
";
    let head = "\
test.describe('Suite', () => {
  test('keep', async () => {
    expect(1).toBe(1);
  });
});
";
    let repo = two_revisions(
        &[("tests/suite.spec.ts", base)],
        &[("tests/suite.spec.ts", head)],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    let removed: Vec<_> = result
        .direct
        .iter()
        .filter(|r| r.change_type == ChangeType::Removed)
        .collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].test_name, "drop");
    assert_eq!(removed[0].line_number, 5);
    assert!(result.direct.iter().all(|r| r.test_name != "keep"));

    // The suite's captured body lost the nested test, so it reads as modified
    let suite: Vec<_> = result
        .direct
        .iter()
        .filter(|r| r.kind == DeclarationKind::Suite)
        .collect();
    assert_eq!(suite.len(), 1);
    assert_eq!(suite[0].change_type, ChangeType::Modified);
}

#[test]
fn test_changed_helper_impacts_importing_tests() {
    let importer = "\
import { h } from '../utils/helpers';

test.describe('Helpers', () => {
  test('uses h', async () => {
    expect(h).toBeTruthy();
  });
  test('still uses h', async () => {});
});
";
    let repo = two_revisions(
        &[
            ("tests/utils/helpers.ts", "export const h = 1;\n"),
            ("tests/e2e/a.spec.ts", importer),
            ("tests/e2e/b.spec.ts", &spec_file(&["unrelated"])),
        ],
        &[
            ("tests/utils/helpers.ts", "export const h = 2;\n"),
            ("tests/e2e/a.spec.ts", importer),
            ("tests/e2e/b.spec.ts", &spec_file(&["unrelated"])),
        ],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    assert!(result.direct.is_empty());
    assert_eq!(result.indirect.len(), 3);
    for r in &result.indirect {
        assert_eq!(r.change_type, ChangeType::Modified);
        assert_eq!(r.impact_origin, ImpactOrigin::Indirect);
        assert_eq!(r.file_path, "tests/e2e/a.spec.ts");
        assert_eq!(r.impacted_by.as_deref(), Some("tests/utils/helpers.ts"));
    }
    let names: Vec<_> = result.indirect.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(names, vec!["Helpers", "uses h", "still uses h"]);
    assert_eq!(result.summary.total_files_changed, 1);
    assert_eq!(result.summary.test_files_changed, 0);
    assert_eq!(result.summary.tests_indirectly_impacted, 3);
}

#[test]
fn test_unimported_non_test_change_has_no_impact() {
    let spec = spec_file(&["home"]);
    let repo = two_revisions(
        &[("package.json", "{}"), ("tests/home.spec.ts", &spec)],
        &[("package.json", "{\"private\": true}"), ("tests/home.spec.ts", &spec)],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    assert!(result.direct.is_empty());
    assert!(result.indirect.is_empty());
    assert_eq!(result.summary.total_files_changed, 1);
    assert_eq!(result.summary.test_files_changed, 0);
    assert!(result.is_empty());
}

#[test]
fn test_analysis_is_idempotent() {
    let repo = two_revisions(
        &[
            ("src/api.ts", "export const v = 1;"),
            ("tests/a.spec.ts", &spec_file(&["a", "b"])),
            ("tests/c.spec.ts", "import { v } from '../src/api';\ntest('c', () => {});\n"),
        ],
        &[
            ("src/api.ts", "export const v = 2;"),
            ("tests/a.spec.ts", &spec_file(&["a", "z"])),
            ("tests/c.spec.ts", "import { v } from '../src/api';\ntest('c', () => {});\n"),
        ],
    );
    let first = analyze(&repo, "base", "head").unwrap();
    let second = analyze(&repo, "base", "head").unwrap();
    assert_eq!(first, second);
    assert!(!first.direct.is_empty());
    assert!(!first.indirect.is_empty());
}

#[test]
fn test_indirect_files_never_in_direct_list() {
    let importer = |title: &str| {
        format!("import {{ v }} from '../src/api';\ntest('{}', () => {{}});\n", title)
    };
    let repo = two_revisions(
        &[
            ("src/api.ts", "export const v = 1;"),
            ("tests/changed.spec.ts", &importer("old")),
            ("tests/untouched.spec.ts", &importer("same")),
        ],
        &[
            ("src/api.ts", "export const v = 2;"),
            ("tests/changed.spec.ts", &importer("new")),
            ("tests/untouched.spec.ts", &importer("same")),
        ],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    let direct_files: HashSet<_> = result.direct.iter().map(|r| r.file_path.as_str()).collect();
    let indirect_files: HashSet<_> = result.indirect.iter().map(|r| r.file_path.as_str()).collect();
    assert_eq!(direct_files, HashSet::from(["tests/changed.spec.ts"]));
    assert_eq!(indirect_files, HashSet::from(["tests/untouched.spec.ts"]));
}

#[test]
fn test_deleted_test_file_not_runnable() {
    let repo = two_revisions(
        &[("tests/gone.spec.ts", &spec_file(&["x", "y"]))],
        &[("README.md", "docs")],
    );

    let result = analyze(&repo, "base", "head").unwrap();
    assert_eq!(result.summary.tests_removed, 2);
    assert!(result
        .direct
        .iter()
        .all(|r| r.change_type == ChangeType::Removed));
    let gone = result
        .files
        .iter()
        .find(|f| f.path == "tests/gone.spec.ts")
        .unwrap();
    assert_eq!(gone.change, ChangeKind::Deleted);
    assert!(result.impacted_test_files().is_empty());
    assert_eq!(runnable_command(&result, "npx playwright test"), None);
}

#[test]
fn test_new_test_file_all_added() {
    let repo = two_revisions(&[], &[("e2e/login.test.js", &spec_file(&["login", "logout"]))]);
    let result = analyze(&repo, "base", "head").unwrap();
    assert_eq!(
        result.summary,
        ImpactSummary {
            total_files_changed: 1,
            test_files_changed: 1,
            tests_added: 2,
            tests_removed: 0,
            tests_modified: 0,
            tests_indirectly_impacted: 0,
        }
    );
    assert_eq!(
        runnable_command(&result, "npx playwright test").as_deref(),
        Some("npx playwright test e2e/login.test.js")
    );
}

#[test]
fn test_runner_config_counts_as_test_file() {
    let repo = two_revisions(
        &[("playwright.config.ts", "export default { retries: 0 };")],
        &[("playwright.config.ts", "export default { retries: 2 };")],
    );
    let result = analyze(&repo, "base", "head").unwrap();
    assert_eq!(result.summary.test_files_changed, 1);
    assert!(result.direct.is_empty());
}

#[test]
fn test_require_and_index_imports() {
    let spec = "const pages = require('../pages');\ntest('nav', () => {});\n";
    let repo = two_revisions(
        &[("pages/index.js", "module.exports = 1;"), ("tests/nav.spec.js", spec)],
        &[("pages/index.js", "module.exports = 2;"), ("tests/nav.spec.js", spec)],
    );
    let result = analyze(&repo, "base", "head").unwrap();
    assert_eq!(result.indirect.len(), 1);
    assert_eq!(result.indirect[0].impacted_by.as_deref(), Some("pages/index.js"));
}

#[test]
fn test_unknown_revision_is_fatal() {
    let repo = two_revisions(&[], &[]);
    let err = analyze(&repo, "missing", "head").unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRevision { ref revision, .. } if revision == "missing"));
}

#[test]
fn test_json_report() {
    let repo = two_revisions(
        &[("tests/a.spec.ts", &spec_file(&["a"]))],
        &[("tests/a.spec.ts", &spec_file(&["a", "b"]))],
    );
    let result = analyze(&repo, "base", "head").unwrap();
    let json = impact_to_json(&result);
    assert_eq!(json["summary"]["tests_added"], 1);
    assert_eq!(json["direct"][0]["test_name"], "b");
    assert_eq!(json["direct"][0]["change_type"], "added");
    assert!(json["direct"][0]["impacted_by"].is_null());
    assert_eq!(json["files"][0]["change"], "modified");
    assert_eq!(json["impacted_test_files"][0], "tests/a.spec.ts");
}
