//! # tia - Test Impact Analysis
//!
//! Given two revisions of a repository, find which tests a change touches.
//!
//! ## How it works
//!
//! - **Direct impact**: every changed test file is diffed declaration by
//!   declaration (`test(...)`, `it(...)`, `describe(...)` and friends),
//!   producing added, removed and modified records.
//! - **Indirect impact**: unchanged test files that directly import a changed
//!   non-test file have all of their declarations reported as impacted.
//!
//! Extraction is lexical (regexes plus brace counting), not a full parse.
//!
//! ## Quick Start
//!
//! ```
//! use tia::{analyze, MemoryRepo};
//!
//! # fn main() -> anyhow::Result<()> {
//! let repo = MemoryRepo::new()
//!     .with_revision("base", [("tests/a.spec.ts", "test('a', () => {});\n")])
//!     .with_revision(
//!         "head",
//!         [("tests/a.spec.ts", "test('a', () => {});\ntest('b', () => {});\n")],
//!     );
//!
//! let result = analyze(&repo, "base", "head")?;
//! assert_eq!(result.summary.tests_added, 1);
//! assert_eq!(result.impacted_test_files(), vec!["tests/a.spec.ts"]);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod extract;
pub mod impact;
pub mod imports;
pub mod vcs;

pub use classify::{is_test_file, TestFileClassifier};
pub use config::Config;
pub use extract::{extract_tests, DeclarationKind, TestDeclaration, TestExtractor};
pub use impact::{
    analyze, impact_to_json, runnable_command, AnalysisError, Analyzer, ChangeType,
    FileChangeSummary, ImpactAnalysisResult, ImpactOrigin, ImpactSummary, TestChangeRecord,
};
pub use imports::{extract_references, ImportReference, ImportResolver};
pub use vcs::{CachedRevisions, ChangeKind, ChangedFile, GitRepo, MemoryRepo, Revisions, VcsError};
