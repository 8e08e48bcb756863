//! Test impact analysis core
//!
//! Direct impact comes from diffing the declarations of each changed test
//! file. Indirect impact comes from unchanged test files that import a
//! changed non-test file (one hop only).

mod analysis;
mod diff;
mod format;
mod indirect;
mod types;

pub use types::{
    ChangeType, FileChangeSummary, FileRevisionPair, ImpactAnalysisResult, ImpactOrigin,
    ImpactSummary, TestChangeRecord,
};

pub use analysis::{analyze, AnalysisError, Analyzer};
pub use diff::{diff_declarations, diff_file_pair};
pub use format::{impact_to_json, runnable_command};
