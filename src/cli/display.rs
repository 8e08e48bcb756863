//! Output and display functions for CLI results

use std::fmt::Write as _;

use colored::Colorize;

use tia::{ChangeType, ImpactAnalysisResult, TestChangeRecord};

/// Print a grouped listing: direct changes per file, then indirect impact.
pub fn display_text(result: &ImpactAnalysisResult, quiet: bool) {
    print!("{}", format_text(result, quiet));
}

pub(crate) fn format_text(result: &ImpactAnalysisResult, quiet: bool) -> String {
    let mut out = String::new();

    if !quiet {
        let _ = writeln!(
            out,
            "{} {}..{}",
            "Test impact".bold(),
            result.base.cyan(),
            result.head.cyan()
        );
        let s = &result.summary;
        let _ = writeln!(
            out,
            "{} files changed, {} test files",
            s.total_files_changed, s.test_files_changed
        );
    }

    if result.direct.is_empty() && result.indirect.is_empty() {
        if !quiet {
            let _ = writeln!(out, "\n{}", "No tests impacted.".dimmed());
        }
        return out;
    }

    if !result.direct.is_empty() {
        if !quiet {
            let _ = writeln!(out, "\n{}", "Direct".bold().underline());
        }
        for (file, records) in group_by_file(&result.direct) {
            let _ = writeln!(out, "{}", file.bold());
            for r in records {
                let _ = writeln!(out, "  {}", record_line(r));
            }
        }
    }

    if !result.indirect.is_empty() {
        if !quiet {
            let _ = writeln!(out, "\n{}", "Indirect".bold().underline());
        }
        for (file, records) in group_by_file(&result.indirect) {
            let via = records
                .first()
                .and_then(|r| r.impacted_by.as_deref())
                .unwrap_or("?");
            let _ = writeln!(out, "{} {}", file.bold(), format!("(via {})", via).dimmed());
            for r in records {
                let _ = writeln!(out, "  {}", record_line(r));
            }
        }
    }

    if !quiet {
        let s = &result.summary;
        let _ = writeln!(
            out,
            "\n{} added, {} removed, {} modified, {} indirectly impacted",
            s.tests_added.to_string().green(),
            s.tests_removed.to_string().red(),
            s.tests_modified.to_string().yellow(),
            s.tests_indirectly_impacted.to_string().blue()
        );
    }
    out
}

/// Consecutive runs of records sharing a file; analysis emits them grouped.
fn group_by_file(records: &[TestChangeRecord]) -> Vec<(&str, Vec<&TestChangeRecord>)> {
    let mut groups: Vec<(&str, Vec<&TestChangeRecord>)> = Vec::new();
    for r in records {
        match groups.last_mut() {
            Some((file, group)) if *file == r.file_path => group.push(r),
            _ => groups.push((r.file_path.as_str(), vec![r])),
        }
    }
    groups
}

fn record_line(r: &TestChangeRecord) -> String {
    let marker = match r.change_type {
        ChangeType::Added => "+".green(),
        ChangeType::Removed => "-".red(),
        ChangeType::Modified => "~".yellow(),
    };
    format!(
        "{} {} \"{}\" {}",
        marker,
        r.kind,
        r.test_name,
        format!("(line {})", r.line_number).dimmed()
    )
}
