//! Structured output and runnable-command rendering

use super::types::ImpactAnalysisResult;

/// Serialize a result with stable, snake_case keys.
///
/// The derived layout of [`ImpactAnalysisResult`] plus the sorted
/// `impacted_test_files` list.
pub fn impact_to_json(result: &ImpactAnalysisResult) -> serde_json::Value {
    serde_json::json!({
        "base": result.base,
        "head": result.head,
        "files": result.files,
        "direct": result.direct,
        "indirect": result.indirect,
        "impacted_test_files": result.impacted_test_files(),
        "summary": result.summary,
    })
}

/// Shell command running only the impacted test files.
///
/// `runner` is used verbatim (e.g. `npx playwright test`); file paths are
/// shell-quoted. Returns `None` when nothing needs to run.
pub fn runnable_command(result: &ImpactAnalysisResult, runner: &str) -> Option<String> {
    let files = result.impacted_test_files();
    if files.is_empty() {
        return None;
    }
    let quoted: Vec<_> = files.iter().map(|f| shell_words::quote(f)).collect();
    Some(format!("{} {}", runner.trim(), quoted.join(" ")))
}
