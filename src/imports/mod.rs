//! Import reference extraction and resolution
//!
//! Two lexical shapes are recognized per line:
//! - static: `import x from '<spec>'`, `export { y } from '<spec>'`,
//!   bare `import '<spec>'`
//! - runtime: `require('<spec>')`, `import('<spec>')`
//!
//! Resolution maps a specifier to a file in the repository at a revision;
//! see [`ImportResolver`].

mod resolve;

pub use resolve::{normalize_specifier, ImportResolver};

use std::sync::LazyLock;

use regex::Regex;

static STATIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:from|import)\s+['"]([^'"\n]+)['"]"#).expect("hardcoded import regex")
});

static RUNTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:require|import)\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#)
        .expect("hardcoded require regex")
});

/// A module specifier and the 1-based line it appears on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    pub specifier: String,
    pub line: u32,
}

/// All import specifiers in `text`, in line then column order.
pub fn extract_references(text: &str) -> Vec<ImportReference> {
    let mut refs = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let mut hits: Vec<(usize, &str)> = STATIC_RE
            .captures_iter(line)
            .chain(RUNTIME_RE.captures_iter(line))
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        hits.sort_by_key(|&(col, _)| col);

        refs.extend(hits.into_iter().map(|(_, spec)| ImportReference {
            specifier: spec.to_string(),
            line: (idx + 1) as u32,
        }));
    }

    refs
}
