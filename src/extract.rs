//! Test block extraction
//!
//! Lexical scan for `test(...)` / `describe(...)` style declarations in
//! JavaScript and TypeScript test files. No parser: each line is matched
//! against a fixed set of signatures, and a declaration's body is captured by
//! counting `{` / `}` from its first line until the braces balance.
//!
//! Brace counting ignores strings and comments, so a stray `}` inside a
//! literal can end a body early. That only affects whether two bodies
//! compare equal; extraction itself never fails.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Hard cap on captured body lines, declaration line included.
pub const DEFAULT_MAX_CAPTURE_LINES: usize = 500;

/// Quoted first argument: single, double or backtick, escapes kept as written
const NAME_ARG: &str = r#"\s*\(\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|`((?:[^`\\]|\\.)*)`)"#;

static SUITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:test\.describe|describe)(?:\.(?:only|skip))?{}",
        NAME_ARG
    ))
    .expect("hardcoded suite regex")
});

static TEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*(?:test|it)(?:\.(?:only|skip))?{}", NAME_ARG))
        .expect("hardcoded test regex")
});

/// Leaf test or grouping suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Test,
    Suite,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclarationKind::Test => write!(f, "test"),
            DeclarationKind::Suite => write!(f, "suite"),
        }
    }
}

/// One test or suite found in file text.
///
/// Identity for diffing is `(name, kind)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDeclaration {
    /// Declared title as written in source
    pub name: String,
    pub kind: DeclarationKind,
    /// 1-based line of the declaration
    pub start_line: u32,
    /// Source from the declaration line through its matching `}`
    pub body: String,
}

impl TestDeclaration {
    pub fn key(&self) -> (&str, DeclarationKind) {
        (&self.name, self.kind)
    }
}

/// Extract declarations with the default capture cap.
pub fn extract_tests(text: &str) -> Vec<TestDeclaration> {
    TestExtractor::default().extract(text)
}

/// Line-based declaration scanner
#[derive(Debug, Clone, Copy)]
pub struct TestExtractor {
    max_lines: usize,
}

impl Default for TestExtractor {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_CAPTURE_LINES,
        }
    }
}

impl TestExtractor {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
        }
    }

    /// Declarations in file order. Duplicates are kept.
    pub fn extract(&self, text: &str) -> Vec<TestDeclaration> {
        let lines: Vec<&str> = text.lines().collect();
        let mut found = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let (kind, caps) = if let Some(caps) = SUITE_RE.captures(line) {
                (DeclarationKind::Suite, caps)
            } else if let Some(caps) = TEST_RE.captures(line) {
                (DeclarationKind::Test, caps)
            } else {
                continue;
            };

            found.push(TestDeclaration {
                name: quoted_name(&caps),
                kind,
                start_line: (idx + 1) as u32,
                body: self.capture_body(&lines, idx),
            });
        }

        found
    }

    fn capture_body(&self, lines: &[&str], start: usize) -> String {
        let end = start.saturating_add(self.max_lines).min(lines.len());
        let mut scanner = BraceScanner::default();

        for idx in start..end {
            if scanner.feed(lines[idx]) {
                return lines[start..=idx].join("\n");
            }
        }

        if end - start == self.max_lines {
            tracing::debug!(
                line = start + 1,
                cap = self.max_lines,
                "Declaration body hit capture cap, truncating"
            );
        }
        lines[start..end].join("\n")
    }
}

fn quoted_name(caps: &Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Brace-depth state machine.
///
/// Depth tracking starts at the first `{`; closers before it are ignored.
/// Balance is checked at line ends, so `async ({ page }) => {` keeps the
/// body open.
#[derive(Debug, Default)]
struct BraceScanner {
    depth: i64,
    opened: bool,
}

impl BraceScanner {
    /// Feed one line. Returns true once the body has opened and the depth
    /// is back to zero at the end of this line.
    fn feed(&mut self, line: &str) -> bool {
        for ch in line.chars() {
            match ch {
                '{' => {
                    self.depth += 1;
                    self.opened = true;
                }
                '}' if self.opened => self.depth -= 1,
                _ => {}
            }
        }
        self.opened && self.depth <= 0
    }
}
