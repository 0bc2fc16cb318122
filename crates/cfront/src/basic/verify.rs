//! Expected-diagnostic verification.
//!
//! Sources annotate the diagnostics they expect with comments such as
//! `// expected-warning {{implicit conversion}}`, optionally anchored to
//! another line with `@+1` / `@-2`. The verifier compares annotations
//! against what the engine actually produced and reports both missing and
//! unexpected diagnostics.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::basic::diagnostic::{Diagnostic, Level};
use crate::basic::source_location::FileId;
use crate::basic::source_manager::SourceManager;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedDiag {
    pub level: Level,
    /// Substring the rendered message must contain.
    pub message: String,
    pub line: u32,
}

static EXPECTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*expected-(error|warning|note)(?:@([+-]?\d+))?\s*\{\{(.*?)\}\}").expect("pattern is valid")
});

/// Scan a buffer for expectation comments.
pub fn parse_expected(source: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();
    for (line_index, line) in source.lines().enumerate() {
        let line_no = line_index as u32 + 1;
        for captures in EXPECTED_RE.captures_iter(line) {
            let level = match &captures[1] {
                "error" => Level::Error,
                "warning" => Level::Warning,
                _ => Level::Note,
            };
            let target_line = match captures.get(2) {
                Some(delta) => {
                    let delta: i64 = delta.as_str().parse().unwrap_or(0);
                    (line_no as i64 + delta).max(1) as u32
                },
                None => line_no,
            };
            expected.push(ExpectedDiag {
                level,
                message: captures[3].to_owned(),
                line: target_line,
            });
        }
    }
    expected
}

/// Compare emitted diagnostics against the expectations in `file_id`'s
/// buffer. Returns human-readable problems; empty means verified.
pub fn check_expected(
    sm: &SourceManager,
    file_id: FileId,
    diagnostics: &[Diagnostic],
) -> Vec<String> {
    let source = String::from_utf8_lossy(sm.buffer_data(file_id)).into_owned();
    let mut expected = parse_expected(&source);
    let mut problems = Vec::new();

    for diagnostic in diagnostics {
        let line = if diagnostic.loc.is_valid() {
            sm.line_number(sm.logical_loc(diagnostic.loc))
        } else {
            0
        };
        let message = diagnostic.message();

        let position = expected.iter().position(|exp| {
            exp.level == diagnostic.level && exp.line == line && message.contains(&exp.message)
        });
        match position {
            Some(index) => {
                expected.remove(index);
            },
            None => {
                problems.push(format!("unexpected {:?} at line {line}: {message}", diagnostic.level));
            },
        }
    }

    for exp in expected {
        problems.push(format!("expected {:?} at line {}: {}", exp.level, exp.line, exp.message));
    }
    problems
}

#[cfg(test)]
#[path = "../../tests/src/basic/verify_tests.rs"]
mod tests;
