use super::*;

use crate::basic::diagnostic::{DiagCode, Diagnostic, Level};
use crate::basic::source_manager::SourceManager;

#[test]
fn expectations_parse_with_levels_and_anchors() {
    let source = "\
int x; // expected-warning {{shadow}}
// expected-error@+1 {{bad thing}}
int y;
// expected-note@-2 {{previous}}
";
    let expected = parse_expected(source);
    assert_eq!(expected.len(), 3);
    assert_eq!(expected[0], ExpectedDiag {
        level: Level::Warning,
        message: "shadow".to_owned(),
        line: 1,
    });
    assert_eq!(expected[1].level, Level::Error);
    assert_eq!(expected[1].line, 3);
    assert_eq!(expected[2].level, Level::Note);
    assert_eq!(expected[2].line, 2);
}

fn diag_at(
    sm: &SourceManager,
    file_id: crate::basic::source_location::FileId,
    offset: u32,
    code: DiagCode,
    level: Level,
    args: Vec<crate::basic::diagnostic::DiagArg>,
) -> Diagnostic {
    Diagnostic {
        level,
        code,
        loc: sm.location_for_offset(file_id, offset),
        args,
        ranges: Vec::new(),
        fixits: Vec::new(),
    }
}

#[test]
fn matching_diagnostics_verify_clean() {
    let source = "int x = 1.5; // expected-warning {{implicit conversion}}\n";
    let mut sm = SourceManager::new();
    let file_id = sm.create_file_id_for_buffer("input.c", source.as_bytes().to_vec());
    let diagnostics = vec![diag_at(
        &sm,
        file_id,
        8,
        DiagCode::WarnImplicitConversion,
        Level::Warning,
        vec![
            crate::basic::diagnostic::DiagArg::QualType("double".to_owned()),
            crate::basic::diagnostic::DiagArg::QualType("int".to_owned()),
        ],
    )];
    assert!(check_expected(&sm, file_id, &diagnostics).is_empty());
}

#[test]
fn missing_and_unexpected_diagnostics_are_reported() {
    let source = "int x; // expected-error {{never happens}}\n";
    let mut sm = SourceManager::new();
    let file_id = sm.create_file_id_for_buffer("input.c", source.as_bytes().to_vec());

    let unexpected =
        vec![diag_at(&sm, file_id, 0, DiagCode::ErrExpectedExpression, Level::Error, Vec::new())];
    let problems = check_expected(&sm, file_id, &unexpected);
    assert_eq!(problems.len(), 2);
    assert!(problems.iter().any(|p| p.contains("unexpected")));
    assert!(problems.iter().any(|p| p.contains("never happens")));
}
