use super::*;

use crate::basic::source_location::{FileId, SourceLocation};

fn engine_with_buffer() -> (DiagnosticsEngine, SharedDiagnosticBuffer) {
    let buffer = SharedDiagnosticBuffer::new();
    let engine = DiagnosticsEngine::new(Box::new(buffer.clone()));
    (engine, buffer)
}

fn loc() -> SourceLocation {
    SourceLocation::file_loc(FileId(1), 5)
}

#[test]
fn dropping_the_builder_dispatches() {
    let (mut engine, buffer) = engine_with_buffer();
    assert!(buffer.is_empty());
    {
        let _builder = engine.report(loc(), DiagCode::ErrUndeclaredIdentifier).arg_identifier("foo");
        // Nothing is dispatched while the builder is alive.
        assert!(buffer.is_empty());
    }
    let diagnostics = buffer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "use of undeclared identifier 'foo'");
    assert_eq!(diagnostics[0].level, Level::Error);
}

#[test]
fn counters_and_sticky_error_flag() {
    let (mut engine, _buffer) = engine_with_buffer();
    assert!(!engine.error_occurred());
    engine.report(loc(), DiagCode::WarnImplicitConversion).arg_qualtype("double").arg_qualtype("int");
    assert!(!engine.error_occurred());
    assert_eq!(engine.num_diagnostics(), 1);
    assert_eq!(engine.num_errors(), 0);

    engine.report(loc(), DiagCode::ErrRedefinition).arg_identifier("x");
    assert!(engine.error_occurred());
    assert_eq!(engine.num_errors(), 1);
}

#[test]
fn warnings_can_be_mapped() {
    let (mut engine, buffer) = engine_with_buffer();
    engine.warnings_as_errors = true;
    engine.report(loc(), DiagCode::WarnReturnMissingValue);
    assert_eq!(buffer.diagnostics()[0].level, Level::Error);
    assert!(engine.error_occurred());

    let (mut engine, buffer) = engine_with_buffer();
    engine.ignore_all_warnings = true;
    engine.report(loc(), DiagCode::WarnReturnMissingValue);
    assert!(buffer.is_empty());
    assert_eq!(engine.num_diagnostics(), 0);
}

#[test]
fn message_splices_typed_arguments() {
    let (mut engine, buffer) = engine_with_buffer();
    engine
        .report(loc(), DiagCode::ErrArgCountMismatch)
        .arg_str("few")
        .arg_uint(2)
        .arg_uint(1);
    let message = buffer.diagnostics()[0].message();
    assert_eq!(message, "too few arguments to function call, expected 2, have 1");
}

#[test]
fn ranges_and_fixits_ride_along() {
    let (mut engine, buffer) = engine_with_buffer();
    let range = crate::basic::source_location::SourceRange::at(loc());
    engine
        .report(loc(), DiagCode::ErrExpectedToken)
        .arg_str(";")
        .range(range)
        .fixit(FixItHint::Insertion {
            loc: loc(),
            code: ";".to_owned(),
        });
    let diagnostic = &buffer.diagnostics()[0];
    assert_eq!(diagnostic.ranges.len(), 1);
    assert_eq!(diagnostic.fixits.len(), 1);
}

#[test]
fn notes_do_not_count_as_errors() {
    let (mut engine, _buffer) = engine_with_buffer();
    engine.report(loc(), DiagCode::NotePreviousDeclaration);
    assert!(!engine.error_occurred());
    assert_eq!(engine.num_diagnostics(), 1);
}
