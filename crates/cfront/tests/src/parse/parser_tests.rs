use super::*;

use crate::basic::diagnostic::SharedDiagnosticBuffer;
use crate::config::LangOptions;

fn parser_for(source: &str) -> (Parser, SharedDiagnosticBuffer) {
    let buffer = SharedDiagnosticBuffer::new();
    let diags = DiagnosticsEngine::new(Box::new(buffer.clone()));
    let mut parser = Parser::new(LangOptions::default(), diags);
    parser.enter_main_buffer("input.c", source);
    (parser, buffer)
}

#[test]
fn skip_until_respects_nesting() {
    let (mut parser, _) = parser_for("( a ; b ) ; x");
    // The `;` inside the parens does not stop a semicolon skip.
    assert!(parser.skip_until(&[TokenKind::Semi], SkipFlags::empty()));
    let token = parser.cur();
    assert_eq!(parser.spelling(&token), "x");
}

#[test]
fn skip_until_can_leave_the_target() {
    let (mut parser, _) = parser_for("a b ; x");
    assert!(parser.skip_until(&[TokenKind::Semi], SkipFlags::DONT_CONSUME));
    assert!(parser.at(TokenKind::Semi));
}

#[test]
fn skip_until_stops_at_unmatched_closers() {
    let (mut parser, _) = parser_for("a b } c");
    assert!(!parser.skip_until(&[TokenKind::Semi], SkipFlags::empty()));
    assert!(parser.at(TokenKind::RBrace), "the closer is left for the caller");
}

#[test]
fn stop_at_semi_flag() {
    let (mut parser, _) = parser_for("a b ; c");
    assert!(!parser.skip_until(&[TokenKind::RParen], SkipFlags::STOP_AT_SEMI));
    assert!(parser.at(TokenKind::Semi));
}

#[test]
fn expect_reports_what_was_missing() {
    let (mut parser, buffer) = parser_for("x");
    assert!(parser.expect(TokenKind::Semi).is_none());
    assert!(buffer.diagnostics().iter().any(|d| d.message() == "expected ';'"));
}

#[test]
fn eof_parses_to_an_empty_translation_unit() {
    let (mut parser, buffer) = parser_for("");
    let tu = parser.parse_translation_unit();
    assert!(parser.sema.ctx.decls.context_decls(tu).is_empty());
    assert!(buffer.is_empty());
    assert!(parser.sema.scopes.is_empty());
}
