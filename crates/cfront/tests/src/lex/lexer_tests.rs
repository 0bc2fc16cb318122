use super::*;

use crate::basic::ident::IdentifierTable;
use crate::basic::source_manager::SourceManager;
use crate::config::{LangDialect, LangOptions};

fn lex(
    input: &str,
    options: &LangOptions,
) -> (Vec<Token>, IdentifierTable, SourceManager) {
    let mut sm = SourceManager::new();
    let file_id = sm.create_file_id_for_buffer("input.c", input.as_bytes().to_vec());
    let mut idents = IdentifierTable::new(options);
    let tokens = lex_buffer(&sm, file_id, &mut idents);
    (tokens, idents, sm)
}

#[test]
fn tokens_carry_location_and_length() {
    let (tokens, _, sm) = lex("int  x;", &LangOptions::default());
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::KwInt);
    assert_eq!(tokens[0].len, 3);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(sm.column_number(tokens[1].loc), 6);
    assert_eq!(tokens[2].kind, TokenKind::Semi);
}

#[test]
fn line_start_and_leading_space_flags() {
    let (tokens, _, _) = lex("a b\nc", &LangOptions::default());
    assert!(tokens[0].at_line_start);
    assert!(!tokens[0].has_leading_space);
    assert!(!tokens[1].at_line_start);
    assert!(tokens[1].has_leading_space);
    assert!(tokens[2].at_line_start);
}

#[test]
fn keywords_resolve_through_the_identifier_table() {
    let (tokens, idents, _) = lex("class", &LangOptions::for_dialect(LangDialect::C99));
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    let ident = tokens[0].ident.expect("identifier is interned");
    assert_eq!(idents.spelling(ident), "class");

    let (tokens, _, _) = lex("class", &LangOptions::for_dialect(LangDialect::Cxx));
    assert_eq!(tokens[0].kind, TokenKind::KwClass);
    assert!(tokens[0].ident.is_some(), "keywords keep their identifier info");
}

#[test]
fn comments_split_tokens_but_leave_a_space_flag() {
    let (tokens, _, _) = lex("a/*x*/b", &LangOptions::default());
    assert_eq!(tokens.len(), 2);
    assert!(tokens[1].has_leading_space);
}

#[test]
fn function_like_macro_adjacency_is_visible() {
    // `M(` glued versus `M (` spaced: the flag distinguishes them.
    let (tokens, _, _) = lex("M(x) M (x)", &LangOptions::default());
    assert_eq!(tokens[1].kind, TokenKind::LParen);
    assert!(!tokens[1].has_leading_space);
    let second_paren = tokens.iter().rposition(|t| t.kind == TokenKind::LParen).unwrap();
    assert!(tokens[second_paren].has_leading_space);
}
