//! Buffer lexing.
//!
//! Lexes one ingested buffer into a vector of located tokens in a single
//! pass. Trivia is dropped, but its effect survives as the
//! `at_line_start` / `has_leading_space` flags the preprocessor needs for
//! directive recognition and macro invocation adjacency.

use logos::Logos;

use crate::basic::ident::IdentifierTable;
use crate::basic::source_location::FileId;
use crate::basic::source_manager::SourceManager;
use crate::basic::token_kinds::TokenKind;
use crate::lex::token::{RawTokenKind, Token};

/// Lex the whole buffer behind `file_id`. Identifiers are interned as they
/// are seen; their token kind comes from the identifier table so keywords
/// track the dialect.
pub fn lex_buffer(
    sm: &SourceManager,
    file_id: FileId,
    idents: &mut IdentifierTable,
) -> Vec<Token> {
    let text = String::from_utf8_lossy(sm.buffer_data(file_id)).into_owned();
    let mut lexer = RawTokenKind::lexer(&text);
    let mut tokens = Vec::new();

    let mut at_line_start = true;
    let mut has_leading_space = false;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                // Invalid byte: surface it as an Unknown token so the
                // parser can diagnose at a real location.
                tokens.push(Token {
                    kind: TokenKind::Unknown,
                    loc: sm.location_for_offset(file_id, span.start as u32),
                    len: (span.end - span.start) as u32,
                    ident: None,
                    at_line_start,
                    has_leading_space,
                });
                at_line_start = false;
                has_leading_space = false;
                continue;
            },
        };

        if raw.is_trivia() {
            if lexer.slice().contains('\n') {
                at_line_start = true;
            }
            has_leading_space = true;
            continue;
        }

        let ident = match raw {
            RawTokenKind::Identifier => Some(idents.get(lexer.slice())),
            _ => None,
        };
        let kind = match ident {
            Some(id) => idents.info(id).token_kind(),
            None => raw.into(),
        };

        tokens.push(Token {
            kind,
            loc: sm.location_for_offset(file_id, span.start as u32),
            len: (span.end - span.start) as u32,
            ident,
            at_line_start,
            has_leading_space,
        });
        at_line_start = false;
        has_leading_space = false;
    }

    tokens
}

#[cfg(test)]
#[path = "../../tests/src/lex/lexer_tests.rs"]
mod tests;
