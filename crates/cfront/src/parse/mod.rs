mod decl;
mod expr;
mod objc;
mod stmt;

use std::path::Path;

use tracing::debug;

use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::source_location::{FileId, SourceLocation};
use crate::basic::source_manager::SourceError;
use crate::basic::token_kinds::TokenKind;
use crate::config::LangOptions;
use crate::decl::decl::DeclId;
use crate::decl::scope::ScopeFlags;
use crate::lex::preprocessor::Preprocessor;
use crate::lex::token::Token;
use crate::sema::Sema;

bitflags::bitflags! {
    /// Options for [`Parser::skip_until`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SkipFlags: u8 {
        /// Stop before a top-level `;` even when it is not in the set.
        const STOP_AT_SEMI = 1 << 0;
        /// Leave the matching token in the stream instead of eating it.
        const DONT_CONSUME = 1 << 1;
    }
}

/// The recursive-descent parser. Pulls tokens from the preprocessor,
/// drives scope entry/exit, and calls into [`Sema`] after each syntactic
/// unit; the typed nodes Sema returns are threaded into the tree.
pub struct Parser {
    pub pp: Preprocessor,
    pub sema: Sema,
    pub diags: DiagnosticsEngine,
}

impl Parser {
    pub fn new(
        options: LangOptions,
        diags: DiagnosticsEngine,
    ) -> Self {
        let sema = Sema::new(&options);
        Self {
            pp: Preprocessor::new(options),
            sema,
            diags,
        }
    }

    pub fn enter_main_file(
        &mut self,
        path: &Path,
    ) -> Result<FileId, SourceError> {
        self.pp.enter_main_file(path)
    }

    pub fn enter_main_buffer(
        &mut self,
        name: impl Into<String>,
        text: impl Into<Vec<u8>>,
    ) -> FileId {
        self.pp.enter_main_buffer(name, text)
    }

    /// Parse everything. Returns the translation unit declaration, whose
    /// members are the file-scope declarations in order.
    pub fn parse_translation_unit(&mut self) -> DeclId {
        self.sema.push_scope(ScopeFlags::DECL);
        loop {
            if self.at(TokenKind::Eof) {
                break;
            }
            self.parse_external_declaration();
        }
        self.sema.pop_scope();
        debug!(
            decls = self.sema.ctx.decls.len(),
            types = self.sema.ctx.types.num_types(),
            nodes = self.sema.ctx.ast.len(),
            "finished translation unit"
        );
        self.sema.translation_unit()
    }

    // ── token plumbing ──────────────────────────────────────────────────

    pub(crate) fn cur(&mut self) -> Token {
        self.pp.lookahead(&mut self.diags, 0)
    }

    pub(crate) fn cur_kind(&mut self) -> TokenKind {
        self.cur().kind
    }

    pub(crate) fn cur_loc(&mut self) -> SourceLocation {
        self.cur().loc
    }

    pub(crate) fn peek(
        &mut self,
        n: usize,
    ) -> Token {
        self.pp.lookahead(&mut self.diags, n)
    }

    pub(crate) fn at(
        &mut self,
        kind: TokenKind,
    ) -> bool {
        self.cur().kind == kind
    }

    pub(crate) fn consume(&mut self) -> Token {
        self.pp.next(&mut self.diags)
    }

    pub(crate) fn try_consume(
        &mut self,
        kind: TokenKind,
    ) -> Option<Token> {
        if self.at(kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or report what was expected.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
    ) -> Option<Token> {
        if self.at(kind) {
            return Some(self.consume());
        }
        let loc = self.cur_loc();
        self.diags.report(loc, DiagCode::ErrExpectedToken).arg_str(kind.spelling());
        None
    }

    pub(crate) fn spelling(
        &self,
        token: &Token,
    ) -> String {
        self.pp.spelling(token)
    }

    // ── error recovery ──────────────────────────────────────────────────

    /// Consume tokens until one of `kinds` is found, respecting nested
    /// parens, brackets, and braces opened along the way. Never unwinds:
    /// this is the parser's only recovery mechanism.
    pub(crate) fn skip_until(
        &mut self,
        kinds: &[TokenKind],
        flags: SkipFlags,
    ) -> bool {
        loop {
            let kind = self.cur_kind();

            if kind == TokenKind::Eof {
                return false;
            }

            if kinds.contains(&kind) {
                if !flags.contains(SkipFlags::DONT_CONSUME) {
                    self.consume();
                }
                return true;
            }

            match kind {
                TokenKind::LParen => {
                    self.consume();
                    self.skip_until(&[TokenKind::RParen], SkipFlags::empty());
                },
                TokenKind::LBracket => {
                    self.consume();
                    self.skip_until(&[TokenKind::RBracket], SkipFlags::empty());
                },
                TokenKind::LBrace => {
                    self.consume();
                    self.skip_until(&[TokenKind::RBrace], SkipFlags::empty());
                },
                // An unmatched closer probably belongs to our caller.
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    return false;
                },
                TokenKind::Semi if flags.contains(SkipFlags::STOP_AT_SEMI) => {
                    return false;
                },
                _ => {
                    self.consume();
                },
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/parse/parser_tests.rs"]
mod tests;
