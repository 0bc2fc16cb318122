//! Raw tokenization.
//!
//! The logos-derived [`RawTokenKind`] knows nothing about keywords: every
//! word lexes as an identifier, and identifier lookup decides keyword-ness
//! per dialect. [`Token`] is the preprocessed unit handed to the parser: a
//! kind, a location, a byte length, and the interned identifier for
//! identifier-like tokens.

use logos::Logos;

use crate::basic::ident::IdentId;
use crate::basic::source_location::SourceLocation;
use crate::basic::token_kinds::TokenKind;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub enum RawTokenKind {
    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // Preprocessor
    #[token("##")]
    HashHash,
    #[token("#")]
    Hash,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token(".")]
    Period,
    #[token("?")]
    Question,
    #[token("@")]
    At,

    // Operators (multi-char first)
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token("<<=")]
    LessLessEqual,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    ExclaimEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<<")]
    LessLess,
    #[token(">>")]
    GreaterGreater,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
    #[regex(r#"'([^'\\\n]|\\[\s\S])+'"#)]
    CharConstant,
    #[regex(r#"L?"([^"\\\n]|\\[\s\S])*""#)]
    StringLiteral,
    #[regex(r"0[xX][0-9A-Fa-f]+([uUlL]*)")]
    #[regex(r"[0-9]+([uUlL]*)")]
    NumericConstant,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    FloatingConstant,
}

impl RawTokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, RawTokenKind::Whitespace | RawTokenKind::LineComment | RawTokenKind::BlockComment)
    }
}

impl From<RawTokenKind> for TokenKind {
    fn from(raw: RawTokenKind) -> TokenKind {
        match raw {
            RawTokenKind::Whitespace | RawTokenKind::LineComment | RawTokenKind::BlockComment => TokenKind::Unknown,
            RawTokenKind::HashHash => TokenKind::HashHash,
            RawTokenKind::Hash => TokenKind::Hash,
            RawTokenKind::LParen => TokenKind::LParen,
            RawTokenKind::RParen => TokenKind::RParen,
            RawTokenKind::LBrace => TokenKind::LBrace,
            RawTokenKind::RBrace => TokenKind::RBrace,
            RawTokenKind::LBracket => TokenKind::LBracket,
            RawTokenKind::RBracket => TokenKind::RBracket,
            RawTokenKind::Semi => TokenKind::Semi,
            RawTokenKind::ColonColon => TokenKind::ColonColon,
            RawTokenKind::Colon => TokenKind::Colon,
            RawTokenKind::Comma => TokenKind::Comma,
            RawTokenKind::Ellipsis => TokenKind::Ellipsis,
            RawTokenKind::Arrow => TokenKind::Arrow,
            RawTokenKind::Period => TokenKind::Period,
            RawTokenKind::Question => TokenKind::Question,
            RawTokenKind::At => TokenKind::At,
            RawTokenKind::GreaterGreaterEqual => TokenKind::GreaterGreaterEqual,
            RawTokenKind::LessLessEqual => TokenKind::LessLessEqual,
            RawTokenKind::PlusPlus => TokenKind::PlusPlus,
            RawTokenKind::MinusMinus => TokenKind::MinusMinus,
            RawTokenKind::PlusEqual => TokenKind::PlusEqual,
            RawTokenKind::MinusEqual => TokenKind::MinusEqual,
            RawTokenKind::StarEqual => TokenKind::StarEqual,
            RawTokenKind::SlashEqual => TokenKind::SlashEqual,
            RawTokenKind::PercentEqual => TokenKind::PercentEqual,
            RawTokenKind::AmpEqual => TokenKind::AmpEqual,
            RawTokenKind::PipeEqual => TokenKind::PipeEqual,
            RawTokenKind::CaretEqual => TokenKind::CaretEqual,
            RawTokenKind::EqualEqual => TokenKind::EqualEqual,
            RawTokenKind::ExclaimEqual => TokenKind::ExclaimEqual,
            RawTokenKind::LessEqual => TokenKind::LessEqual,
            RawTokenKind::GreaterEqual => TokenKind::GreaterEqual,
            RawTokenKind::AmpAmp => TokenKind::AmpAmp,
            RawTokenKind::PipePipe => TokenKind::PipePipe,
            RawTokenKind::LessLess => TokenKind::LessLess,
            RawTokenKind::GreaterGreater => TokenKind::GreaterGreater,
            RawTokenKind::Plus => TokenKind::Plus,
            RawTokenKind::Minus => TokenKind::Minus,
            RawTokenKind::Star => TokenKind::Star,
            RawTokenKind::Slash => TokenKind::Slash,
            RawTokenKind::Percent => TokenKind::Percent,
            RawTokenKind::Caret => TokenKind::Caret,
            RawTokenKind::Amp => TokenKind::Amp,
            RawTokenKind::Pipe => TokenKind::Pipe,
            RawTokenKind::Tilde => TokenKind::Tilde,
            RawTokenKind::Exclaim => TokenKind::Exclaim,
            RawTokenKind::Equal => TokenKind::Equal,
            RawTokenKind::Less => TokenKind::Less,
            RawTokenKind::Greater => TokenKind::Greater,
            RawTokenKind::Identifier => TokenKind::Identifier,
            RawTokenKind::CharConstant => TokenKind::CharConstant,
            RawTokenKind::StringLiteral => TokenKind::StringLiteral,
            RawTokenKind::NumericConstant => TokenKind::NumericConstant,
            RawTokenKind::FloatingConstant => TokenKind::FloatingConstant,
        }
    }
}

/// One preprocessed token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: SourceLocation,
    /// Length in bytes in the physical buffer.
    pub len: u32,
    /// Interned identifier for identifier and keyword tokens.
    pub ident: Option<IdentId>,
    /// Token is the first on its physical line; directives hang off this.
    pub at_line_start: bool,
    /// Whitespace or a comment preceded this token.
    pub has_leading_space: bool,
}

impl Token {
    pub fn eof(loc: SourceLocation) -> Token {
        Token {
            kind: TokenKind::Eof,
            loc,
            len: 0,
            ident: None,
            at_line_start: true,
            has_leading_space: false,
        }
    }

    pub fn is(
        &self,
        kind: TokenKind,
    ) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
#[path = "../../tests/src/lex/token_tests.rs"]
mod tests;
