//! The full token vocabulary shared by the lexer, preprocessor, and parser.

/// Kind of a preprocessed token. Keyword kinds are assigned by identifier
/// lookup, not by the raw lexer, so keyword-ness can depend on the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Unknown,

    Identifier,
    NumericConstant,
    FloatingConstant,
    CharConstant,
    StringLiteral,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Colon,
    ColonColon,
    Comma,
    Period,
    Ellipsis,
    Arrow,
    Question,
    At,
    Hash,
    HashHash,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    AmpEqual,
    PipeEqual,
    EqualEqual,
    ExclaimEqual,
    LessEqual,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    LessLess,
    GreaterGreater,
    LessLessEqual,
    GreaterGreaterEqual,

    // Keywords: C89
    KwAuto,
    KwBreak,
    KwCase,
    KwChar,
    KwConst,
    KwContinue,
    KwDefault,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExtern,
    KwFloat,
    KwFor,
    KwGoto,
    KwIf,
    KwInt,
    KwLong,
    KwRegister,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStruct,
    KwSwitch,
    KwTypedef,
    KwUnion,
    KwUnsigned,
    KwVoid,
    KwVolatile,
    KwWhile,

    // Keywords: C99
    KwInline,
    KwRestrict,
    KwBool,
    KwComplex,
    KwImaginary,

    // Keywords: C++
    KwClass,
    KwNamespace,
    KwTemplate,
    KwTypename,
    KwUsing,
    KwPublic,
    KwProtected,
    KwPrivate,
    KwVirtual,
    KwFriend,
    KwThis,
    KwNew,
    KwDelete,
    KwOperator,
    KwTrue,
    KwFalse,
    KwWchar,

    // Keywords: GNU extensions
    KwTypeof,
    KwExtension,
    KwAlignof,
    KwReal,
    KwImag,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwAuto
                | TokenKind::KwBreak
                | TokenKind::KwCase
                | TokenKind::KwChar
                | TokenKind::KwConst
                | TokenKind::KwContinue
                | TokenKind::KwDefault
                | TokenKind::KwDo
                | TokenKind::KwDouble
                | TokenKind::KwElse
                | TokenKind::KwEnum
                | TokenKind::KwExtern
                | TokenKind::KwFloat
                | TokenKind::KwFor
                | TokenKind::KwGoto
                | TokenKind::KwIf
                | TokenKind::KwInt
                | TokenKind::KwLong
                | TokenKind::KwRegister
                | TokenKind::KwReturn
                | TokenKind::KwShort
                | TokenKind::KwSigned
                | TokenKind::KwSizeof
                | TokenKind::KwStatic
                | TokenKind::KwStruct
                | TokenKind::KwSwitch
                | TokenKind::KwTypedef
                | TokenKind::KwUnion
                | TokenKind::KwUnsigned
                | TokenKind::KwVoid
                | TokenKind::KwVolatile
                | TokenKind::KwWhile
                | TokenKind::KwInline
                | TokenKind::KwRestrict
                | TokenKind::KwBool
                | TokenKind::KwComplex
                | TokenKind::KwImaginary
                | TokenKind::KwClass
                | TokenKind::KwNamespace
                | TokenKind::KwTemplate
                | TokenKind::KwTypename
                | TokenKind::KwUsing
                | TokenKind::KwPublic
                | TokenKind::KwProtected
                | TokenKind::KwPrivate
                | TokenKind::KwVirtual
                | TokenKind::KwFriend
                | TokenKind::KwThis
                | TokenKind::KwNew
                | TokenKind::KwDelete
                | TokenKind::KwOperator
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwWchar
                | TokenKind::KwTypeof
                | TokenKind::KwExtension
                | TokenKind::KwAlignof
                | TokenKind::KwReal
                | TokenKind::KwImag
        )
    }

    /// Spelling used in "expected 'x'" diagnostics for punctuation.
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Arrow => "->",
            TokenKind::Question => "?",
            TokenKind::At => "@",
            TokenKind::Equal => "=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            _ => "?",
        }
    }
}

/// The directives the preprocessor recognizes after a line-initial `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpDirective {
    Define,
    Undef,
    Include,
    If,
    Ifdef,
    Ifndef,
    Else,
    Endif,
    Line,
    Pragma,
}

impl PpDirective {
    pub fn from_spelling(spelling: &str) -> Option<PpDirective> {
        Some(match spelling {
            "define" => PpDirective::Define,
            "undef" => PpDirective::Undef,
            "include" => PpDirective::Include,
            "if" => PpDirective::If,
            "ifdef" => PpDirective::Ifdef,
            "ifndef" => PpDirective::Ifndef,
            "else" => PpDirective::Else,
            "endif" => PpDirective::Endif,
            "line" => PpDirective::Line,
            "pragma" => PpDirective::Pragma,
            _ => return None,
        })
    }
}
