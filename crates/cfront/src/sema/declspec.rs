//! Parsed declaration specifiers and declarators.
//!
//! The parser accumulates specifier tokens into a [`DeclSpec`] and
//! declarator structure into a [`Declarator`]; semantic analysis then turns
//! the pair into a type and a declaration.

use crate::ast::stmt::ExprId;
use crate::basic::ident::IdentId;
use crate::basic::source_location::SourceLocation;
use crate::decl::decl::StorageClass;
use crate::types::ty::{QualType, Qualifiers};

/// Which base-type keywords were written, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSpecKind {
    /// Nothing written: implicit int in C89, an error elsewhere.
    #[default]
    Unspecified,
    Void,
    Char,
    Int,
    Float,
    Double,
    Bool,
    WChar,
    /// A typedef name, tag, typeof, or template parameter already resolved
    /// to a type by the parser.
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSpecSign {
    #[default]
    Unspecified,
    Signed,
    Unsigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSpecWidth {
    #[default]
    Unspecified,
    Short,
    Long,
    LongLong,
}

/// Accumulated declaration specifiers.
#[derive(Debug, Clone, Default)]
pub struct DeclSpec {
    pub kind: TypeSpecKind,
    pub sign: TypeSpecSign,
    pub width: TypeSpecWidth,
    pub quals: Qualifiers,
    pub storage: StorageClass,
    pub is_typedef: bool,
    pub is_inline: bool,
    pub is_complex: bool,
    /// Filled when `kind` is `Resolved`.
    pub resolved: Option<QualType>,
    pub loc: SourceLocation,
}

/// One level of declarator structure, innermost first after parsing.
#[derive(Debug, Clone)]
pub enum DeclaratorChunk {
    Pointer {
        quals: Qualifiers,
    },
    Reference {
        is_lvalue: bool,
    },
    Array {
        size: Option<ExprId>,
        is_static: bool,
        is_star: bool,
        quals: Qualifiers,
    },
    Function {
        params: Vec<ParamInfo>,
        variadic: bool,
        /// True for `()` with no prototype information (C).
        is_empty: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: Option<IdentId>,
    pub loc: SourceLocation,
    pub ty: QualType,
}

/// A parsed declarator: the declared name plus the chunks wrapped around
/// it, ordered from the name outward.
#[derive(Debug, Clone, Default)]
pub struct Declarator {
    pub name: Option<IdentId>,
    pub name_loc: SourceLocation,
    pub chunks: Vec<DeclaratorChunk>,
}

impl Declarator {
    /// Whether the outermost chunk makes this a function declarator.
    pub fn is_function(&self) -> bool {
        matches!(self.chunks.first(), Some(DeclaratorChunk::Function { .. }))
    }

    /// The parameters of the outermost function chunk, if any.
    pub fn function_params(&self) -> Option<&[ParamInfo]> {
        match self.chunks.first() {
            Some(DeclaratorChunk::Function {
                params, ..
            }) => Some(params),
            _ => None,
        }
    }
}
