pub mod ast;
pub mod basic;
pub mod config;
pub mod decl;
pub mod lex;
pub mod parse;
pub mod sema;
pub mod types;

pub use ast::{AstArena, AstContext, StmtClass, StmtVisitor};
pub use basic::diagnostic::{DiagnosticsEngine, Level, SharedDiagnosticBuffer};
pub use basic::ident::{IdentId, IdentifierTable};
pub use basic::source_location::{FileId, SourceLocation, SourceRange};
pub use basic::source_manager::SourceManager;
pub use config::{LangDialect, LangOptions};
pub use decl::{DeclId, DeclTable};
pub use lex::Preprocessor;
pub use parse::Parser;
pub use sema::Sema;
pub use types::{QualType, TypeContext};
