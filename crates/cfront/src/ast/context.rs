//! The translation unit's owning context.
//!
//! One [`AstContext`] owns every type, declaration, and statement node of a
//! translation unit; subsystems borrow it and never transfer ownership.
//! Everything is torn down together when the context is dropped.

use crate::ast::stmt::AstArena;
use crate::basic::selector::SelectorTable;
use crate::decl::table::DeclTable;
use crate::types::context::TypeContext;

pub struct AstContext {
    pub types: TypeContext,
    pub decls: DeclTable,
    pub ast: AstArena,
    pub selectors: SelectorTable,
}

impl AstContext {
    pub fn new() -> Self {
        Self {
            types: TypeContext::new(),
            decls: DeclTable::new(),
            ast: AstArena::new(),
            selectors: SelectorTable::new(),
        }
    }
}

impl Default for AstContext {
    fn default() -> Self {
        Self::new()
    }
}
