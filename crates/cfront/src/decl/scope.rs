//! Parser scopes.
//!
//! A scope is one stack frame with a kind bitmap; the innermost scope owns
//! the set of declarations introduced in it, so popping a scope can
//! unshadow exactly those names.

use bitflags::bitflags;

use crate::decl::decl::{DeclId, DeclName};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScopeFlags: u16 {
        /// Declarations may be introduced here.
        const DECL               = 1 << 0;
        /// The outermost scope of a function body.
        const FN                 = 1 << 1;
        /// A function prototype's parameter scope.
        const FUNCTION_PROTOTYPE = 1 << 2;
        /// A `{}` block.
        const BLOCK              = 1 << 3;
        /// The condition scope of if/while/for/switch.
        const CONTROL            = 1 << 4;
        /// A class/struct/union body.
        const CLASS              = 1 << 5;
        /// `break` binds here.
        const BREAK              = 1 << 6;
        /// `continue` binds here.
        const CONTINUE           = 1 << 7;
        /// A catch block.
        const CATCH              = 1 << 8;
        /// A template parameter list.
        const TEMPLATE_PARAM     = 1 << 9;
    }
}

#[derive(Debug)]
pub struct Scope {
    pub flags: ScopeFlags,
    /// Names introduced in this scope, in order, for unshadowing on exit.
    pub(crate) decls: Vec<(DeclName, DeclId)>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Self {
            flags,
            decls: Vec::new(),
        }
    }

    pub fn decls(&self) -> &[(DeclName, DeclId)] {
        &self.decls
    }
}

/// The stack of active scopes. Empty outside of a translation unit; the
/// file-level scope is pushed when parsing starts and popped when it ends.
#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        flags: ScopeFlags,
    ) {
        self.scopes.push(Scope::new(flags));
    }

    /// Pop the innermost scope, returning it so the caller can unshadow its
    /// declarations.
    pub fn pop(&mut self) -> Scope {
        self.scopes.pop().expect("scope stack underflow")
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn innermost(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    /// Record a declaration in the innermost DECL scope.
    pub fn add_decl(
        &mut self,
        name: DeclName,
        decl: DeclId,
    ) {
        let scope = self
            .scopes
            .iter_mut()
            .rev()
            .find(|scope| scope.flags.contains(ScopeFlags::DECL))
            .expect("no declaration scope active");
        scope.decls.push((name, decl));
    }

    /// Whether a `break` is legal here.
    pub fn in_break_scope(&self) -> bool {
        self.scopes.iter().any(|scope| scope.flags.contains(ScopeFlags::BREAK))
    }

    /// Whether a `continue` is legal here.
    pub fn in_continue_scope(&self) -> bool {
        self.scopes.iter().any(|scope| scope.flags.contains(ScopeFlags::CONTINUE))
    }

    pub fn in_function_scope(&self) -> bool {
        self.scopes.iter().any(|scope| scope.flags.contains(ScopeFlags::FN))
    }

    pub fn in_class_scope(&self) -> bool {
        self.scopes.iter().rev().any(|scope| scope.flags.contains(ScopeFlags::CLASS))
    }
}

#[cfg(test)]
#[path = "../../tests/src/decl/scope_tests.rs"]
mod tests;
