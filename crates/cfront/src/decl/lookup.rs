//! Name lookup.
//!
//! The identifier resolver keeps, per name, the stack of currently-visible
//! declarations across all active scopes; the innermost is consulted first.
//! Scope exit pops exactly the declarations that scope introduced.

use std::collections::HashMap;

use crate::decl::decl::{DeclId, DeclName, IdentifierNamespace};
use crate::decl::table::DeclTable;

/// What kind of lookup a reference site performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Plain identifier use.
    Ordinary,
    /// `struct S` / `union U` / `enum E` tag references.
    Tag,
    /// Member access within a record context.
    Member,
    /// `A::B` qualified lookup, restarted in the named context.
    Qualified,
}

impl LookupKind {
    fn namespaces(self) -> IdentifierNamespace {
        match self {
            LookupKind::Ordinary => IdentifierNamespace::ORDINARY,
            LookupKind::Tag => IdentifierNamespace::TAG,
            LookupKind::Member => IdentifierNamespace::MEMBER,
            LookupKind::Qualified => {
                IdentifierNamespace::ORDINARY | IdentifierNamespace::TAG | IdentifierNamespace::MEMBER
            },
        }
    }
}

/// Per-name visibility chains.
#[derive(Default)]
pub struct IdentResolver {
    chains: HashMap<DeclName, Vec<DeclId>>,
}

impl IdentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a declaration visible under its name. The most recent push
    /// shadows earlier ones.
    pub fn push_decl(
        &mut self,
        name: DeclName,
        decl: DeclId,
    ) {
        self.chains.entry(name).or_default().push(decl);
    }

    /// Remove a declaration from its chain on scope exit. Declarations are
    /// removed in reverse introduction order, so this pops from the end.
    pub fn pop_decl(
        &mut self,
        name: DeclName,
        decl: DeclId,
    ) {
        let chain = self.chains.get_mut(&name).expect("popping a name that was never pushed");
        let popped = chain.pop();
        debug_assert_eq!(popped, Some(decl), "scope exit must unshadow in reverse order");
        if chain.is_empty() {
            self.chains.remove(&name);
        }
    }

    /// Walk the chain for `name` innermost-first, returning the first
    /// declaration in an acceptable namespace.
    pub fn lookup(
        &self,
        name: DeclName,
        kind: LookupKind,
        decls: &DeclTable,
    ) -> Option<DeclId> {
        let namespaces = kind.namespaces();
        self.chains
            .get(&name)?
            .iter()
            .rev()
            .copied()
            .find(|&d| decls.decl(d).namespaces().intersects(namespaces))
    }

    /// Every visible declaration for `name` in an acceptable namespace,
    /// innermost first. Used to build C++ candidate sets.
    pub fn lookup_all(
        &self,
        name: DeclName,
        kind: LookupKind,
        decls: &DeclTable,
    ) -> Vec<DeclId> {
        let namespaces = kind.namespaces();
        match self.chains.get(&name) {
            Some(chain) => {
                chain.iter().rev().copied().filter(|&d| decls.decl(d).namespaces().intersects(namespaces)).collect()
            },
            None => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Qualified lookup: resolve `qualifier::name` by restarting lookup in the
/// named context.
pub fn lookup_qualified(
    decls: &DeclTable,
    context: DeclId,
    name: DeclName,
) -> Option<DeclId> {
    decls.lookup_in_context(context, name, LookupKind::Qualified.namespaces())
}

#[cfg(test)]
#[path = "../../tests/src/decl/lookup_tests.rs"]
mod tests;
