use super::*;

use crate::basic::ident::IdentifierTable;
use crate::config::LangOptions;

#[test]
fn push_pop_discipline() {
    let mut stack = ScopeStack::new();
    assert!(stack.is_empty());
    stack.push(ScopeFlags::DECL);
    stack.push(ScopeFlags::BLOCK | ScopeFlags::DECL);
    assert_eq!(stack.depth(), 2);
    let inner = stack.pop();
    assert!(inner.flags.contains(ScopeFlags::BLOCK));
    stack.pop();
    assert!(stack.is_empty());
}

#[test]
fn decls_land_in_the_innermost_decl_scope() {
    let mut idents = IdentifierTable::new(&LangOptions::default());
    let name = DeclName::Ident(idents.get("x"));
    let mut stack = ScopeStack::new();
    stack.push(ScopeFlags::DECL);
    // A control scope without DECL does not capture declarations.
    stack.push(ScopeFlags::DECL | ScopeFlags::CONTROL);
    stack.add_decl(name, DeclId(7));
    let inner = stack.pop();
    assert_eq!(inner.decls(), &[(name, DeclId(7))]);
    let outer = stack.pop();
    assert!(outer.decls().is_empty());
}

#[test]
fn break_and_continue_track_enclosing_scopes() {
    let mut stack = ScopeStack::new();
    stack.push(ScopeFlags::FN | ScopeFlags::DECL);
    assert!(!stack.in_break_scope());
    assert!(!stack.in_continue_scope());
    assert!(stack.in_function_scope());

    stack.push(ScopeFlags::BREAK | ScopeFlags::CONTINUE | ScopeFlags::DECL);
    assert!(stack.in_break_scope());
    assert!(stack.in_continue_scope());

    // A switch body allows break but not continue.
    stack.push(ScopeFlags::BREAK | ScopeFlags::DECL);
    assert!(stack.in_break_scope());
    assert!(stack.in_continue_scope(), "the outer loop still allows continue");

    stack.pop();
    stack.pop();
    assert!(!stack.in_break_scope());
    stack.pop();
}
