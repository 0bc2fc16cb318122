use super::*;

use crate::basic::ident::IdentifierTable;
use crate::basic::source_location::SourceLocation;
use crate::config::LangOptions;
use crate::decl::decl::{DeclKind, StorageClass, TagKind};
use crate::types::ty::{QualType, TypeId};

struct Fixture {
    decls: DeclTable,
    idents: IdentifierTable,
    resolver: IdentResolver,
}

impl Fixture {
    fn new() -> Self {
        Self {
            decls: DeclTable::new(),
            idents: IdentifierTable::new(&LangOptions::default()),
            resolver: IdentResolver::new(),
        }
    }

    fn var(
        &mut self,
        name: DeclName,
    ) -> DeclId {
        let tu = self.decls.translation_unit();
        self.decls.create(
            DeclKind::Var {
                ty: QualType::unqual(TypeId(0)),
                storage: StorageClass::None,
                init: None,
            },
            Some(name),
            SourceLocation::invalid(),
            Some(tu),
            Some(tu),
        )
    }

    fn tag(
        &mut self,
        name: DeclName,
    ) -> DeclId {
        let tu = self.decls.translation_unit();
        self.decls.create(
            DeclKind::Record {
                tag_kind: TagKind::Struct,
                is_definition: false,
                fields: Vec::new(),
                ty: None,
            },
            Some(name),
            SourceLocation::invalid(),
            Some(tu),
            Some(tu),
        )
    }
}

#[test]
fn innermost_declaration_wins() {
    let mut f = Fixture::new();
    let name = DeclName::Ident(f.idents.get("x"));
    let outer = f.var(name);
    let inner = f.var(name);

    f.resolver.push_decl(name, outer);
    f.resolver.push_decl(name, inner);
    assert_eq!(f.resolver.lookup(name, LookupKind::Ordinary, &f.decls), Some(inner));

    f.resolver.pop_decl(name, inner);
    assert_eq!(f.resolver.lookup(name, LookupKind::Ordinary, &f.decls), Some(outer));

    f.resolver.pop_decl(name, outer);
    assert_eq!(f.resolver.lookup(name, LookupKind::Ordinary, &f.decls), None);
    assert!(f.resolver.is_empty());
}

#[test]
fn tag_and_ordinary_lookup_are_separate() {
    let mut f = Fixture::new();
    let name = DeclName::Ident(f.idents.get("s"));
    let tag = f.tag(name);
    let var = f.var(name);

    f.resolver.push_decl(name, tag);
    f.resolver.push_decl(name, var);

    assert_eq!(f.resolver.lookup(name, LookupKind::Ordinary, &f.decls), Some(var));
    assert_eq!(f.resolver.lookup(name, LookupKind::Tag, &f.decls), Some(tag));
}

#[test]
fn lookup_all_returns_innermost_first() {
    let mut f = Fixture::new();
    let name = DeclName::Ident(f.idents.get("f"));
    let a = f.var(name);
    let b = f.var(name);
    f.resolver.push_decl(name, a);
    f.resolver.push_decl(name, b);
    assert_eq!(f.resolver.lookup_all(name, LookupKind::Ordinary, &f.decls), vec![b, a]);
}

#[test]
fn qualified_lookup_restarts_in_the_named_context() {
    let mut f = Fixture::new();
    let member_name = DeclName::Ident(f.idents.get("m"));
    let tu = f.decls.translation_unit();
    let namespace =
        f.decls.create(DeclKind::Namespace, None, SourceLocation::invalid(), Some(tu), Some(tu));
    let member = f.decls.create(
        DeclKind::Var {
            ty: QualType::unqual(TypeId(0)),
            storage: StorageClass::None,
            init: None,
        },
        Some(member_name),
        SourceLocation::invalid(),
        Some(namespace),
        Some(namespace),
    );

    assert_eq!(lookup_qualified(&f.decls, namespace, member_name), Some(member));
    assert_eq!(lookup_qualified(&f.decls, tu, member_name), None);
}
