use super::*;

use crate::basic::ident::IdentifierTable;
use crate::basic::selector::SelectorTable;
use crate::config::LangOptions;
use crate::types::ty::{QualType, TemplateArg, TypeId};

fn int_qt() -> QualType {
    QualType::unqual(TypeId(0))
}

fn var_decl(
    table: &mut DeclTable,
    name: Option<DeclName>,
    init: Option<crate::ast::stmt::ExprId>,
) -> DeclId {
    let tu = table.translation_unit();
    table.create(
        DeclKind::Var {
            ty: int_qt(),
            storage: Default::default(),
            init,
        },
        name,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    )
}

#[test]
fn lone_declarations_are_their_own_chain() {
    let mut table = DeclTable::new();
    let decl = var_decl(&mut table, None, None);
    assert_eq!(table.canonical_decl(decl), decl);
    assert_eq!(table.redeclarations(decl), vec![decl]);
    assert_eq!(table.latest_decl(decl), decl);
    assert_eq!(table.definition(decl), None);
}

#[test]
fn chains_share_one_canonical_element() {
    let mut table = DeclTable::new();
    let first = var_decl(&mut table, None, None);
    let second = var_decl(&mut table, None, None);
    let third = var_decl(&mut table, None, Some(crate::ast::stmt::ExprId(0)));

    table.link_redeclaration(first, second);
    // Linking through any chain member lands on the same canonical.
    table.link_redeclaration(second, third);

    for decl in [first, second, third] {
        assert_eq!(table.canonical_decl(decl), first);
        assert_eq!(table.redeclarations(decl), vec![first, second, third]);
        assert_eq!(table.latest_decl(decl), third);
    }
    // Exactly one definition: the initialized one.
    assert_eq!(table.definition(first), Some(third));
}

#[test]
fn context_lookup_filters_by_namespace() {
    let mut table = DeclTable::new();
    let mut idents = IdentifierTable::new(&LangOptions::default());
    let name = DeclName::Ident(idents.get("s"));
    let tu = table.translation_unit();

    // A tag and a variable may share a name in different namespaces.
    let tag = table.create(
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
    );
    let var = var_decl(&mut table, Some(name), None);

    assert_eq!(table.lookup_in_context(tu, name, IdentifierNamespace::TAG), Some(tag));
    assert_eq!(table.lookup_in_context(tu, name, IdentifierNamespace::ORDINARY), Some(var));
    assert_eq!(
        table.lookup_all_in_context(tu, name, IdentifierNamespace::ORDINARY | IdentifierNamespace::TAG),
        vec![tag, var]
    );
}

#[test]
fn tag_queries_walk_the_chain() {
    let mut table = DeclTable::new();
    let tu = table.translation_unit();
    let make = |table: &mut DeclTable, defined: bool| {
        table.create(
            DeclKind::Record {
                tag_kind: TagKind::Struct,
                is_definition: defined,
                fields: Vec::new(),
                ty: None,
            },
            None,
            SourceLocation::invalid(),
            Some(tu),
            Some(tu),
        )
    };
    let forward = make(&mut table, false);
    assert!(!table.tag_is_defined(forward));

    let definition = make(&mut table, true);
    table.link_redeclaration(forward, definition);
    assert!(table.tag_is_defined(forward));
    assert_eq!(table.definition(forward), Some(definition));

    table.set_tag_type(definition, TypeId(9));
    // The type handle is stored on the canonical declaration.
    assert_eq!(table.tag_type(forward), Some(TypeId(9)));
    assert_eq!(table.tag_type(definition), Some(TypeId(9)));
}

#[test]
fn objc_method_table_is_keyed_on_selector_and_flavor() {
    let mut table = DeclTable::new();
    let mut idents = IdentifierTable::new(&LangOptions::default());
    let mut selectors = SelectorTable::new();
    let copy = selectors.get_nullary(idents.get("copy"));
    let tu = table.translation_unit();

    let method = table.create(
        DeclKind::ObjCMethod {
            selector: copy,
            is_instance: true,
            result_ty: int_qt(),
            params: Vec::new(),
            body: None,
        },
        Some(DeclName::Selector(copy)),
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    table.add_objc_method(copy, true, method);

    assert_eq!(table.lookup_objc_method(copy, true), &[method]);
    assert!(table.lookup_objc_method(copy, false).is_empty());
}

#[test]
fn template_specializations_are_keyed_by_argument_list() {
    let mut table = DeclTable::new();
    let template = var_decl(&mut table, None, None);
    let spec_int = var_decl(&mut table, None, None);

    let int_args = vec![TemplateArg::Type(int_qt())];
    assert_eq!(table.template_specialization(template, &int_args), None);
    table.add_template_specialization(template, int_args.clone(), spec_int);
    assert_eq!(table.template_specialization(template, &int_args), Some(spec_int));

    let other_args = vec![TemplateArg::Type(int_qt().with_const())];
    assert_eq!(table.template_specialization(template, &other_args), None);
    assert_eq!(table.template_specializations_of(template), vec![spec_int]);
}
