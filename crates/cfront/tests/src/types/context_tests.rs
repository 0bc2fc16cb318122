use super::*;

use crate::basic::source_location::SourceLocation;
use crate::decl::decl::{DeclKind, DeclName, TagKind};
use crate::decl::table::DeclTable;

fn typedef_decl(
    decls: &mut DeclTable,
    underlying: QualType,
) -> DeclId {
    let tu = decls.translation_unit();
    decls.create(
        DeclKind::Typedef {
            underlying,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    )
}

#[test]
fn pointer_types_are_uniqued() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let a = ctx.get_pointer(int_ty);
    let b = ctx.get_pointer(int_ty);
    assert_eq!(a, b);

    let const_int = int_ty.with_const();
    let c = ctx.get_pointer(const_int);
    assert_ne!(a, c, "pointee qualifiers are part of the key");
}

#[test]
fn qualifier_only_differences_do_not_allocate() {
    let mut ctx = TypeContext::new();
    let before = ctx.num_types();
    let int_ty = ctx.builtins.int_ty;
    let _const_int = int_ty.with_const();
    let _volatile_int = int_ty.with_quals(Qualifiers::VOLATILE);
    assert_eq!(ctx.num_types(), before);
}

#[test]
fn canonical_is_idempotent() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let int_ty = ctx.builtins.int_ty;

    let typedef = typedef_decl(&mut decls, int_ty);
    let sugar = ctx.get_typedef(typedef, int_ty);
    let pointer = ctx.get_pointer(sugar);

    for qt in [int_ty, sugar, pointer, pointer.with_const()] {
        let once = ctx.canonical(qt);
        assert_eq!(ctx.canonical(once), once);
    }
}

#[test]
fn typedef_chains_canonicalize_to_the_base_type() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let int_ty = ctx.builtins.int_ty;

    // typedef int I; typedef I J;
    let i_decl = typedef_decl(&mut decls, int_ty);
    let i_ty = ctx.get_typedef(i_decl, int_ty);
    let j_decl = typedef_decl(&mut decls, i_ty);
    let j_ty = ctx.get_typedef(j_decl, i_ty);

    assert!(matches!(ctx.kind(j_ty), TypeKind::Typedef { .. }));
    assert_eq!(ctx.canonical(j_ty), int_ty);
    // Desugaring is one step at a time.
    assert_eq!(ctx.desugared(j_ty), i_ty);
    assert_eq!(ctx.desugared(i_ty), int_ty);
    assert!(!ctx.is_canonical(j_ty));
    assert!(ctx.is_canonical(int_ty));
}

#[test]
fn qualifier_law_holds_through_sugar() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let int_ty = ctx.builtins.int_ty;
    let typedef = typedef_decl(&mut decls, int_ty.with_const());
    let sugar = ctx.get_typedef(typedef, int_ty.with_const());

    for qt in [int_ty.with_const(), sugar, sugar.with_quals(Qualifiers::VOLATILE)] {
        // unqualified(T) canonicalized equals canonical(T) with quals
        // stripped.
        let lhs = ctx.canonical(ctx.get_unqualified(qt));
        let rhs = ctx.canonical(qt).without_quals();
        assert_eq!(lhs.without_quals(), rhs);
    }
}

#[test]
fn uniquing_equality_is_canonical_handle_equality() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let int_ty = ctx.builtins.int_ty;
    let typedef = typedef_decl(&mut decls, int_ty);
    let sugar = ctx.get_typedef(typedef, int_ty);

    // Pointer-to-typedef and pointer-to-int are distinct written types
    // with the same canonical identity.
    let through_sugar = ctx.get_pointer(sugar);
    let direct = ctx.get_pointer(int_ty);
    assert_ne!(through_sugar, direct);
    assert!(ctx.types_equal(through_sugar, direct));
    assert_eq!(ctx.canonical(through_sugar), ctx.canonical(direct));
}

#[test]
fn function_types_key_on_the_full_signature() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let double_ty = ctx.builtins.double_ty;

    let a = ctx.get_function(int_ty, &[int_ty, double_ty], false, Qualifiers::empty());
    let b = ctx.get_function(int_ty, &[int_ty, double_ty], false, Qualifiers::empty());
    let c = ctx.get_function(int_ty, &[double_ty, int_ty], false, Qualifiers::empty());
    let d = ctx.get_function(int_ty, &[int_ty, double_ty], true, Qualifiers::empty());
    assert_eq!(a, b);
    assert_ne!(a, c, "parameter order matters");
    assert_ne!(a, d, "variadic-ness matters");
}

#[test]
fn arrays_unique_by_size_and_element() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let a = ctx.get_constant_array(int_ty, 4, Default::default(), Qualifiers::empty());
    let b = ctx.get_constant_array(int_ty, 4, Default::default(), Qualifiers::empty());
    let c = ctx.get_constant_array(int_ty, 5, Default::default(), Qualifiers::empty());
    assert_eq!(a, b);
    assert_ne!(a, c);

    let incomplete_a = ctx.get_incomplete_array(int_ty, Default::default(), Qualifiers::empty());
    let incomplete_b = ctx.get_incomplete_array(int_ty, Default::default(), Qualifiers::empty());
    assert_eq!(incomplete_a, incomplete_b);
}

#[test]
fn variable_arrays_are_never_uniqued() {
    let mut ctx = TypeContext::new();
    let mut ast = crate::ast::stmt::AstArena::new();
    let int_ty = ctx.builtins.int_ty;
    let size = ast.alloc_expr(crate::ast::stmt::StmtKind::IntegerLiteral {
        data: crate::ast::stmt::ExprData {
            ty: int_ty,
            category: crate::ast::stmt::ValueCategory::RValue,
            range: Default::default(),
        },
        value: 10,
    });
    let a = ctx.get_variable_array(int_ty, size, Default::default(), Qualifiers::empty());
    let b = ctx.get_variable_array(int_ty, size, Default::default(), Qualifiers::empty());
    assert_ne!(a, b);
}

#[test]
fn records_are_self_canonical() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let tu = decls.translation_unit();
    let record = decls.create(
        DeclKind::Record {
            tag_kind: TagKind::Struct,
            is_definition: false,
            fields: Vec::new(),
            ty: None,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    let a = ctx.get_record(record);
    let b = ctx.get_record(record);
    assert_eq!(a, b);
    assert!(ctx.is_canonical(a));
}

#[test]
fn references_and_non_reference_type() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let reference = ctx.get_reference(int_ty, true);
    assert!(ctx.is_reference_type(reference));
    assert_eq!(ctx.non_reference_type(reference), int_ty);
    assert_eq!(ctx.non_reference_type(int_ty), int_ty);

    let lvalue = ctx.get_reference(int_ty, true);
    let rvalue = ctx.get_reference(int_ty, false);
    assert_eq!(reference, lvalue);
    assert_ne!(lvalue, rvalue);
}

#[test]
fn template_specializations_canonicalize_to_instantiations() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let tu = decls.translation_unit();
    let template = decls.create(
        DeclKind::ClassTemplate {
            params: Vec::new(),
            templated: DeclId(0),
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    let record = decls.create(
        DeclKind::Record {
            tag_kind: TagKind::Struct,
            is_definition: true,
            fields: Vec::new(),
            ty: None,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    let record_ty = ctx.get_record(record);
    let int_ty = ctx.builtins.int_ty;

    let spec = ctx.get_template_specialization(template, &[TemplateArg::Type(int_ty)], Some(record_ty));
    assert!(!ctx.is_canonical(spec));
    assert_eq!(ctx.canonical(spec), record_ty);
    assert!(!ctx.is_dependent(spec));

    // A dependent argument leaves the specialization self-canonical.
    let parm = ctx.get_template_type_parm(0, 0, None);
    let dependent = ctx.get_template_specialization(template, &[TemplateArg::Type(parm)], None);
    assert!(ctx.is_canonical(dependent));
    assert!(ctx.is_dependent(dependent));
}

#[test]
fn dependence_propagates_through_components() {
    let mut ctx = TypeContext::new();
    let parm = ctx.get_template_type_parm(0, 0, None);
    assert!(ctx.is_dependent(parm));
    let pointer = ctx.get_pointer(parm);
    assert!(ctx.is_dependent(pointer));
    let int_ptr = ctx.get_pointer(ctx.builtins.int_ty);
    assert!(!ctx.is_dependent(int_ptr));

    let fn_ty = ctx.get_function(ctx.builtins.int_ty, &[parm], false, Qualifiers::empty());
    assert!(ctx.is_dependent(fn_ty));
}

#[test]
fn ext_qual_wraps_and_unwraps() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let a = ctx.get_ext_qual(int_ty.ty(), 3, GcAttr::None);
    let b = ctx.get_ext_qual(int_ty.ty(), 3, GcAttr::None);
    let c = ctx.get_ext_qual(int_ty.ty(), 4, GcAttr::None);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(ctx.is_canonical(a), "ext-qual of a canonical base is canonical");
    assert_eq!(ctx.get_unqualified(a), int_ty);
}
