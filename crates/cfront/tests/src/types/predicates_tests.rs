use super::*;

use crate::basic::source_location::SourceLocation;
use crate::decl::decl::{DeclKind, TagKind};
use crate::decl::table::DeclTable;
use crate::types::context::TypeContext;
use crate::types::ty::Qualifiers;

fn record_decl(
    decls: &mut DeclTable,
    defined: bool,
) -> crate::decl::decl::DeclId {
    let tu = decls.translation_unit();
    decls.create(
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
}

#[test]
fn numeric_classification() {
    let ctx = TypeContext::new();
    let b = &ctx.builtins;
    assert!(ctx.is_integer_type(b.int_ty));
    assert!(ctx.is_integer_type(b.char_ty));
    assert!(ctx.is_signed_integer_type(b.long_ty));
    assert!(ctx.is_unsigned_integer_type(b.uint_ty));
    assert!(!ctx.is_integer_type(b.double_ty));
    assert!(ctx.is_real_floating_type(b.float_ty));
    assert!(ctx.is_arithmetic_type(b.int_ty));
    assert!(ctx.is_arithmetic_type(b.long_double_ty));
    assert!(ctx.is_scalar_type(b.int_ty));
    assert!(!ctx.is_void_type(b.int_ty));
    assert!(ctx.is_void_type(b.void_ty));
}

#[test]
fn predicates_see_through_qualifiers_and_sugar() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let tu = decls.translation_unit();
    let int_ty = ctx.builtins.int_ty;
    let typedef = decls.create(
        DeclKind::Typedef {
            underlying: int_ty,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    let sugar = ctx.get_typedef(typedef, int_ty);
    assert!(ctx.is_integer_type(sugar));
    assert!(ctx.is_integer_type(sugar.with_const()));
    assert!(ctx.is_arithmetic_type(int_ty.with_quals(Qualifiers::VOLATILE)));
}

#[test]
fn structural_classification() {
    let mut ctx = TypeContext::new();
    let int_ty = ctx.builtins.int_ty;
    let ptr = ctx.get_pointer(int_ty);
    let arr = ctx.get_constant_array(int_ty, 3, Default::default(), Qualifiers::empty());
    let fun = ctx.get_function(int_ty, &[], false, Qualifiers::empty());
    let vec = ctx.get_vector(int_ty, 4);

    assert!(ctx.is_pointer_type(ptr));
    assert!(ctx.is_array_type(arr));
    assert!(ctx.is_function_type(fun));
    assert!(ctx.is_vector_type(vec));
    assert!(ctx.is_scalar_type(ptr));
    assert!(ctx.is_aggregate_type(arr));
    assert!(!ctx.is_aggregate_type(ptr));

    assert_eq!(ctx.pointee_type(ptr), Some(int_ty));
    assert_eq!(ctx.array_element_type(arr), Some(int_ty));
    assert_eq!(ctx.function_result_type(fun), Some(int_ty));
    assert_eq!(ctx.pointee_type(int_ty), None);
}

#[test]
fn enums_are_integer_types() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();
    let tu = decls.translation_unit();
    let enum_decl = decls.create(
        DeclKind::Enum {
            is_definition: true,
            enumerators: Vec::new(),
            integer_type: None,
            ty: None,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    );
    let enum_ty = ctx.get_enum(enum_decl);
    assert!(ctx.is_integer_type(enum_ty));
    assert!(ctx.is_enum_type(enum_ty));
    assert!(ctx.is_arithmetic_type(enum_ty));
}

#[test]
fn completeness_follows_the_definition() {
    let mut ctx = TypeContext::new();
    let mut decls = DeclTable::new();

    let incomplete = record_decl(&mut decls, false);
    let complete = record_decl(&mut decls, true);
    let incomplete_ty = ctx.get_record(incomplete);
    let complete_ty = ctx.get_record(complete);

    assert!(ctx.is_incomplete_type(incomplete_ty, &decls));
    assert!(!ctx.is_incomplete_type(complete_ty, &decls));
    assert!(ctx.is_object_type(complete_ty, &decls));
    assert!(!ctx.is_object_type(incomplete_ty, &decls));

    let void_ty = ctx.builtins.void_ty;
    assert!(ctx.is_incomplete_type(void_ty, &decls));
    let incomplete_arr = ctx.get_incomplete_array(ctx.builtins.int_ty, Default::default(), Qualifiers::empty());
    assert!(ctx.is_incomplete_type(incomplete_arr, &decls));

    let fun = ctx.get_function(ctx.builtins.int_ty, &[], false, Qualifiers::empty());
    assert!(!ctx.is_object_type(fun, &decls));
}
