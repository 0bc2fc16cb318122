use super::*;

use crate::basic::source_location::SourceLocation;
use crate::config::{LangDialect, LangOptions};
use crate::types::ty::Qualifiers;

fn cxx_sema() -> Sema {
    Sema::new(&LangOptions::for_dialect(LangDialect::Cxx))
}

fn function(
    sema: &mut Sema,
    params: &[QualType],
) -> DeclId {
    let int_ty = sema.ctx.types.builtins.int_ty;
    let ty = sema.ctx.types.get_function(int_ty, params, false, Qualifiers::empty());
    let tu = sema.translation_unit();
    sema.ctx.decls.create(
        DeclKind::Function {
            ty,
            storage: Default::default(),
            is_inline: false,
            params: Vec::new(),
            body: None,
        },
        None,
        SourceLocation::invalid(),
        Some(tu),
        Some(tu),
    )
}

#[test]
fn ranks_are_ordered() {
    assert!(ConversionRank::Exact < ConversionRank::Promotion);
    assert!(ConversionRank::Promotion < ConversionRank::Conversion);
}

#[test]
fn conversion_ranks_classify() {
    let mut sema = cxx_sema();
    let b = sema.ctx.types.builtins.int_ty;
    let int_ty = b;
    let char_ty = sema.ctx.types.builtins.char_ty;
    let float_ty = sema.ctx.types.builtins.float_ty;
    let double_ty = sema.ctx.types.builtins.double_ty;

    assert_eq!(conversion_rank(&sema, int_ty, int_ty), Some(ConversionRank::Exact));
    assert_eq!(conversion_rank(&sema, int_ty, int_ty.with_const()), Some(ConversionRank::Exact));
    assert_eq!(conversion_rank(&sema, char_ty, int_ty), Some(ConversionRank::Promotion));
    assert_eq!(conversion_rank(&sema, float_ty, double_ty), Some(ConversionRank::Promotion));
    assert_eq!(conversion_rank(&sema, int_ty, double_ty), Some(ConversionRank::Conversion));
    assert_eq!(conversion_rank(&sema, double_ty, char_ty), Some(ConversionRank::Conversion));

    let int_ptr = sema.ctx.types.get_pointer(int_ty);
    let double_ptr = sema.ctx.types.get_pointer(double_ty);
    let void_ptr = sema.ctx.types.get_pointer(sema.ctx.types.builtins.void_ty);
    assert_eq!(conversion_rank(&sema, int_ptr, int_ptr), Some(ConversionRank::Exact));
    assert_eq!(conversion_rank(&sema, int_ptr, void_ptr), Some(ConversionRank::Conversion));
    assert_eq!(conversion_rank(&sema, int_ptr, double_ptr), None);
    assert_eq!(conversion_rank(&sema, int_ptr, int_ty), None);

    let int_ref = sema.ctx.types.get_reference(int_ty, true);
    assert_eq!(conversion_rank(&sema, int_ty, int_ref), Some(ConversionRank::Exact));
}

#[test]
fn the_better_candidate_wins() {
    let mut sema = cxx_sema();
    let int_ty = sema.ctx.types.builtins.int_ty;
    let double_ty = sema.ctx.types.builtins.double_ty;

    let f_int = function(&mut sema, &[int_ty]);
    let f_double = function(&mut sema, &[double_ty]);

    assert_eq!(resolve(&sema, &[f_int, f_double], &[int_ty]), OverloadResult::Best(f_int));
    assert_eq!(resolve(&sema, &[f_int, f_double], &[double_ty]), OverloadResult::Best(f_double));

    let char_ty = sema.ctx.types.builtins.char_ty;
    // char: promotes to int, converts to double; promotion wins.
    assert_eq!(resolve(&sema, &[f_int, f_double], &[char_ty]), OverloadResult::Best(f_int));
}

#[test]
fn no_strict_winner_is_ambiguous() {
    let mut sema = cxx_sema();
    let int_ty = sema.ctx.types.builtins.int_ty;
    let double_ty = sema.ctx.types.builtins.double_ty;
    let float_ty = sema.ctx.types.builtins.float_ty;

    let f_a = function(&mut sema, &[int_ty, double_ty]);
    let f_b = function(&mut sema, &[double_ty, int_ty]);

    // Each candidate wins one argument: ambiguous.
    match resolve(&sema, &[f_a, f_b], &[float_ty, float_ty]) {
        OverloadResult::Ambiguous(tied) => {
            assert_eq!(tied.len(), 2);
        },
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn arity_filters_viability() {
    let mut sema = cxx_sema();
    let int_ty = sema.ctx.types.builtins.int_ty;
    let f1 = function(&mut sema, &[int_ty]);
    let f2 = function(&mut sema, &[int_ty, int_ty]);

    assert_eq!(resolve(&sema, &[f1, f2], &[int_ty]), OverloadResult::Best(f1));
    assert_eq!(resolve(&sema, &[f1, f2], &[int_ty, int_ty]), OverloadResult::Best(f2));
    assert_eq!(resolve(&sema, &[f1, f2], &[]), OverloadResult::NoViable);
}

#[test]
fn unconvertible_arguments_mean_no_viable() {
    let mut sema = cxx_sema();
    let int_ty = sema.ctx.types.builtins.int_ty;
    let int_ptr = sema.ctx.types.get_pointer(int_ty);
    let double_ptr = {
        let d = sema.ctx.types.builtins.double_ty;
        sema.ctx.types.get_pointer(d)
    };
    let f = function(&mut sema, &[int_ptr]);
    assert_eq!(resolve(&sema, &[f], &[double_ptr]), OverloadResult::NoViable);
}
