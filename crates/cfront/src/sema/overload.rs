//! Overload resolution.
//!
//! Candidates are ranked per argument by the quality of the implicit
//! conversion sequence (exact match beats promotion beats conversion); a
//! candidate wins when it is at least as good on every argument and
//! strictly better on one. No strict winner means the call is ambiguous.

use crate::decl::decl::{DeclId, DeclKind};
use crate::sema::Sema;
use crate::types::ty::{QualType, TypeKind};

/// Quality of one implicit conversion sequence, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionRank {
    Exact,
    Promotion,
    Conversion,
}

#[derive(Debug, PartialEq, Eq)]
pub enum OverloadResult {
    Best(DeclId),
    Ambiguous(Vec<DeclId>),
    NoViable,
}

/// Rank the conversion from `from` to `to`, or `None` when none exists.
pub fn conversion_rank(
    sema: &Sema,
    from: QualType,
    to: QualType,
) -> Option<ConversionRank> {
    let types = &sema.ctx.types;

    if types.types_equal(from.without_quals(), to.without_quals()) {
        return Some(ConversionRank::Exact);
    }

    // Array and function decay count as exact matches.
    if let Some(element) = types.array_element_type(from)
        && let TypeKind::Pointer {
            pointee,
        } = types.canonical_kind(to)
        && types.types_equal(element.without_quals(), pointee.without_quals())
    {
        return Some(ConversionRank::Exact);
    }

    // Integer and floating promotions.
    if types.is_arithmetic_type(from) && types.is_arithmetic_type(to) {
        let promoted = sema.integer_promoted_type(from);
        if types.types_equal(promoted, to) {
            return Some(ConversionRank::Promotion);
        }
        let builtins = &types.builtins;
        if types.types_equal(from, builtins.float_ty) && types.types_equal(to, builtins.double_ty) {
            return Some(ConversionRank::Promotion);
        }
        return Some(ConversionRank::Conversion);
    }

    if types.is_pointer_type(from) && types.is_pointer_type(to) {
        let from_pointee = types.pointee_type(from).expect("pointer has a pointee");
        let to_pointee = types.pointee_type(to).expect("pointer has a pointee");
        if types.types_equal(from_pointee.without_quals(), to_pointee.without_quals()) {
            return Some(ConversionRank::Exact);
        }
        if types.is_void_type(to_pointee) {
            return Some(ConversionRank::Conversion);
        }
        return None;
    }

    // Binding a reference parameter to a matching operand.
    if let TypeKind::Reference {
        pointee, ..
    } = types.canonical_kind(to)
        && types.types_equal(from.without_quals(), pointee.without_quals())
    {
        return Some(ConversionRank::Exact);
    }

    None
}

/// Pick the best viable candidate for the given argument types.
pub fn resolve(
    sema: &Sema,
    candidates: &[DeclId],
    arg_types: &[QualType],
) -> OverloadResult {
    // Build conversion-sequence vectors for the viable candidates.
    let mut viable: Vec<(DeclId, Vec<ConversionRank>)> = Vec::new();
    for &candidate in candidates {
        let fn_ty = match sema.ctx.decls.decl(candidate).kind {
            DeclKind::Function {
                ty, ..
            } => ty,
            _ => continue,
        };
        match sema.ctx.types.canonical_kind(fn_ty) {
            TypeKind::FunctionProto {
                params,
                variadic,
                ..
            } => {
                if arg_types.len() < params.len() || (arg_types.len() > params.len() && !variadic) {
                    continue;
                }
                let mut ranks = Vec::with_capacity(arg_types.len());
                let mut ok = true;
                for (i, &arg) in arg_types.iter().enumerate() {
                    match params.get(i) {
                        Some(&param) => match conversion_rank(sema, arg, param) {
                            Some(rank) => ranks.push(rank),
                            None => {
                                ok = false;
                                break;
                            },
                        },
                        // Variadic tail: worst rank, but viable.
                        None => ranks.push(ConversionRank::Conversion),
                    }
                }
                if ok {
                    viable.push((candidate, ranks));
                }
            },
            TypeKind::FunctionNoProto { .. } => {
                viable.push((candidate, vec![ConversionRank::Conversion; arg_types.len()]));
            },
            _ => continue,
        }
    }

    if viable.is_empty() {
        return OverloadResult::NoViable;
    }

    // `a` beats `b` when no argument converts worse and one converts
    // strictly better.
    let beats = |a: &[ConversionRank], b: &[ConversionRank]| {
        a.iter().zip(b).all(|(x, y)| x <= y) && a.iter().zip(b).any(|(x, y)| x < y)
    };

    for (i, (decl, ranks)) in viable.iter().enumerate() {
        let wins_all = viable
            .iter()
            .enumerate()
            .all(|(j, (_, other))| i == j || beats(ranks, other));
        if wins_all {
            return OverloadResult::Best(*decl);
        }
    }

    // No strict winner: report the maximal set.
    let tied: Vec<DeclId> = viable
        .iter()
        .filter(|(_, ranks)| !viable.iter().any(|(_, other)| beats(other, ranks)))
        .map(|(decl, _)| *decl)
        .collect();
    OverloadResult::Ambiguous(tied)
}

#[cfg(test)]
#[path = "../../tests/src/sema/overload_tests.rs"]
mod tests;
