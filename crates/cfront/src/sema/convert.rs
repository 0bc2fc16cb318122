//! Implicit conversions.
//!
//! C99 6.3: array/function decay, integer promotions, and the usual
//! arithmetic conversions. Conversions materialize as `ImplicitCast` nodes
//! whose type is the destination; a conversion between identical canonical
//! types inserts nothing.

use crate::ast::stmt::{CastKind, ExprData, ExprId, StmtKind, ValueCategory};
use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::ident::IdentifierTable;
use crate::sema::Sema;
use crate::types::ty::{BuiltinKind, QualType, TypeKind};

impl Sema {
    /// Wrap `expr` in an implicit cast to `to`, unless the types already
    /// agree canonically.
    pub fn implicit_cast(
        &mut self,
        expr: ExprId,
        to: QualType,
        kind: CastKind,
    ) -> ExprId {
        if self.ctx.types.types_equal(self.ctx.ast.expr_ty(expr), to) {
            return expr;
        }
        let range = self.ctx.ast.expr_range(expr);
        self.ctx.ast.alloc_expr(StmtKind::ImplicitCast {
            data: ExprData {
                ty: to,
                category: ValueCategory::RValue,
                range,
            },
            kind,
            operand: expr,
        })
    }

    /// Array-to-pointer and function-to-pointer decay (C99 6.3.2.1).
    pub fn default_function_array_conversion(
        &mut self,
        expr: ExprId,
    ) -> ExprId {
        let ty = self.ctx.ast.expr_ty(expr);
        if let Some(element) = self.ctx.types.array_element_type(ty) {
            let pointer = self.ctx.types.get_pointer(element);
            return self.implicit_cast(expr, pointer, CastKind::ArrayToPointerDecay);
        }
        if self.ctx.types.is_function_type(ty) {
            let pointer = self.ctx.types.get_pointer(ty.without_quals());
            return self.implicit_cast(expr, pointer, CastKind::FunctionToPointerDecay);
        }
        expr
    }

    /// The type an arithmetic operand promotes to (C99 6.3.1.1p2).
    pub fn integer_promoted_type(
        &self,
        ty: QualType,
    ) -> QualType {
        let builtins = &self.ctx.types.builtins;
        match self.ctx.types.canonical_builtin(ty) {
            Some(kind) if kind.is_integer() && kind.integer_rank() < BuiltinKind::Int.integer_rank() => {
                builtins.int_ty
            },
            _ => {
                // Enums promote to their underlying integer type.
                if self.ctx.types.is_enum_type(ty) {
                    builtins.int_ty
                } else {
                    ty.without_quals()
                }
            },
        }
    }

    /// Apply the integer promotions to an operand.
    pub fn promote_integer(
        &mut self,
        expr: ExprId,
    ) -> ExprId {
        let ty = self.ctx.ast.expr_ty(expr);
        let promoted = self.integer_promoted_type(ty);
        self.implicit_cast(expr, promoted, CastKind::IntegralCast)
    }

    /// The usual arithmetic conversions (C99 6.3.1.8): both operands are
    /// converted to a common type, which is returned with the rewritten
    /// operands.
    pub fn usual_arithmetic_conversions(
        &mut self,
        lhs: ExprId,
        rhs: ExprId,
    ) -> (ExprId, ExprId, QualType) {
        let lhs_ty = self.ctx.ast.expr_ty(lhs);
        let rhs_ty = self.ctx.ast.expr_ty(rhs);
        let common = self.common_arithmetic_type(lhs_ty, rhs_ty);

        let lhs_kind = self.arithmetic_cast_kind(lhs_ty, common);
        let rhs_kind = self.arithmetic_cast_kind(rhs_ty, common);
        let lhs = self.implicit_cast(lhs, common, lhs_kind);
        let rhs = self.implicit_cast(rhs, common, rhs_kind);
        (lhs, rhs, common)
    }

    fn common_arithmetic_type(
        &self,
        lhs: QualType,
        rhs: QualType,
    ) -> QualType {
        let builtins = &self.ctx.types.builtins;
        let lhs_kind = self.ctx.types.canonical_builtin(lhs);
        let rhs_kind = self.ctx.types.canonical_builtin(rhs);

        // Floating beats integer; wider floating beats narrower.
        let float_rank =
            |kind: Option<BuiltinKind>| kind.map(|k| k.floating_rank()).unwrap_or(0);
        let lhs_float = float_rank(lhs_kind);
        let rhs_float = float_rank(rhs_kind);
        if lhs_float > 0 || rhs_float > 0 {
            return match lhs_float.max(rhs_float) {
                3 => builtins.long_double_ty,
                2 => builtins.double_ty,
                _ => builtins.float_ty,
            };
        }

        // Integer rules, after promotion.
        let lhs_promoted = self.integer_promoted_type(lhs);
        let rhs_promoted = self.integer_promoted_type(rhs);
        let lhs_kind = self.ctx.types.canonical_builtin(lhs_promoted).unwrap_or(BuiltinKind::Int);
        let rhs_kind = self.ctx.types.canonical_builtin(rhs_promoted).unwrap_or(BuiltinKind::Int);
        if lhs_kind == rhs_kind {
            return lhs_promoted;
        }

        let (hi, hi_ty, lo_kind) = if lhs_kind.integer_rank() >= rhs_kind.integer_rank() {
            (lhs_kind, lhs_promoted, rhs_kind)
        } else {
            (rhs_kind, rhs_promoted, lhs_kind)
        };

        if hi.is_unsigned_integer() == lo_kind.is_unsigned_integer() {
            return hi_ty;
        }
        if hi.is_unsigned_integer() {
            // Unsigned with greater-or-equal rank wins.
            return hi_ty;
        }
        // Signed type of higher rank represents all lower-rank unsigned
        // values on this target model.
        hi_ty
    }

    fn arithmetic_cast_kind(
        &self,
        from: QualType,
        to: QualType,
    ) -> CastKind {
        let from_float = self.ctx.types.is_real_floating_type(from);
        let to_float = self.ctx.types.is_real_floating_type(to);
        match (from_float, to_float) {
            (true, true) => CastKind::FloatingCast,
            (false, true) => CastKind::IntegralToFloating,
            (true, false) => CastKind::FloatingToIntegral,
            (false, false) => CastKind::IntegralCast,
        }
    }

    /// Convert `expr` for assignment/initialization/return to `to`
    /// (C99 6.5.16.1). Emits the lossy-conversion warning for
    /// floating-to-integral and a type-mismatch error when no conversion
    /// exists. The result always has type `to`.
    pub fn convert_for_assignment(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        expr: ExprId,
        to: QualType,
    ) -> ExprId {
        let expr = self.default_function_array_conversion(expr);
        let from = self.ctx.ast.expr_ty(expr);

        if self.ctx.types.types_equal(from, to) {
            return expr;
        }

        if self.ctx.types.is_arithmetic_type(from) && self.ctx.types.is_arithmetic_type(to) {
            if self.ctx.types.is_real_floating_type(from) && self.ctx.types.is_integer_type(to) {
                let from_printed = self.ctx.types.print(from, &self.ctx.decls, idents);
                let to_printed = self.ctx.types.print(to, &self.ctx.decls, idents);
                diags
                    .report(self.ctx.ast.expr_range(expr).begin, DiagCode::WarnImplicitConversion)
                    .arg_qualtype(from_printed)
                    .arg_qualtype(to_printed)
                    .range(self.ctx.ast.expr_range(expr));
            }
            let kind = self.arithmetic_cast_kind(from, to);
            return self.implicit_cast(expr, to, kind);
        }

        if self.ctx.types.is_pointer_type(from) && self.ctx.types.is_pointer_type(to) {
            let from_pointee = self.ctx.types.pointee_type(from).expect("pointer has a pointee");
            let to_pointee = self.ctx.types.pointee_type(to).expect("pointer has a pointee");
            // Compatible modulo qualifiers, or either side void *.
            let compatible = self.ctx.types.types_equal(from_pointee.without_quals(), to_pointee.without_quals())
                || self.ctx.types.is_void_type(from_pointee)
                || self.ctx.types.is_void_type(to_pointee);
            if compatible {
                return self.implicit_cast(expr, to, CastKind::PointerCast);
            }
        }

        // A null pointer constant converts to any pointer type.
        if self.ctx.types.is_pointer_type(to) && self.is_null_pointer_constant(idents, expr) {
            return self.implicit_cast(expr, to, CastKind::IntegralToPointer);
        }

        let from_printed = self.ctx.types.print(from, &self.ctx.decls, idents);
        let to_printed = self.ctx.types.print(to, &self.ctx.decls, idents);
        diags
            .report(self.ctx.ast.expr_range(expr).begin, DiagCode::ErrTypeMismatch)
            .arg_qualtype(to_printed)
            .arg_qualtype(from_printed)
            .range(self.ctx.ast.expr_range(expr));
        // Recover with a cast so downstream sees the expected type.
        self.implicit_cast(expr, to, CastKind::PointerCast)
    }

    pub(crate) fn is_null_pointer_constant(
        &self,
        idents: &IdentifierTable,
        expr: ExprId,
    ) -> bool {
        if !self.ctx.types.is_integer_type(self.ctx.ast.expr_ty(expr)) {
            return false;
        }
        matches!(
            crate::sema::const_eval::evaluate(&self.ctx, idents, expr),
            Some(crate::sema::const_eval::ConstValue::Int(0))
        )
    }

    /// A scalar check used by conditions; everything convertible to bool.
    pub fn check_condition(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        expr: ExprId,
    ) -> ExprId {
        let expr = self.default_function_array_conversion(expr);
        let ty = self.ctx.ast.expr_ty(expr);
        if !self.ctx.types.is_scalar_type(ty) && !self.ctx.types.is_dependent(ty) {
            let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
            diags
                .report(self.ctx.ast.expr_range(expr).begin, DiagCode::ErrTypeMismatch)
                .arg_qualtype("scalar".to_owned())
                .arg_qualtype(printed);
        }
        expr
    }

    /// Default argument promotions for variadic arguments (C99 6.5.2.2p6):
    /// float widens to double, small integers promote.
    pub fn default_argument_promotion(
        &mut self,
        expr: ExprId,
    ) -> ExprId {
        let expr = self.default_function_array_conversion(expr);
        let ty = self.ctx.ast.expr_ty(expr);
        if self.ctx.types.canonical_builtin(ty) == Some(BuiltinKind::Float) {
            let double_ty = self.ctx.types.builtins.double_ty;
            return self.implicit_cast(expr, double_ty, CastKind::FloatingCast);
        }
        if self.ctx.types.is_integer_type(ty) {
            return self.promote_integer(expr);
        }
        expr
    }

    /// Whether two types are compatible function types for redeclaration
    /// purposes, treating a no-proto type as compatible with any prototype
    /// of the same return type.
    pub fn function_types_compatible(
        &self,
        a: QualType,
        b: QualType,
    ) -> bool {
        if self.ctx.types.types_equal(a, b) {
            return true;
        }
        let (a_kind, b_kind) = (self.ctx.types.canonical_kind(a), self.ctx.types.canonical_kind(b));
        match (a_kind, b_kind) {
            (
                TypeKind::FunctionNoProto {
                    result: a_result,
                },
                TypeKind::FunctionProto {
                    result: b_result, ..
                },
            )
            | (
                TypeKind::FunctionProto {
                    result: a_result, ..
                },
                TypeKind::FunctionNoProto {
                    result: b_result,
                },
            ) => self.ctx.types.types_equal(*a_result, *b_result),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/sema/convert_tests.rs"]
mod tests;
