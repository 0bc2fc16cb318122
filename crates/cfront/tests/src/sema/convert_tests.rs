use super::*;

use crate::basic::diagnostic::{Level, SharedDiagnosticBuffer};
use crate::basic::source_location::SourceLocation;
use crate::config::LangOptions;
use crate::sema::Sema;
use crate::types::ty::Qualifiers;

struct Fixture {
    sema: Sema,
    diags: DiagnosticsEngine,
    buffer: SharedDiagnosticBuffer,
    idents: IdentifierTable,
}

fn fixture() -> Fixture {
    let options = LangOptions::default();
    let buffer = SharedDiagnosticBuffer::new();
    Fixture {
        sema: Sema::new(&options),
        diags: DiagnosticsEngine::new(Box::new(buffer.clone())),
        buffer,
        idents: IdentifierTable::new(&options),
    }
}

impl Fixture {
    fn int_literal(
        &mut self,
        value: u64,
    ) -> ExprId {
        self.sema.act_on_numeric_literal(&value.to_string(), SourceLocation::invalid())
    }

    fn double_literal(&mut self) -> ExprId {
        self.sema.act_on_numeric_literal("1.5", SourceLocation::invalid())
    }
}

#[test]
fn identical_types_need_no_cast() {
    let mut f = fixture();
    let lit = f.int_literal(1);
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let converted = f.sema.implicit_cast(lit, int_ty, CastKind::IntegralCast);
    assert_eq!(converted, lit, "no node for a no-op conversion");
}

#[test]
fn integer_promotion_reaches_int() {
    let mut f = fixture();
    let char_ty = f.sema.ctx.types.builtins.char_ty;
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let long_ty = f.sema.ctx.types.builtins.long_ty;

    assert_eq!(f.sema.integer_promoted_type(char_ty), int_ty);
    assert_eq!(f.sema.integer_promoted_type(f.sema.ctx.types.builtins.short_ty), int_ty);
    assert_eq!(f.sema.integer_promoted_type(int_ty), int_ty);
    assert_eq!(f.sema.integer_promoted_type(long_ty), long_ty);
}

#[test]
fn usual_arithmetic_conversions_pick_the_wider_type() {
    let mut f = fixture();
    let int_lit = f.int_literal(1);
    let double_lit = f.double_literal();
    let (lhs, _rhs, common) = f.sema.usual_arithmetic_conversions(int_lit, double_lit);
    assert_eq!(common, f.sema.ctx.types.builtins.double_ty);
    // The integer operand was wrapped in a conversion to double.
    match &f.sema.ctx.ast.expr(lhs).kind {
        StmtKind::ImplicitCast {
            kind,
            data,
            ..
        } => {
            assert_eq!(*kind, CastKind::IntegralToFloating);
            assert_eq!(data.ty, common);
        },
        other => panic!("expected an implicit cast, got {other:?}"),
    }
}

#[test]
fn unsigned_wins_at_equal_rank() {
    let mut f = fixture();
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let uint_ty = f.sema.ctx.types.builtins.uint_ty;

    let a = f.int_literal(1);
    let b = f.int_literal(2);
    // Manufacture an unsigned operand through a cast.
    let b = f.sema.implicit_cast(b, uint_ty, CastKind::IntegralCast);
    let (_, _, common) = f.sema.usual_arithmetic_conversions(a, b);
    assert_eq!(common, uint_ty);
    let _ = int_ty;
}

#[test]
fn arrays_decay_to_element_pointers() {
    let mut f = fixture();
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let arr_ty = f.sema.ctx.types.get_constant_array(int_ty, 3, Default::default(), Qualifiers::empty());

    // A synthetic lvalue of array type.
    let lit = f.int_literal(0);
    let arr_expr = f.sema.ctx.ast.alloc_expr(StmtKind::Paren {
        data: crate::ast::stmt::ExprData {
            ty: arr_ty,
            category: crate::ast::stmt::ValueCategory::LValue,
            range: Default::default(),
        },
        inner: lit,
    });

    let decayed = f.sema.default_function_array_conversion(arr_expr);
    let decayed_ty = f.sema.ctx.ast.expr_ty(decayed);
    assert!(f.sema.ctx.types.is_pointer_type(decayed_ty));
    assert_eq!(f.sema.ctx.types.pointee_type(decayed_ty), Some(int_ty));
    match &f.sema.ctx.ast.expr(decayed).kind {
        StmtKind::ImplicitCast {
            kind, ..
        } => assert_eq!(*kind, CastKind::ArrayToPointerDecay),
        other => panic!("expected decay cast, got {other:?}"),
    }
}

#[test]
fn float_to_int_assignment_warns() {
    let mut f = fixture();
    let double_lit = f.double_literal();
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let converted = f.sema.convert_for_assignment(&mut f.diags, &f.idents, double_lit, int_ty);

    assert_eq!(f.sema.ctx.ast.expr_ty(converted), int_ty);
    let diagnostics = f.buffer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].level, Level::Warning);
    assert_eq!(diagnostics[0].message(), "implicit conversion from 'double' to 'int'");
}

#[test]
fn int_to_double_assignment_is_silent() {
    let mut f = fixture();
    let int_lit = f.int_literal(3);
    let double_ty = f.sema.ctx.types.builtins.double_ty;
    let converted = f.sema.convert_for_assignment(&mut f.diags, &f.idents, int_lit, double_ty);
    assert_eq!(f.sema.ctx.ast.expr_ty(converted), double_ty);
    assert!(f.buffer.is_empty());
}

#[test]
fn null_constants_convert_to_pointers() {
    let mut f = fixture();
    let zero = f.int_literal(0);
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let ptr_ty = f.sema.ctx.types.get_pointer(int_ty);
    let converted = f.sema.convert_for_assignment(&mut f.diags, &f.idents, zero, ptr_ty);
    assert_eq!(f.sema.ctx.ast.expr_ty(converted), ptr_ty);
    assert!(f.buffer.is_empty());

    let one = f.int_literal(1);
    f.sema.convert_for_assignment(&mut f.diags, &f.idents, one, ptr_ty);
    assert!(!f.buffer.is_empty(), "a nonzero integer is not a null pointer constant");
}

#[test]
fn incompatible_assignment_is_an_error() {
    let mut f = fixture();
    let lit = f.int_literal(1);
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let ptr_ptr = {
        let p = f.sema.ctx.types.get_pointer(int_ty);
        f.sema.ctx.types.get_pointer(p)
    };
    let double_ty = f.sema.ctx.types.builtins.double_ty;
    let double_ptr = f.sema.ctx.types.get_pointer(double_ty);

    // A double* value assigned to int**: no conversion exists.
    let rhs = f.sema.implicit_cast(lit, double_ptr, CastKind::IntegralToPointer);
    let converted = f.sema.convert_for_assignment(&mut f.diags, &f.idents, rhs, ptr_ptr);
    assert_eq!(f.sema.ctx.ast.expr_ty(converted), ptr_ptr, "recovery still yields the target type");
    assert!(f.buffer.diagnostics().iter().any(|d| d.message().contains("incompatible types")));
}

#[test]
fn variadic_arguments_promote() {
    let mut f = fixture();
    let float_ty = f.sema.ctx.types.builtins.float_ty;
    let double_ty = f.sema.ctx.types.builtins.double_ty;
    let lit = f.double_literal();
    let as_float = f.sema.implicit_cast(lit, float_ty, CastKind::FloatingCast);
    let promoted = f.sema.default_argument_promotion(as_float);
    assert_eq!(f.sema.ctx.ast.expr_ty(promoted), double_ty);

    let small = f.sema.act_on_char_literal("'a'", SourceLocation::invalid());
    let promoted = f.sema.default_argument_promotion(small);
    assert_eq!(f.sema.ctx.ast.expr_ty(promoted), f.sema.ctx.types.builtins.int_ty);
}
