use super::*;

use crate::basic::diagnostic::{DiagnosticsEngine, SharedDiagnosticBuffer};
use crate::basic::ident::IdentifierTable;
use crate::basic::source_location::SourceLocation;
use crate::config::LangOptions;
use crate::decl::scope::ScopeFlags;
use crate::sema::Sema;
use crate::types::ty::Qualifiers;

struct Fixture {
    sema: Sema,
    diags: DiagnosticsEngine,
    idents: IdentifierTable,
}

fn fixture() -> Fixture {
    let options = LangOptions::default();
    let buffer = SharedDiagnosticBuffer::new();
    Fixture {
        sema: Sema::new(&options),
        diags: DiagnosticsEngine::new(Box::new(buffer.clone())),
        idents: IdentifierTable::new(&options),
    }
}

impl Fixture {
    fn lit(
        &mut self,
        spelling: &str,
    ) -> ExprId {
        self.sema.act_on_numeric_literal(spelling, SourceLocation::invalid())
    }

    fn bin(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> ExprId {
        self.sema.act_on_binary_op(&mut self.diags, &self.idents, op, lhs, rhs, SourceLocation::invalid())
    }

    fn eval(
        &self,
        expr: ExprId,
    ) -> Option<ConstValue> {
        evaluate(&self.sema.ctx, &self.idents, expr)
    }
}

#[test]
fn literals_fold() {
    let mut f = fixture();
    let a = f.lit("7");
    assert_eq!(f.eval(a), Some(ConstValue::Int(7)));
    let b = f.lit("2.5");
    assert_eq!(f.eval(b), Some(ConstValue::Float(2.5)));
}

#[test]
fn integer_arithmetic_folds() {
    let mut f = fixture();
    let cases: Vec<(&str, BinaryOp, &str, i64)> = vec![
        ("6", BinaryOp::Mul, "7", 42),
        ("7", BinaryOp::Div, "2", 3),
        ("7", BinaryOp::Rem, "2", 1),
        ("1", BinaryOp::Shl, "4", 16),
        ("12", BinaryOp::And, "10", 8),
        ("12", BinaryOp::Or, "1", 13),
        ("3", BinaryOp::Lt, "4", 1),
        ("4", BinaryOp::Eq, "4", 1),
        ("4", BinaryOp::Ne, "4", 0),
    ];
    for (l, op, r, expected) in cases {
        let lhs = f.lit(l);
        let rhs = f.lit(r);
        let expr = f.bin(op, lhs, rhs);
        assert_eq!(f.eval(expr), Some(ConstValue::Int(expected)), "{l} {op:?} {r}");
    }
}

#[test]
fn division_by_zero_is_not_constant() {
    let mut f = fixture();
    let lhs = f.lit("1");
    let rhs = f.lit("0");
    let expr = f.bin(BinaryOp::Div, lhs, rhs);
    assert_eq!(f.eval(expr), None);
}

#[test]
fn short_circuit_ignores_the_dead_operand() {
    let mut f = fixture();
    // 0 && (1/0): the right side never evaluates.
    let zero = f.lit("0");
    let one = f.lit("1");
    let zero2 = f.lit("0");
    let div = f.bin(BinaryOp::Div, one, zero2);
    let expr = f.bin(BinaryOp::LAnd, zero, div);
    assert_eq!(f.eval(expr), Some(ConstValue::Int(0)));

    let one = f.lit("1");
    let one2 = f.lit("1");
    let zero3 = f.lit("0");
    let div = f.bin(BinaryOp::Div, one2, zero3);
    let expr = f.bin(BinaryOp::LOr, one, div);
    assert_eq!(f.eval(expr), Some(ConstValue::Int(1)));
}

#[test]
fn unary_operators_fold() {
    let mut f = fixture();
    let five = f.lit("5");
    let neg = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::Minus, five, SourceLocation::invalid());
    assert_eq!(f.eval(neg), Some(ConstValue::Int(-5)));

    let five = f.lit("5");
    let not = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::Not, five, SourceLocation::invalid());
    assert_eq!(f.eval(not), Some(ConstValue::Int(!5)));

    let zero = f.lit("0");
    let lnot = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::LNot, zero, SourceLocation::invalid());
    assert_eq!(f.eval(lnot), Some(ConstValue::Int(1)));
}

#[test]
fn conditional_folds_through_the_taken_branch() {
    let mut f = fixture();
    let cond = f.lit("1");
    let a = f.lit("10");
    let b = f.lit("20");
    let expr = f.sema.act_on_conditional(&mut f.diags, &f.idents, cond, a, b);
    assert_eq!(f.eval(expr), Some(ConstValue::Int(10)));
}

#[test]
fn casts_between_arithmetic_types_fold() {
    let mut f = fixture();
    let value = f.lit("2.9");
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let cast = f.sema.act_on_cast(int_ty, value, Default::default());
    assert_eq!(f.eval(cast), Some(ConstValue::Int(2)), "float-to-int truncates");
}

#[test]
fn enum_constants_fold() {
    let mut f = fixture();
    f.sema.push_scope(ScopeFlags::DECL);
    let name = f.idents.get("E");
    let enum_decl = f.sema.act_on_tag(&mut f.diags, &f.idents, None, Some(name), SourceLocation::invalid(), true);
    f.sema.act_on_start_tag_definition(enum_decl);
    let a_name = f.idents.get("A");
    let a = f.sema.act_on_enum_constant(&mut f.diags, &f.idents, enum_decl, a_name, SourceLocation::invalid(), None, None);
    let b_name = f.idents.get("B");
    let b = f.sema.act_on_enum_constant(
        &mut f.diags,
        &f.idents,
        enum_decl,
        b_name,
        SourceLocation::invalid(),
        None,
        Some(a),
    );
    f.sema.act_on_finish_tag_definition(enum_decl);

    let a_ref = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, a_name, SourceLocation::invalid());
    let b_ref = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, b_name, SourceLocation::invalid());
    assert_eq!(f.eval(a_ref), Some(ConstValue::Int(0)));
    assert_eq!(f.eval(b_ref), Some(ConstValue::Int(1)));
    let _ = b;
    f.sema.pop_scope();
}

#[test]
fn sizeof_folds_for_complete_types() {
    let mut f = fixture();
    let types = &mut f.sema.ctx.types;
    let int_ty = types.builtins.int_ty;
    let arr = types.get_constant_array(int_ty, 10, Default::default(), Qualifiers::empty());
    let ptr = types.get_pointer(int_ty);

    assert_eq!(type_size_in_bytes(&f.sema.ctx, int_ty), Some(4));
    assert_eq!(type_size_in_bytes(&f.sema.ctx, arr), Some(40));
    assert_eq!(type_size_in_bytes(&f.sema.ctx, ptr), Some(8));
    assert_eq!(type_size_in_bytes(&f.sema.ctx, f.sema.ctx.types.builtins.void_ty), None);
    assert_eq!(type_align_in_bytes(&f.sema.ctx, arr), Some(4));
}

#[test]
fn record_layout_respects_alignment() {
    let mut f = fixture();
    f.sema.push_scope(ScopeFlags::DECL);
    let name = f.idents.get("S");
    let record =
        f.sema.act_on_tag(&mut f.diags, &f.idents, Some(TagKind::Struct), Some(name), SourceLocation::invalid(), true);
    f.sema.act_on_start_tag_definition(record);
    let char_ty = f.sema.ctx.types.builtins.char_ty;
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let c = f.idents.get("c");
    let i = f.idents.get("i");
    f.sema.act_on_field(&mut f.diags, &f.idents, record, Some(c), SourceLocation::invalid(), char_ty, None);
    f.sema.act_on_field(&mut f.diags, &f.idents, record, Some(i), SourceLocation::invalid(), int_ty, None);
    f.sema.act_on_finish_tag_definition(record);

    let record_ty = f.sema.tag_type(record);
    // char at 0, int padded to 4..8, total 8 with alignment 4.
    assert_eq!(type_size_in_bytes(&f.sema.ctx, record_ty), Some(8));
    assert_eq!(type_align_in_bytes(&f.sema.ctx, record_ty), Some(4));
    f.sema.pop_scope();
}

#[test]
fn builtin_classify_type_folds() {
    let mut f = fixture();
    let ctx = &f.sema.ctx;
    let int_ty = ctx.types.builtins.int_ty;
    assert_eq!(classify_type_value(ctx, int_ty), 1);
    assert_eq!(classify_type_value(ctx, ctx.types.builtins.char_ty), 2);
    assert_eq!(classify_type_value(ctx, ctx.types.builtins.double_ty), 8);
    assert_eq!(classify_type_value(ctx, ctx.types.builtins.void_ty), 0);

    let ptr = f.sema.ctx.types.get_pointer(int_ty);
    assert_eq!(classify_type_value(&f.sema.ctx, ptr), 5);
    let arr = f.sema.ctx.types.get_constant_array(int_ty, 2, Default::default(), Qualifiers::empty());
    assert_eq!(classify_type_value(&f.sema.ctx, arr), 14);
}

#[test]
fn builtin_constant_p_checks_foldability() {
    let mut f = fixture();
    f.sema.push_scope(ScopeFlags::DECL);
    let name = f.idents.get("__builtin_constant_p");
    let callee = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());
    let arg = f.lit("42");
    let call = f.sema.act_on_call(&mut f.diags, &f.idents, callee, vec![arg], SourceLocation::invalid());
    assert_eq!(f.eval(call), Some(ConstValue::Int(1)));

    // A reference to a plain variable does not fold.
    let var_name = f.idents.get("x");
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    f.sema.act_on_variable_declarator(
        &mut f.diags,
        &f.idents,
        var_name,
        SourceLocation::invalid(),
        int_ty,
        Default::default(),
    );
    let var_ref = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, var_name, SourceLocation::invalid());
    let callee = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());
    let call = f.sema.act_on_call(&mut f.diags, &f.idents, callee, vec![var_ref], SourceLocation::invalid());
    assert_eq!(f.eval(call), Some(ConstValue::Int(0)));
    f.sema.pop_scope();
}

#[test]
fn assignments_never_fold() {
    let mut f = fixture();
    let lhs = f.lit("1");
    let rhs = f.lit("2");
    let expr = f.bin(BinaryOp::Assign, lhs, rhs);
    assert_eq!(f.eval(expr), None);
}
