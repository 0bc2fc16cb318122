use super::*;

use crate::basic::diagnostic::SharedDiagnosticBuffer;
use crate::basic::source_location::SourceLocation;
use crate::config::LangOptions;
use crate::decl::decl::StorageClass;
use crate::decl::scope::ScopeFlags;

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

#[test]
fn numeric_literals_classify_by_spelling() {
    let mut f = fixture();
    let b = |f: &Fixture| f.sema.ctx.types.builtins.int_ty;

    let cases: Vec<(&str, QualType)> = vec![
        ("0", b(&f)),
        ("42", f.sema.ctx.types.builtins.int_ty),
        ("0x10", f.sema.ctx.types.builtins.int_ty),
        ("42u", f.sema.ctx.types.builtins.uint_ty),
        ("42l", f.sema.ctx.types.builtins.long_ty),
        ("42ul", f.sema.ctx.types.builtins.ulong_ty),
        ("2147483648", f.sema.ctx.types.builtins.long_ty),
        ("1.5", f.sema.ctx.types.builtins.double_ty),
        ("1.5f", f.sema.ctx.types.builtins.float_ty),
        ("1.5L", f.sema.ctx.types.builtins.long_double_ty),
        ("1e3", f.sema.ctx.types.builtins.double_ty),
    ];
    for (spelling, expected) in cases {
        let expr = f.sema.act_on_numeric_literal(spelling, SourceLocation::invalid());
        assert_eq!(f.sema.ctx.ast.expr_ty(expr), expected, "literal {spelling}");
        assert_eq!(f.sema.ctx.ast.expr_category(expr), ValueCategory::RValue);
    }
}

#[test]
fn literal_values_parse() {
    let mut f = fixture();
    let expr = f.sema.act_on_numeric_literal("0x1F", SourceLocation::invalid());
    match f.sema.ctx.ast.expr(expr).kind {
        StmtKind::IntegerLiteral {
            value, ..
        } => assert_eq!(value, 31),
        _ => panic!("expected an integer literal"),
    }
    let expr = f.sema.act_on_numeric_literal("010", SourceLocation::invalid());
    match f.sema.ctx.ast.expr(expr).kind {
        StmtKind::IntegerLiteral {
            value, ..
        } => assert_eq!(value, 8, "leading zero means octal"),
        _ => panic!("expected an integer literal"),
    }
}

#[test]
fn string_literals_are_char_array_lvalues() {
    let mut f = fixture();
    let expr = f.sema.act_on_string_literal("\"hi\"", SourceLocation::invalid());
    let ty = f.sema.ctx.ast.expr_ty(expr);
    assert!(f.sema.ctx.types.is_array_type(ty));
    match f.sema.ctx.types.canonical_kind(ty) {
        TypeKind::ConstantArray {
            size, ..
        } => assert_eq!(*size, 3, "two characters plus the terminator"),
        other => panic!("unexpected type {other:?}"),
    }
    assert_eq!(f.sema.ctx.ast.expr_category(expr), ValueCategory::LValue);
}

#[test]
fn char_literals_unescape_and_have_type_int() {
    let mut f = fixture();
    let expr = f.sema.act_on_char_literal("'\\n'", SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.int_ty);
    match f.sema.ctx.ast.expr(expr).kind {
        StmtKind::CharacterLiteral {
            value, ..
        } => assert_eq!(value, b'\n' as u32),
        _ => panic!("expected a character literal"),
    }
}

#[test]
fn undeclared_identifiers_recover_with_a_sentinel() {
    let mut f = fixture();
    let name = f.idents.get("mystery");
    f.sema.push_scope(ScopeFlags::DECL);
    let expr = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());
    // Well-formed recovery expression; the error is on the diagnostic side.
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.int_ty);
    assert!(f.buffer.diagnostics().iter().any(|d| d.message() == "use of undeclared identifier 'mystery'"));
    f.sema.pop_scope();
}

#[test]
fn decl_refs_are_lvalues_of_the_decl_type() {
    let mut f = fixture();
    let name = f.idents.get("x");
    let double_ty = f.sema.ctx.types.builtins.double_ty;
    f.sema.push_scope(ScopeFlags::DECL);
    let decl = f.sema.act_on_variable_declarator(
        &mut f.diags,
        &f.idents,
        name,
        SourceLocation::invalid(),
        double_ty,
        StorageClass::None,
    );
    let expr = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), double_ty);
    assert_eq!(f.sema.ctx.ast.expr_category(expr), ValueCategory::LValue);
    match f.sema.ctx.ast.expr(expr).kind {
        StmtKind::DeclRef {
            decl: referenced, ..
        } => assert_eq!(referenced, decl),
        _ => panic!("expected a decl reference"),
    }
    f.sema.pop_scope();
}

#[test]
fn builtins_declare_themselves() {
    let mut f = fixture();
    let name = f.idents.get("__builtin_classify_type");
    f.sema.push_scope(ScopeFlags::DECL);
    let expr = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());
    assert!(f.buffer.is_empty(), "builtins exist implicitly");
    assert!(matches!(f.sema.ctx.ast.expr(expr).kind, StmtKind::DeclRef { .. }));
    f.sema.pop_scope();
}

#[test]
fn assignment_to_an_rvalue_is_diagnosed() {
    let mut f = fixture();
    let lhs = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    let rhs = f.sema.act_on_numeric_literal("2", SourceLocation::invalid());
    f.sema.act_on_binary_op(&mut f.diags, &f.idents, BinaryOp::Assign, lhs, rhs, SourceLocation::invalid());
    assert!(f.buffer.diagnostics().iter().any(|d| d.message().contains("not assignable")));
}

#[test]
fn arithmetic_results_use_the_common_type() {
    let mut f = fixture();
    let lhs = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    let rhs = f.sema.act_on_numeric_literal("2.0", SourceLocation::invalid());
    let expr = f.sema.act_on_binary_op(&mut f.diags, &f.idents, BinaryOp::Add, lhs, rhs, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.double_ty);

    let lhs = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    let rhs = f.sema.act_on_numeric_literal("2", SourceLocation::invalid());
    let cmp = f.sema.act_on_binary_op(&mut f.diags, &f.idents, BinaryOp::Lt, lhs, rhs, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(cmp), f.sema.ctx.types.builtins.int_ty);
}

#[test]
fn comma_takes_the_right_operand_type() {
    let mut f = fixture();
    let lhs = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    let rhs = f.sema.act_on_numeric_literal("2.0", SourceLocation::invalid());
    let expr = f.sema.act_on_binary_op(&mut f.diags, &f.idents, BinaryOp::Comma, lhs, rhs, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.double_ty);
}

#[test]
fn conditional_merges_arithmetic_branches() {
    let mut f = fixture();
    let cond = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    let a = f.sema.act_on_numeric_literal("2", SourceLocation::invalid());
    let b = f.sema.act_on_numeric_literal("3.0", SourceLocation::invalid());
    let expr = f.sema.act_on_conditional(&mut f.diags, &f.idents, cond, a, b);
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.double_ty);
}

#[test]
fn sizeof_yields_unsigned_long() {
    let mut f = fixture();
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let expr = f.sema.act_on_sizeof_alignof_type(
        &mut f.diags,
        &f.idents,
        true,
        int_ty,
        SourceLocation::invalid(),
        Default::default(),
    );
    assert_eq!(f.sema.ctx.ast.expr_ty(expr), f.sema.ctx.types.builtins.ulong_ty);
    assert!(f.buffer.is_empty());

    let void_ty = f.sema.ctx.types.builtins.void_ty;
    f.sema.act_on_sizeof_alignof_type(
        &mut f.diags,
        &f.idents,
        true,
        void_ty,
        SourceLocation::invalid(),
        Default::default(),
    );
    assert!(f.buffer.diagnostics().iter().any(|d| d.message().contains("incomplete type")));
}

#[test]
fn unary_operators_type_check() {
    let mut f = fixture();
    let name = f.idents.get("p");
    let int_ty = f.sema.ctx.types.builtins.int_ty;
    let ptr_ty = f.sema.ctx.types.get_pointer(int_ty);

    f.sema.push_scope(ScopeFlags::DECL);
    f.sema.act_on_variable_declarator(
        &mut f.diags,
        &f.idents,
        name,
        SourceLocation::invalid(),
        ptr_ty,
        StorageClass::None,
    );
    let p = f.sema.act_on_identifier_expr(&mut f.diags, &f.idents, name, SourceLocation::invalid());

    let deref = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::Deref, p, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(deref), int_ty);
    assert_eq!(f.sema.ctx.ast.expr_category(deref), ValueCategory::LValue);

    let addr = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::AddrOf, deref, SourceLocation::invalid());
    assert!(f.sema.ctx.types.is_pointer_type(f.sema.ctx.ast.expr_ty(addr)));

    let lnot = f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::LNot, p, SourceLocation::invalid());
    assert_eq!(f.sema.ctx.ast.expr_ty(lnot), int_ty);
    assert!(f.buffer.is_empty());

    // Dereferencing a non-pointer complains.
    let one = f.sema.act_on_numeric_literal("1", SourceLocation::invalid());
    f.sema.act_on_unary_op(&mut f.diags, &f.idents, UnaryOp::Deref, one, SourceLocation::invalid());
    assert!(f.buffer.diagnostics().iter().any(|d| d.message().contains("indirection requires pointer")));
    f.sema.pop_scope();
}

#[test]
fn escape_sequences_translate() {
    assert_eq!(unescape("a\\nb"), b"a\nb".to_vec());
    assert_eq!(unescape("\\t\\0\\\\"), vec![b'\t', 0, b'\\']);
    assert_eq!(unescape("\\\"x\\\""), b"\"x\"".to_vec());
}
