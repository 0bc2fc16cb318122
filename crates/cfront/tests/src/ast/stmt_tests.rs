use super::*;

use crate::basic::source_location::SourceLocation;
use crate::types::ty::{QualType, TypeId};

fn data() -> ExprData {
    ExprData {
        ty: QualType::unqual(TypeId(0)),
        category: ValueCategory::RValue,
        range: Default::default(),
    }
}

fn literal(
    ast: &mut AstArena,
    value: u64,
) -> ExprId {
    ast.alloc_expr(StmtKind::IntegerLiteral {
        data: data(),
        value,
    })
}

#[test]
fn class_tags_follow_the_kind() {
    let mut ast = AstArena::new();
    let lit = literal(&mut ast, 1);
    assert_eq!(ast.expr(lit).class(), StmtClass::IntegerLiteral);
    assert!(ast.expr(lit).class().is_expr());

    let ret = ast.alloc_stmt(StmtKind::Return {
        value: Some(lit),
        return_loc: SourceLocation::invalid(),
    });
    assert_eq!(ast.stmt(ret).class(), StmtClass::ReturnStmt);
    assert!(!ast.stmt(ret).class().is_expr());
}

#[test]
fn expression_nodes_carry_their_payload() {
    let mut ast = AstArena::new();
    let lit = literal(&mut ast, 42);
    assert_eq!(ast.expr_ty(lit), QualType::unqual(TypeId(0)));
    assert_eq!(ast.expr_category(lit), ValueCategory::RValue);
    assert!(ast.expr(lit).expr_data().is_some());

    let null = ast.alloc_stmt(StmtKind::Null {
        semi_loc: SourceLocation::invalid(),
    });
    assert!(ast.stmt(null).expr_data().is_none());
}

#[test]
fn paren_and_cast_stripping() {
    let mut ast = AstArena::new();
    let lit = literal(&mut ast, 3);
    let paren = ast.alloc_expr(StmtKind::Paren {
        data: data(),
        inner: lit,
    });
    let cast = ast.alloc_expr(StmtKind::ImplicitCast {
        data: data(),
        kind: CastKind::IntegralCast,
        operand: paren,
    });
    let outer = ast.alloc_expr(StmtKind::Paren {
        data: data(),
        inner: cast,
    });

    assert_eq!(ast.ignore_parens(outer), cast);
    assert_eq!(ast.ignore_paren_casts(outer), lit);
    assert_eq!(ast.ignore_paren_casts(lit), lit);
}

#[test]
fn operator_nodes_keep_their_opcode() {
    let mut ast = AstArena::new();
    let lhs = literal(&mut ast, 1);
    let rhs = literal(&mut ast, 2);
    let add = ast.alloc_expr(StmtKind::Binary {
        data: data(),
        op: BinaryOp::Add,
        lhs,
        rhs,
    });
    match &ast.expr(add).kind {
        StmtKind::Binary {
            op, ..
        } => assert_eq!(*op, BinaryOp::Add),
        other => panic!("unexpected node {other:?}"),
    }
    assert!(BinaryOp::AddAssign.is_assignment());
    assert!(!BinaryOp::Add.is_assignment());
    assert!(BinaryOp::Le.is_comparison());
    assert_eq!(BinaryOp::Shl.spelling(), "<<");
    assert_eq!(UnaryOp::Deref.spelling(), "*");
}

#[test]
fn ids_convert_one_way() {
    let mut ast = AstArena::new();
    let lit = literal(&mut ast, 9);
    let as_stmt: StmtId = lit.into();
    assert_eq!(as_stmt.index(), lit.index());
}
