//! Constant expression evaluation.
//!
//! A restricted evaluator over the expression tree: integer and floating
//! arithmetic, comparisons, unary operators, the conditional operator,
//! casts between arithmetic types, `sizeof`/`alignof` of complete types,
//! and literal folding. Failure is silent: a `None` simply means the
//! expression is not a constant.

use crate::ast::context::AstContext;
use crate::ast::stmt::{BinaryOp, ExprId, StmtKind, UnaryOp};
use crate::basic::ident::IdentifierTable;
use crate::decl::decl::{DeclKind, TagKind};
use crate::types::ty::{BuiltinKind, QualType, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
}

impl ConstValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(*v),
            ConstValue::Float(_) => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            ConstValue::Int(v) => *v != 0,
            ConstValue::Float(v) => *v != 0.0,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            ConstValue::Int(v) => *v as f64,
            ConstValue::Float(v) => *v,
        }
    }
}

pub fn evaluate(
    ctx: &AstContext,
    idents: &IdentifierTable,
    expr: ExprId,
) -> Option<ConstValue> {
    match &ctx.ast.expr(expr).kind {
        StmtKind::IntegerLiteral {
            value, ..
        } => Some(ConstValue::Int(*value as i64)),
        StmtKind::FloatingLiteral {
            value, ..
        } => Some(ConstValue::Float(*value)),
        StmtKind::CharacterLiteral {
            value, ..
        } => Some(ConstValue::Int(*value as i64)),
        StmtKind::Paren {
            inner, ..
        } => evaluate(ctx, idents, *inner),
        StmtKind::DeclRef {
            decl, ..
        } => match ctx.decls.decl(*decl).kind {
            DeclKind::EnumConstant {
                value, ..
            } => Some(ConstValue::Int(value)),
            _ => None,
        },
        StmtKind::Unary {
            op,
            operand,
            ..
        } => evaluate_unary(ctx, idents, *op, *operand),
        StmtKind::SizeOfAlignOfType {
            is_sizeof,
            operand_ty,
            ..
        } => {
            let value = if *is_sizeof {
                type_size_in_bytes(ctx, *operand_ty)?
            } else {
                type_align_in_bytes(ctx, *operand_ty)?
            };
            Some(ConstValue::Int(value as i64))
        },
        StmtKind::Binary {
            op,
            lhs,
            rhs,
            ..
        } => evaluate_binary(ctx, idents, *op, *lhs, *rhs),
        StmtKind::Conditional {
            cond,
            then_expr,
            else_expr,
            ..
        } => {
            let cond = evaluate(ctx, idents, *cond)?;
            if cond.as_bool() {
                evaluate(ctx, idents, *then_expr)
            } else {
                evaluate(ctx, idents, *else_expr)
            }
        },
        StmtKind::ImplicitCast {
            data,
            operand,
            ..
        }
        | StmtKind::CStyleCast {
            data,
            operand,
        } => {
            if !ctx.types.is_arithmetic_type(data.ty) {
                return None;
            }
            let value = evaluate(ctx, idents, *operand)?;
            Some(convert_value(ctx, value, data.ty))
        },
        StmtKind::Call {
            callee,
            args,
            ..
        } => evaluate_builtin_call(ctx, idents, *callee, args),
        _ => None,
    }
}

fn evaluate_unary(
    ctx: &AstContext,
    idents: &IdentifierTable,
    op: UnaryOp,
    operand: ExprId,
) -> Option<ConstValue> {
    match op {
        UnaryOp::Plus => evaluate(ctx, idents, operand),
        UnaryOp::Minus => match evaluate(ctx, idents, operand)? {
            ConstValue::Int(v) => Some(ConstValue::Int(v.checked_neg()?)),
            ConstValue::Float(v) => Some(ConstValue::Float(-v)),
        },
        UnaryOp::Not => match evaluate(ctx, idents, operand)? {
            ConstValue::Int(v) => Some(ConstValue::Int(!v)),
            ConstValue::Float(_) => None,
        },
        UnaryOp::LNot => {
            let value = evaluate(ctx, idents, operand)?;
            Some(ConstValue::Int(!value.as_bool() as i64))
        },
        UnaryOp::SizeOf => {
            let ty = ctx.ast.expr_ty(operand);
            Some(ConstValue::Int(type_size_in_bytes(ctx, ty)? as i64))
        },
        UnaryOp::AlignOf => {
            let ty = ctx.ast.expr_ty(operand);
            Some(ConstValue::Int(type_align_in_bytes(ctx, ty)? as i64))
        },
        UnaryOp::Extension => evaluate(ctx, idents, operand),
        _ => None,
    }
}

fn evaluate_binary(
    ctx: &AstContext,
    idents: &IdentifierTable,
    op: BinaryOp,
    lhs: ExprId,
    rhs: ExprId,
) -> Option<ConstValue> {
    // Short-circuit forms decide from the left operand alone when they can.
    if op == BinaryOp::LAnd || op == BinaryOp::LOr {
        let lhs = evaluate(ctx, idents, lhs)?;
        return match (op, lhs.as_bool()) {
            (BinaryOp::LAnd, false) => Some(ConstValue::Int(0)),
            (BinaryOp::LOr, true) => Some(ConstValue::Int(1)),
            _ => {
                let rhs = evaluate(ctx, idents, rhs)?;
                Some(ConstValue::Int(rhs.as_bool() as i64))
            },
        };
    }
    if op == BinaryOp::Comma {
        evaluate(ctx, idents, lhs)?;
        return evaluate(ctx, idents, rhs);
    }
    if op.is_assignment() {
        return None;
    }

    let lhs = evaluate(ctx, idents, lhs)?;
    let rhs = evaluate(ctx, idents, rhs)?;

    if let (ConstValue::Int(a), ConstValue::Int(b)) = (lhs, rhs) {
        return match op {
            BinaryOp::Mul => Some(ConstValue::Int(a.checked_mul(b)?)),
            BinaryOp::Div => Some(ConstValue::Int(a.checked_div(b)?)),
            BinaryOp::Rem => Some(ConstValue::Int(a.checked_rem(b)?)),
            BinaryOp::Add => Some(ConstValue::Int(a.checked_add(b)?)),
            BinaryOp::Sub => Some(ConstValue::Int(a.checked_sub(b)?)),
            BinaryOp::Shl => Some(ConstValue::Int(a.checked_shl(u32::try_from(b).ok()?)?)),
            BinaryOp::Shr => Some(ConstValue::Int(a.checked_shr(u32::try_from(b).ok()?)?)),
            BinaryOp::And => Some(ConstValue::Int(a & b)),
            BinaryOp::Xor => Some(ConstValue::Int(a ^ b)),
            BinaryOp::Or => Some(ConstValue::Int(a | b)),
            BinaryOp::Lt => Some(ConstValue::Int((a < b) as i64)),
            BinaryOp::Gt => Some(ConstValue::Int((a > b) as i64)),
            BinaryOp::Le => Some(ConstValue::Int((a <= b) as i64)),
            BinaryOp::Ge => Some(ConstValue::Int((a >= b) as i64)),
            BinaryOp::Eq => Some(ConstValue::Int((a == b) as i64)),
            BinaryOp::Ne => Some(ConstValue::Int((a != b) as i64)),
            _ => None,
        };
    }

    // Mixed or floating arithmetic folds in double.
    let a = lhs.as_f64();
    let b = rhs.as_f64();
    match op {
        BinaryOp::Mul => Some(ConstValue::Float(a * b)),
        BinaryOp::Div => Some(ConstValue::Float(a / b)),
        BinaryOp::Add => Some(ConstValue::Float(a + b)),
        BinaryOp::Sub => Some(ConstValue::Float(a - b)),
        BinaryOp::Lt => Some(ConstValue::Int((a < b) as i64)),
        BinaryOp::Gt => Some(ConstValue::Int((a > b) as i64)),
        BinaryOp::Le => Some(ConstValue::Int((a <= b) as i64)),
        BinaryOp::Ge => Some(ConstValue::Int((a >= b) as i64)),
        BinaryOp::Eq => Some(ConstValue::Int((a == b) as i64)),
        BinaryOp::Ne => Some(ConstValue::Int((a != b) as i64)),
        _ => None,
    }
}

fn convert_value(
    ctx: &AstContext,
    value: ConstValue,
    to: QualType,
) -> ConstValue {
    if ctx.types.is_integer_type(to) {
        return ConstValue::Int(match value {
            ConstValue::Int(v) => v,
            ConstValue::Float(v) => v as i64,
        });
    }
    ConstValue::Float(value.as_f64())
}

/// `__builtin_classify_type` and `__builtin_constant_p` fold here; any
/// other call is not a constant.
fn evaluate_builtin_call(
    ctx: &AstContext,
    idents: &IdentifierTable,
    callee: ExprId,
    args: &[ExprId],
) -> Option<ConstValue> {
    let callee = ctx.ast.ignore_paren_casts(callee);
    let StmtKind::DeclRef {
        decl, ..
    } = ctx.ast.expr(callee).kind
    else {
        return None;
    };
    let name = ctx.decls.decl(decl).ident()?;

    match idents.spelling(name) {
        "__builtin_classify_type" => {
            let arg = args.first()?;
            Some(ConstValue::Int(classify_type_value(ctx, ctx.ast.expr_ty(*arg))))
        },
        "__builtin_constant_p" => {
            let arg = args.first()?;
            Some(ConstValue::Int(evaluate(ctx, idents, *arg).is_some() as i64))
        },
        _ => None,
    }
}

/// The classification codes `__builtin_classify_type` returns.
pub fn classify_type_value(
    ctx: &AstContext,
    ty: QualType,
) -> i64 {
    match ctx.types.canonical_kind(ty) {
        TypeKind::Builtin(BuiltinKind::Void) => 0,
        TypeKind::Builtin(BuiltinKind::Bool) => 4,
        TypeKind::Builtin(BuiltinKind::Char) | TypeKind::Builtin(BuiltinKind::SChar)
        | TypeKind::Builtin(BuiltinKind::UChar) => 2,
        TypeKind::Builtin(kind) if kind.is_integer() => 1,
        TypeKind::Builtin(kind) if kind.is_floating() => 8,
        TypeKind::Builtin(_) => 5,
        TypeKind::Enum { .. } => 3,
        TypeKind::Pointer { .. } | TypeKind::BlockPointer { .. } => 5,
        TypeKind::Reference { .. } => 6,
        TypeKind::Complex { .. } => 9,
        TypeKind::FunctionProto { .. } | TypeKind::FunctionNoProto { .. } => 10,
        TypeKind::Record {
            decl,
        } => match ctx.decls.tag_kind(*decl) {
            Some(TagKind::Union) => 13,
            _ => 12,
        },
        TypeKind::ConstantArray { .. }
        | TypeKind::IncompleteArray { .. }
        | TypeKind::VariableArray { .. }
        | TypeKind::DependentSizedArray { .. } => 14,
        _ => -1,
    }
}

// The LP64 target model used for folding.
const POINTER_SIZE: u64 = 8;

pub fn type_size_in_bytes(
    ctx: &AstContext,
    ty: QualType,
) -> Option<u64> {
    match ctx.types.canonical_kind(ty) {
        TypeKind::Builtin(kind) => builtin_size(*kind),
        TypeKind::Complex {
            element,
        } => Some(type_size_in_bytes(ctx, *element)? * 2),
        TypeKind::Pointer { .. }
        | TypeKind::BlockPointer { .. }
        | TypeKind::Reference { .. }
        | TypeKind::MemberPointer { .. }
        | TypeKind::ObjCQualifiedId { .. } => Some(POINTER_SIZE),
        TypeKind::ConstantArray {
            element,
            size,
            ..
        } => Some(type_size_in_bytes(ctx, *element)? * size),
        TypeKind::Vector {
            element,
            num_elements,
        }
        | TypeKind::ExtVector {
            element,
            num_elements,
        } => Some(type_size_in_bytes(ctx, *element)? * *num_elements as u64),
        TypeKind::Enum {
            decl,
        } => {
            if ctx.decls.tag_is_defined(*decl) {
                Some(4)
            } else {
                None
            }
        },
        TypeKind::Record {
            decl,
        } => {
            let definition = ctx.decls.definition(*decl)?;
            let (fields, tag_kind) = match &ctx.decls.decl(definition).kind {
                DeclKind::Record {
                    fields,
                    tag_kind,
                    ..
                } => (fields, *tag_kind),
                _ => return None,
            };
            let mut size: u64 = 0;
            let mut align: u64 = 1;
            for &field in fields {
                let field_ty = match ctx.decls.decl(field).kind {
                    DeclKind::Field {
                        ty, ..
                    } => ty,
                    _ => continue,
                };
                let field_size = type_size_in_bytes(ctx, field_ty)?;
                let field_align = type_align_in_bytes(ctx, field_ty)?;
                align = align.max(field_align);
                if tag_kind == TagKind::Union {
                    size = size.max(field_size);
                } else {
                    size = size.div_ceil(field_align) * field_align;
                    size += field_size;
                }
            }
            Some(size.div_ceil(align).max(1) * align)
        },
        _ => None,
    }
}

pub fn type_align_in_bytes(
    ctx: &AstContext,
    ty: QualType,
) -> Option<u64> {
    match ctx.types.canonical_kind(ty) {
        TypeKind::Builtin(kind) => builtin_size(*kind),
        TypeKind::Complex {
            element,
        } => type_align_in_bytes(ctx, *element),
        TypeKind::Pointer { .. } | TypeKind::BlockPointer { .. } | TypeKind::Reference { .. } => Some(POINTER_SIZE),
        TypeKind::ConstantArray {
            element, ..
        }
        | TypeKind::IncompleteArray {
            element, ..
        } => type_align_in_bytes(ctx, *element),
        TypeKind::Enum { .. } => Some(4),
        TypeKind::Record {
            decl,
        } => {
            let definition = ctx.decls.definition(*decl)?;
            let fields = match &ctx.decls.decl(definition).kind {
                DeclKind::Record {
                    fields, ..
                } => fields,
                _ => return None,
            };
            let mut align: u64 = 1;
            for &field in fields {
                if let DeclKind::Field {
                    ty, ..
                } = ctx.decls.decl(field).kind
                {
                    align = align.max(type_align_in_bytes(ctx, ty)?);
                }
            }
            Some(align)
        },
        _ => None,
    }
}

fn builtin_size(kind: BuiltinKind) -> Option<u64> {
    Some(match kind {
        BuiltinKind::Void => return None,
        BuiltinKind::Bool | BuiltinKind::Char | BuiltinKind::SChar | BuiltinKind::UChar => 1,
        BuiltinKind::Short | BuiltinKind::UShort => 2,
        BuiltinKind::Int | BuiltinKind::UInt | BuiltinKind::WChar => 4,
        BuiltinKind::Long | BuiltinKind::ULong | BuiltinKind::LongLong | BuiltinKind::ULongLong => 8,
        BuiltinKind::Float => 4,
        BuiltinKind::Double => 8,
        BuiltinKind::LongDouble => 16,
        BuiltinKind::ObjCId | BuiltinKind::ObjCSel => POINTER_SIZE,
    })
}

#[cfg(test)]
#[path = "../../tests/src/sema/const_eval_tests.rs"]
mod tests;
