//! Expression actions.
//!
//! Each action type-checks one syntactic form, applies the implicit
//! conversions its context requires, and returns a well-formed expression
//! node. On a semantic error a diagnostic is emitted and a recovery node is
//! returned so parsing can continue.

use crate::ast::stmt::{BinaryOp, CastKind, ExprData, ExprId, StmtKind, UnaryOp, ValueCategory};
use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::ident::{IdentId, IdentifierTable};
use crate::basic::source_location::{SourceLocation, SourceRange};
use crate::decl::decl::{DeclId, DeclKind, DeclName, IdentifierNamespace};
use crate::decl::lookup::LookupKind;
use crate::sema::overload::{self, OverloadResult};
use crate::sema::Sema;
use crate::types::ty::{QualType, TypeKind};

impl Sema {
    /// Recovery expression: well-formed, type int, standing in for a
    /// region that failed to check.
    pub fn error_expr(
        &mut self,
        loc: SourceLocation,
    ) -> ExprId {
        let int_ty = self.ctx.types.builtins.int_ty;
        self.ctx.ast.alloc_expr(StmtKind::IntegerLiteral {
            data: ExprData {
                ty: int_ty,
                category: ValueCategory::RValue,
                range: SourceRange::at(loc),
            },
            value: 0,
        })
    }

    // ── literals ────────────────────────────────────────────────────────

    /// Integer and floating constants, classified by spelling.
    pub fn act_on_numeric_literal(
        &mut self,
        spelling: &str,
        loc: SourceLocation,
    ) -> ExprId {
        let range = SourceRange::at(loc);
        let is_float = spelling.contains('.')
            || (!spelling.starts_with("0x") && !spelling.starts_with("0X") && spelling.contains(['e', 'E']));

        if is_float {
            let trimmed = spelling.trim_end_matches(['f', 'F', 'l', 'L']);
            let value: f64 = trimmed.parse().unwrap_or(0.0);
            let ty = if spelling.ends_with(['f', 'F']) {
                self.ctx.types.builtins.float_ty
            } else if spelling.ends_with(['l', 'L']) {
                self.ctx.types.builtins.long_double_ty
            } else {
                self.ctx.types.builtins.double_ty
            };
            return self.ctx.ast.alloc_expr(StmtKind::FloatingLiteral {
                data: ExprData {
                    ty,
                    category: ValueCategory::RValue,
                    range,
                },
                value,
            });
        }

        let suffix_start = spelling.find(['u', 'U', 'l', 'L']).filter(|&i| {
            // Hex digits may contain no suffix letters other than these,
            // but `0x1L` keeps the L as suffix while `0xA` keeps the A.
            !(spelling.starts_with("0x") || spelling.starts_with("0X")) || i > 1
        });
        let (digits, suffix) = match suffix_start {
            Some(i) => spelling.split_at(i),
            None => (spelling, ""),
        };
        let is_unsigned_suffix = suffix.contains(['u', 'U']);
        let is_long_suffix = suffix.contains(['l', 'L']);

        let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).unwrap_or(0)
        } else if digits.len() > 1 && digits.starts_with('0') {
            u64::from_str_radix(&digits[1..], 8).unwrap_or(0)
        } else {
            digits.parse().unwrap_or(0)
        };

        let builtins = &self.ctx.types.builtins;
        let ty = match (is_unsigned_suffix, is_long_suffix) {
            (true, true) => builtins.ulong_ty,
            (true, false) => {
                if value <= u32::MAX as u64 {
                    builtins.uint_ty
                } else {
                    builtins.ulong_ty
                }
            },
            (false, true) => builtins.long_ty,
            (false, false) => {
                if value <= i32::MAX as u64 {
                    builtins.int_ty
                } else if value <= i64::MAX as u64 {
                    builtins.long_ty
                } else {
                    builtins.ulonglong_ty
                }
            },
        };

        self.ctx.ast.alloc_expr(StmtKind::IntegerLiteral {
            data: ExprData {
                ty,
                category: ValueCategory::RValue,
                range,
            },
            value,
        })
    }

    pub fn act_on_char_literal(
        &mut self,
        spelling: &str,
        loc: SourceLocation,
    ) -> ExprId {
        let inner = spelling.trim_matches('\'');
        let value = unescape(inner).first().copied().unwrap_or(0) as u32;
        // Character constants have type int in C.
        let int_ty = self.ctx.types.builtins.int_ty;
        self.ctx.ast.alloc_expr(StmtKind::CharacterLiteral {
            data: ExprData {
                ty: int_ty,
                category: ValueCategory::RValue,
                range: SourceRange::at(loc),
            },
            value,
        })
    }

    pub fn act_on_string_literal(
        &mut self,
        spelling: &str,
        loc: SourceLocation,
    ) -> ExprId {
        let inner = spelling.trim_start_matches('L').trim_matches('"');
        let mut bytes = unescape(inner);
        bytes.push(0);
        let char_ty = self.ctx.types.builtins.char_ty;
        let ty = self.ctx.types.get_constant_array(char_ty, bytes.len() as u64, Default::default(), Default::default());
        // Remove the terminator from the stored data; the type carries it.
        bytes.pop();
        self.ctx.ast.alloc_expr(StmtKind::StringLiteral {
            data: ExprData {
                ty,
                category: ValueCategory::LValue,
                range: SourceRange::at(loc),
            },
            bytes,
        })
    }

    // ── names ───────────────────────────────────────────────────────────

    pub fn act_on_identifier_expr(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        name: IdentId,
        loc: SourceLocation,
    ) -> ExprId {
        let decl_name = DeclName::Ident(name);
        let found = self.resolver.lookup(decl_name, LookupKind::Ordinary, &self.ctx.decls);

        let Some(decl) = found.or_else(|| self.implicitly_declare_builtin(idents, name, loc)) else {
            diags.report(loc, DiagCode::ErrUndeclaredIdentifier).arg_identifier(idents.spelling(name));
            return self.error_expr(loc);
        };

        self.build_decl_ref(diags, idents, decl, loc)
    }

    pub(crate) fn build_decl_ref(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        decl: DeclId,
        loc: SourceLocation,
    ) -> ExprId {
        let (ty, category) = match self.ctx.decls.decl(decl).kind {
            DeclKind::Var {
                ty, ..
            }
            | DeclKind::Parm {
                ty,
            }
            | DeclKind::Field {
                ty, ..
            } => (ty, ValueCategory::LValue),
            DeclKind::Function {
                ty, ..
            } => (ty, ValueCategory::LValue),
            DeclKind::EnumConstant {
                ty, ..
            } => (ty, ValueCategory::RValue),
            _ => {
                diags.report(loc, DiagCode::ErrExpectedExpression);
                let _ = idents;
                return self.error_expr(loc);
            },
        };

        // References are transparent: a use of a reference variable has the
        // referent's type and is an lvalue.
        let (ty, category) = if self.ctx.types.is_reference_type(ty) {
            (self.ctx.types.non_reference_type(ty), ValueCategory::LValue)
        } else {
            (ty, category)
        };

        self.ctx.ast.alloc_expr(StmtKind::DeclRef {
            data: ExprData {
                ty,
                category,
                range: SourceRange::at(loc),
            },
            decl,
        })
    }

    /// Well-known `__builtin_*` functions are declared on first use.
    fn implicitly_declare_builtin(
        &mut self,
        idents: &IdentifierTable,
        name: IdentId,
        loc: SourceLocation,
    ) -> Option<DeclId> {
        let spelling = idents.spelling(name);
        if !matches!(spelling, "__builtin_classify_type" | "__builtin_constant_p") {
            return None;
        }
        let int_ty = self.ctx.types.builtins.int_ty;
        let fn_ty = self.ctx.types.get_function_no_proto(int_ty);
        let tu = self.translation_unit();
        let decl = self.ctx.decls.create(
            DeclKind::Function {
                ty: fn_ty,
                storage: Default::default(),
                is_inline: false,
                params: Vec::new(),
                body: None,
            },
            Some(DeclName::Ident(name)),
            loc,
            Some(tu),
            Some(tu),
        );
        self.resolver.push_decl(DeclName::Ident(name), decl);
        self.scopes.add_decl(DeclName::Ident(name), decl);
        Some(decl)
    }

    pub fn act_on_paren_expr(
        &mut self,
        inner: ExprId,
        range: SourceRange,
    ) -> ExprId {
        let data = *self.ctx.ast.expr_data(inner);
        self.ctx.ast.alloc_expr(StmtKind::Paren {
            data: ExprData {
                range,
                ..data
            },
            inner,
        })
    }

    // ── operators ───────────────────────────────────────────────────────

    pub fn act_on_unary_op(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        op: UnaryOp,
        operand: ExprId,
        op_loc: SourceLocation,
    ) -> ExprId {
        let operand_range = self.ctx.ast.expr_range(operand);
        let range = SourceRange::new(op_loc, operand_range.end);

        let (operand, ty, category) = match op {
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                let ty = self.ctx.ast.expr_ty(operand);
                self.require_modifiable_lvalue(diags, idents, operand);
                (operand, ty.without_quals(), ValueCategory::RValue)
            },
            UnaryOp::AddrOf => {
                if self.ctx.ast.expr_category(operand) != ValueCategory::LValue {
                    diags.report(op_loc, DiagCode::ErrAddrOfRvalue).range(operand_range);
                }
                let pointee = self.ctx.ast.expr_ty(operand);
                let ty = self.ctx.types.get_pointer(pointee);
                (operand, ty, ValueCategory::RValue)
            },
            UnaryOp::Deref => {
                let operand = self.default_function_array_conversion(operand);
                let ty = self.ctx.ast.expr_ty(operand);
                match self.ctx.types.pointee_type(ty) {
                    Some(pointee) => (operand, pointee, ValueCategory::LValue),
                    None => {
                        let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
                        diags
                            .report(op_loc, DiagCode::ErrIndirectionRequiresPointer)
                            .arg_qualtype(printed)
                            .range(operand_range);
                        let int_ty = self.ctx.types.builtins.int_ty;
                        (operand, int_ty, ValueCategory::LValue)
                    },
                }
            },
            UnaryOp::Plus | UnaryOp::Minus => {
                let ty = self.ctx.ast.expr_ty(operand);
                if !self.ctx.types.is_arithmetic_type(ty) {
                    let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
                    diags
                        .report(op_loc, DiagCode::ErrInvalidOperands)
                        .arg_qualtype(printed.clone())
                        .arg_qualtype(printed);
                }
                let operand = self.promote_integer(operand);
                let ty = self.ctx.ast.expr_ty(operand);
                (operand, ty, ValueCategory::RValue)
            },
            UnaryOp::Not => {
                let operand = self.promote_integer(operand);
                let ty = self.ctx.ast.expr_ty(operand);
                (operand, ty, ValueCategory::RValue)
            },
            UnaryOp::LNot => {
                let operand = self.check_condition(diags, idents, operand);
                (operand, self.ctx.types.builtins.int_ty, ValueCategory::RValue)
            },
            UnaryOp::SizeOf | UnaryOp::AlignOf => {
                let ty = self.ctx.ast.expr_ty(operand);
                if self.ctx.types.is_incomplete_type(ty, &self.ctx.decls) {
                    let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
                    diags
                        .report(op_loc, DiagCode::ErrSizeofIncomplete)
                        .arg_str(op.spelling())
                        .arg_qualtype(printed);
                }
                (operand, self.ctx.types.builtins.ulong_ty, ValueCategory::RValue)
            },
            UnaryOp::Real | UnaryOp::Imag => {
                let ty = self.ctx.ast.expr_ty(operand);
                let element = match self.ctx.types.canonical_kind(ty) {
                    TypeKind::Complex {
                        element,
                    } => *element,
                    _ => ty,
                };
                (operand, element, ValueCategory::LValue)
            },
            UnaryOp::Extension => {
                let data = *self.ctx.ast.expr_data(operand);
                (operand, data.ty, data.category)
            },
        };

        self.ctx.ast.alloc_expr(StmtKind::Unary {
            data: ExprData {
                ty,
                category,
                range,
            },
            op,
            operand,
        })
    }

    pub fn act_on_binary_op(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        op_loc: SourceLocation,
    ) -> ExprId {
        let range = SourceRange::new(self.ctx.ast.expr_range(lhs).begin, self.ctx.ast.expr_range(rhs).end);
        let int_ty = self.ctx.types.builtins.int_ty;

        let (lhs, rhs, ty) = if op == BinaryOp::Assign {
            let lhs_ty = self.ctx.ast.expr_ty(lhs);
            self.require_modifiable_lvalue(diags, idents, lhs);
            let rhs = self.convert_for_assignment(diags, idents, rhs, lhs_ty.without_quals());
            (lhs, rhs, lhs_ty.without_quals())
        } else if op.is_assignment() {
            // Compound assignment: the computation happens in the common
            // type but the result is the left operand's type.
            let lhs_ty = self.ctx.ast.expr_ty(lhs);
            self.require_modifiable_lvalue(diags, idents, lhs);
            let rhs = self.default_function_array_conversion(rhs);
            self.check_arithmetic_operands(diags, idents, op, lhs, rhs, op_loc);
            (lhs, rhs, lhs_ty.without_quals())
        } else {
            match op {
                BinaryOp::Add | BinaryOp::Sub => {
                    let lhs = self.default_function_array_conversion(lhs);
                    let rhs = self.default_function_array_conversion(rhs);
                    let lhs_ty = self.ctx.ast.expr_ty(lhs);
                    let rhs_ty = self.ctx.ast.expr_ty(rhs);
                    let lhs_ptr = self.ctx.types.is_pointer_type(lhs_ty);
                    let rhs_ptr = self.ctx.types.is_pointer_type(rhs_ty);
                    match (lhs_ptr, rhs_ptr) {
                        (true, false) if self.ctx.types.is_integer_type(rhs_ty) => (lhs, rhs, lhs_ty),
                        (false, true) if op == BinaryOp::Add && self.ctx.types.is_integer_type(lhs_ty) => {
                            (lhs, rhs, rhs_ty)
                        },
                        (true, true) if op == BinaryOp::Sub => {
                            let long_ty = self.ctx.types.builtins.long_ty;
                            (lhs, rhs, long_ty)
                        },
                        (false, false)
                            if self.ctx.types.is_arithmetic_type(lhs_ty)
                                && self.ctx.types.is_arithmetic_type(rhs_ty) =>
                        {
                            self.usual_arithmetic_conversions(lhs, rhs)
                        },
                        _ => {
                            self.invalid_operands(diags, idents, op_loc, lhs, rhs);
                            (lhs, rhs, int_ty)
                        },
                    }
                },
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                    let lhs_ty = self.ctx.ast.expr_ty(lhs);
                    let rhs_ty = self.ctx.ast.expr_ty(rhs);
                    let integral_only = op == BinaryOp::Rem;
                    let ok = if integral_only {
                        self.ctx.types.is_integer_type(lhs_ty) && self.ctx.types.is_integer_type(rhs_ty)
                    } else {
                        self.ctx.types.is_arithmetic_type(lhs_ty) && self.ctx.types.is_arithmetic_type(rhs_ty)
                    };
                    if !ok {
                        self.invalid_operands(diags, idents, op_loc, lhs, rhs);
                        (lhs, rhs, int_ty)
                    } else {
                        self.usual_arithmetic_conversions(lhs, rhs)
                    }
                },
                BinaryOp::Shl | BinaryOp::Shr => {
                    let lhs = self.promote_integer(lhs);
                    let rhs = self.promote_integer(rhs);
                    let ty = self.ctx.ast.expr_ty(lhs);
                    (lhs, rhs, ty)
                },
                BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne => {
                    let lhs = self.default_function_array_conversion(lhs);
                    let rhs = self.default_function_array_conversion(rhs);
                    let lhs_ty = self.ctx.ast.expr_ty(lhs);
                    let rhs_ty = self.ctx.ast.expr_ty(rhs);
                    if self.ctx.types.is_arithmetic_type(lhs_ty) && self.ctx.types.is_arithmetic_type(rhs_ty) {
                        let (lhs, rhs, _) = self.usual_arithmetic_conversions(lhs, rhs);
                        (lhs, rhs, int_ty)
                    } else if self.ctx.types.is_pointer_type(lhs_ty) && self.ctx.types.is_pointer_type(rhs_ty) {
                        (lhs, rhs, int_ty)
                    } else if self.ctx.types.is_pointer_type(lhs_ty) && self.is_null_pointer_constant(idents, rhs) {
                        let rhs = self.implicit_cast(rhs, lhs_ty, CastKind::IntegralToPointer);
                        (lhs, rhs, int_ty)
                    } else if self.ctx.types.is_pointer_type(rhs_ty) && self.is_null_pointer_constant(idents, lhs) {
                        let lhs = self.implicit_cast(lhs, rhs_ty, CastKind::IntegralToPointer);
                        (lhs, rhs, int_ty)
                    } else {
                        self.invalid_operands(diags, idents, op_loc, lhs, rhs);
                        (lhs, rhs, int_ty)
                    }
                },
                BinaryOp::And | BinaryOp::Xor | BinaryOp::Or => {
                    let lhs_ty = self.ctx.ast.expr_ty(lhs);
                    let rhs_ty = self.ctx.ast.expr_ty(rhs);
                    if self.ctx.types.is_integer_type(lhs_ty) && self.ctx.types.is_integer_type(rhs_ty) {
                        self.usual_arithmetic_conversions(lhs, rhs)
                    } else {
                        self.invalid_operands(diags, idents, op_loc, lhs, rhs);
                        (lhs, rhs, int_ty)
                    }
                },
                BinaryOp::LAnd | BinaryOp::LOr => {
                    let lhs = self.check_condition(diags, idents, lhs);
                    let rhs = self.check_condition(diags, idents, rhs);
                    (lhs, rhs, int_ty)
                },
                BinaryOp::Comma => {
                    let ty = self.ctx.ast.expr_ty(rhs);
                    (lhs, rhs, ty)
                },
                _ => unreachable!("assignment handled above"),
            }
        };

        self.ctx.ast.alloc_expr(StmtKind::Binary {
            data: ExprData {
                ty,
                category: ValueCategory::RValue,
                range,
            },
            op,
            lhs,
            rhs,
        })
    }

    fn check_arithmetic_operands(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        op_loc: SourceLocation,
    ) {
        let lhs_ty = self.ctx.ast.expr_ty(lhs);
        let rhs_ty = self.ctx.ast.expr_ty(rhs);
        // Pointer += integer is fine; everything else wants arithmetic on
        // both sides.
        if self.ctx.types.is_pointer_type(lhs_ty)
            && matches!(op, BinaryOp::AddAssign | BinaryOp::SubAssign)
            && self.ctx.types.is_integer_type(rhs_ty)
        {
            return;
        }
        if !(self.ctx.types.is_arithmetic_type(lhs_ty) && self.ctx.types.is_arithmetic_type(rhs_ty)) {
            self.invalid_operands(diags, idents, op_loc, lhs, rhs);
        }
    }

    fn invalid_operands(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        op_loc: SourceLocation,
        lhs: ExprId,
        rhs: ExprId,
    ) {
        let lhs_printed = self.ctx.types.print(self.ctx.ast.expr_ty(lhs), &self.ctx.decls, idents);
        let rhs_printed = self.ctx.types.print(self.ctx.ast.expr_ty(rhs), &self.ctx.decls, idents);
        diags
            .report(op_loc, DiagCode::ErrInvalidOperands)
            .arg_qualtype(lhs_printed)
            .arg_qualtype(rhs_printed)
            .range(self.ctx.ast.expr_range(lhs))
            .range(self.ctx.ast.expr_range(rhs));
    }

    fn require_modifiable_lvalue(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        expr: ExprId,
    ) {
        let data = *self.ctx.ast.expr_data(expr);
        if data.category != ValueCategory::LValue {
            diags.report(data.range.begin, DiagCode::ErrAssignToRvalue).range(data.range);
            return;
        }
        if data.ty.is_const() {
            let printed = self.ctx.types.print(data.ty, &self.ctx.decls, idents);
            diags.report(data.range.begin, DiagCode::ErrNotModifiableLvalue).arg_qualtype(printed).range(data.range);
        }
    }

    pub fn act_on_conditional(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    ) -> ExprId {
        let cond = self.check_condition(diags, idents, cond);
        let then_ty = self.ctx.ast.expr_ty(then_expr);
        let else_ty = self.ctx.ast.expr_ty(else_expr);
        let range = SourceRange::new(self.ctx.ast.expr_range(cond).begin, self.ctx.ast.expr_range(else_expr).end);

        let (then_expr, else_expr, ty) =
            if self.ctx.types.is_arithmetic_type(then_ty) && self.ctx.types.is_arithmetic_type(else_ty) {
                self.usual_arithmetic_conversions(then_expr, else_expr)
            } else if self.ctx.types.types_equal(then_ty.without_quals(), else_ty.without_quals()) {
                (then_expr, else_expr, then_ty.without_quals())
            } else if self.ctx.types.is_pointer_type(then_ty) && self.is_null_pointer_constant(idents, else_expr) {
                let else_expr = self.implicit_cast(else_expr, then_ty, CastKind::IntegralToPointer);
                (then_expr, else_expr, then_ty)
            } else if self.ctx.types.is_pointer_type(else_ty) && self.is_null_pointer_constant(idents, then_expr) {
                let then_expr = self.implicit_cast(then_expr, else_ty, CastKind::IntegralToPointer);
                (then_expr, else_expr, else_ty)
            } else if self.ctx.types.is_pointer_type(then_ty) && self.ctx.types.is_pointer_type(else_ty) {
                (then_expr, else_expr, then_ty)
            } else {
                self.invalid_operands(diags, idents, range.begin, then_expr, else_expr);
                (then_expr, else_expr, self.ctx.types.builtins.int_ty)
            };

        self.ctx.ast.alloc_expr(StmtKind::Conditional {
            data: ExprData {
                ty,
                category: ValueCategory::RValue,
                range,
            },
            cond,
            then_expr,
            else_expr,
        })
    }

    // ── postfix forms ───────────────────────────────────────────────────

    pub fn act_on_member_access(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        base: ExprId,
        is_arrow: bool,
        member_name: IdentId,
        member_loc: SourceLocation,
    ) -> ExprId {
        let base = if is_arrow {
            self.default_function_array_conversion(base)
        } else {
            base
        };
        let base_ty = self.ctx.ast.expr_ty(base);
        let base_range = self.ctx.ast.expr_range(base);
        let range = SourceRange::new(base_range.begin, member_loc);

        let record_ty = if is_arrow {
            match self.ctx.types.pointee_type(base_ty) {
                Some(pointee) => pointee,
                None => {
                    let printed = self.ctx.types.print(base_ty, &self.ctx.decls, idents);
                    diags.report(member_loc, DiagCode::ErrNotAStruct).arg_qualtype(printed).range(base_range);
                    return self.error_expr(member_loc);
                },
            }
        } else {
            base_ty
        };

        let record_decl = match self.ctx.types.canonical_kind(record_ty) {
            TypeKind::Record {
                decl,
            } => *decl,
            _ => {
                let printed = self.ctx.types.print(record_ty, &self.ctx.decls, idents);
                diags.report(member_loc, DiagCode::ErrNotAStruct).arg_qualtype(printed).range(base_range);
                return self.error_expr(member_loc);
            },
        };

        // Members live on the defining declaration of the record.
        let definition = self.ctx.decls.definition(record_decl).unwrap_or(record_decl);
        let member = self.ctx.decls.lookup_in_context(
            definition,
            DeclName::Ident(member_name),
            IdentifierNamespace::MEMBER,
        );
        let Some(member) = member else {
            let printed = self.ctx.types.print(record_ty, &self.ctx.decls, idents);
            diags
                .report(member_loc, DiagCode::ErrMemberNotFound)
                .arg_identifier(idents.spelling(member_name))
                .arg_qualtype(printed)
                .range(base_range);
            return self.error_expr(member_loc);
        };

        let member_ty = match self.ctx.decls.decl(member).kind {
            DeclKind::Field {
                ty, ..
            } => ty,
            DeclKind::Function {
                ty, ..
            } => ty,
            _ => self.ctx.types.builtins.int_ty,
        };

        // `->` always yields an lvalue; `.` follows the base.
        let category = if is_arrow {
            ValueCategory::LValue
        } else {
            self.ctx.ast.expr_category(base)
        };

        self.ctx.ast.alloc_expr(StmtKind::Member {
            data: ExprData {
                ty: member_ty,
                category,
                range,
            },
            base,
            member,
            is_arrow,
            member_loc,
        })
    }

    pub fn act_on_array_subscript(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        base: ExprId,
        index: ExprId,
        rbracket_loc: SourceLocation,
    ) -> ExprId {
        let base = self.default_function_array_conversion(base);
        let index = self.default_function_array_conversion(index);
        let base_ty = self.ctx.ast.expr_ty(base);
        let index_ty = self.ctx.ast.expr_ty(index);
        let range = SourceRange::new(self.ctx.ast.expr_range(base).begin, rbracket_loc);

        // Either operand may be the pointer (C99 6.5.2.1).
        let (pointer, integer) = if self.ctx.types.is_pointer_type(base_ty) {
            (base, index)
        } else if self.ctx.types.is_pointer_type(index_ty) {
            (index, base)
        } else {
            diags.report(rbracket_loc, DiagCode::ErrSubscriptNotPointer).range(range);
            return self.error_expr(rbracket_loc);
        };

        if !self.ctx.types.is_integer_type(self.ctx.ast.expr_ty(integer)) {
            self.invalid_operands(diags, idents, rbracket_loc, base, index);
        }

        let element =
            self.ctx.types.pointee_type(self.ctx.ast.expr_ty(pointer)).expect("pointer operand has a pointee");

        self.ctx.ast.alloc_expr(StmtKind::ArraySubscript {
            data: ExprData {
                ty: element,
                category: ValueCategory::LValue,
                range,
            },
            base,
            index,
        })
    }

    pub fn act_on_call(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        callee: ExprId,
        args: Vec<ExprId>,
        rparen_loc: SourceLocation,
    ) -> ExprId {
        let callee = self.maybe_resolve_overload(diags, idents, callee, &args, rparen_loc);
        let callee = self.default_function_array_conversion(callee);
        let callee_ty = self.ctx.ast.expr_ty(callee);
        let range = SourceRange::new(self.ctx.ast.expr_range(callee).begin, rparen_loc);

        let fn_ty = match self.ctx.types.pointee_type(callee_ty) {
            Some(pointee) if self.ctx.types.is_function_type(pointee) => pointee,
            _ if self.ctx.types.is_function_type(callee_ty) => callee_ty,
            _ => {
                let printed = self.ctx.types.print(callee_ty, &self.ctx.decls, idents);
                diags.report(range.begin, DiagCode::ErrNotCallable).arg_qualtype(printed).range(range);
                return self.error_expr(rparen_loc);
            },
        };

        let (result_ty, args) = match self.ctx.types.canonical_kind(fn_ty) {
            TypeKind::FunctionProto {
                result,
                params,
                variadic,
                ..
            } => {
                let result = *result;
                let params = params.clone();
                let variadic = *variadic;
                if args.len() < params.len() || (args.len() > params.len() && !variadic) {
                    let which = if args.len() < params.len() {
                        "few"
                    } else {
                        "many"
                    };
                    diags
                        .report(rparen_loc, DiagCode::ErrArgCountMismatch)
                        .arg_str(which)
                        .arg_uint(params.len() as u64)
                        .arg_uint(args.len() as u64)
                        .range(range);
                }
                let mut converted = Vec::with_capacity(args.len());
                for (i, arg) in args.into_iter().enumerate() {
                    let arg = match params.get(i) {
                        Some(&param_ty) => self.convert_for_assignment(diags, idents, arg, param_ty),
                        None => self.default_argument_promotion(arg),
                    };
                    converted.push(arg);
                }
                (result, converted)
            },
            TypeKind::FunctionNoProto {
                result,
            } => {
                let result = *result;
                let args = args.into_iter().map(|arg| self.default_argument_promotion(arg)).collect();
                (result, args)
            },
            _ => unreachable!("checked above"),
        };

        // A call returning a reference is an lvalue of the referent type.
        let (result_ty, category) = if self.ctx.types.is_reference_type(result_ty) {
            (self.ctx.types.non_reference_type(result_ty), ValueCategory::LValue)
        } else {
            (result_ty, ValueCategory::RValue)
        };

        self.ctx.ast.alloc_expr(StmtKind::Call {
            data: ExprData {
                ty: result_ty,
                category,
                range,
            },
            callee,
            args,
        })
    }

    /// When several same-named functions are visible (C++ overloading),
    /// pick the one whose parameter types best match the arguments and
    /// rebuild the callee reference to it.
    fn maybe_resolve_overload(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        callee: ExprId,
        args: &[ExprId],
        loc: SourceLocation,
    ) -> ExprId {
        let stripped = self.ctx.ast.ignore_parens(callee);
        let StmtKind::DeclRef {
            decl, ..
        } = self.ctx.ast.expr(stripped).kind
        else {
            return callee;
        };
        let Some(name) = self.ctx.decls.decl(decl).name else {
            return callee;
        };

        let candidates: Vec<DeclId> = self
            .resolver
            .lookup_all(name, LookupKind::Ordinary, &self.ctx.decls)
            .into_iter()
            .filter(|&d| matches!(self.ctx.decls.decl(d).kind, DeclKind::Function { .. }))
            .collect();
        if candidates.len() <= 1 {
            return callee;
        }

        let arg_types: Vec<QualType> = args.iter().map(|&a| self.ctx.ast.expr_ty(a)).collect();
        match overload::resolve(self, &candidates, &arg_types) {
            OverloadResult::Best(decl) => self.build_decl_ref(diags, idents, decl, loc),
            OverloadResult::Ambiguous(tied) => {
                let name = self.ctx.decls.decl_name(decl, idents).unwrap_or_default();
                diags.report(loc, DiagCode::ErrAmbiguousCall).arg_decl_name(name);
                for candidate in tied {
                    diags.report(self.ctx.decls.decl(candidate).loc, DiagCode::NoteCandidate);
                }
                callee
            },
            OverloadResult::NoViable => {
                let name = self.ctx.decls.decl_name(decl, idents).unwrap_or_default();
                diags.report(loc, DiagCode::ErrNoMatchingFunction).arg_decl_name(name);
                for &candidate in &candidates {
                    diags.report(self.ctx.decls.decl(candidate).loc, DiagCode::NoteCandidate);
                }
                callee
            },
        }
    }

    pub fn act_on_cast(
        &mut self,
        to: QualType,
        operand: ExprId,
        range: SourceRange,
    ) -> ExprId {
        let operand = self.default_function_array_conversion(operand);
        self.ctx.ast.alloc_expr(StmtKind::CStyleCast {
            data: ExprData {
                ty: to,
                category: ValueCategory::RValue,
                range,
            },
            operand,
        })
    }

    pub fn act_on_sizeof_alignof_type(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        is_sizeof: bool,
        ty: QualType,
        op_loc: SourceLocation,
        range: SourceRange,
    ) -> ExprId {
        if self.ctx.types.is_incomplete_type(ty, &self.ctx.decls) {
            let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
            diags
                .report(op_loc, DiagCode::ErrSizeofIncomplete)
                .arg_str(if is_sizeof {
                    "sizeof"
                } else {
                    "__alignof__"
                })
                .arg_qualtype(printed);
        }
        let ulong_ty = self.ctx.types.builtins.ulong_ty;
        self.ctx.ast.alloc_expr(StmtKind::SizeOfAlignOfType {
            data: ExprData {
                ty: ulong_ty,
                category: ValueCategory::RValue,
                range,
            },
            is_sizeof,
            operand_ty: ty,
        })
    }

    pub fn act_on_init_list(
        &mut self,
        inits: Vec<ExprId>,
        range: SourceRange,
    ) -> ExprId {
        let int_ty = self.ctx.types.builtins.int_ty;
        self.ctx.ast.alloc_expr(StmtKind::InitList {
            data: ExprData {
                ty: int_ty,
                category: ValueCategory::RValue,
                range,
            },
            inits,
        })
    }
}

/// Translate the C escape sequences in a literal body.
fn unescape(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('0') => out.push(0),
            Some('\\') => out.push(b'\\'),
            Some('\'') => out.push(b'\''),
            Some('"') => out.push(b'"'),
            Some(other) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            },
            None => {},
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src/sema/expr_tests.rs"]
mod tests;
