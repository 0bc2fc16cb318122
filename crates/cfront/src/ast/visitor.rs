//! Statement/expression visitation.
//!
//! [`StmtVisitor::visit`] dispatches on the node's [`StmtClass`]; operator
//! nodes are dispatched a second time on their opcode, so an implementation
//! may provide handlers at either granularity (`visit_binary_operator`, or
//! per-opcode `visit_bin_add` / `visit_bin_assign`). Every unimplemented
//! handler falls back to its direct parent class, once, bottoming out at
//! [`StmtVisitor::visit_stmt`], which yields the visitor's default value.

use crate::ast::stmt::{AstArena, BinaryOp, ExprId, StmtId, StmtKind, UnaryOp};

pub trait StmtVisitor {
    type Value: Default;

    /// Total dispatch over every constructible node class.
    fn visit(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        let node = ast.stmt(id);

        // Operator nodes dispatch on their opcode first; unimplemented
        // per-opcode handlers fall back to the class-level handler below.
        match &node.kind {
            StmtKind::Binary {
                op, ..
            } => {
                let id = ExprId(id.index());
                return match op {
                    BinaryOp::Mul => self.visit_bin_mul(ast, id),
                    BinaryOp::Div => self.visit_bin_div(ast, id),
                    BinaryOp::Rem => self.visit_bin_rem(ast, id),
                    BinaryOp::Add => self.visit_bin_add(ast, id),
                    BinaryOp::Sub => self.visit_bin_sub(ast, id),
                    BinaryOp::Shl => self.visit_bin_shl(ast, id),
                    BinaryOp::Shr => self.visit_bin_shr(ast, id),
                    BinaryOp::Lt => self.visit_bin_lt(ast, id),
                    BinaryOp::Gt => self.visit_bin_gt(ast, id),
                    BinaryOp::Le => self.visit_bin_le(ast, id),
                    BinaryOp::Ge => self.visit_bin_ge(ast, id),
                    BinaryOp::Eq => self.visit_bin_eq(ast, id),
                    BinaryOp::Ne => self.visit_bin_ne(ast, id),
                    BinaryOp::And => self.visit_bin_and(ast, id),
                    BinaryOp::Xor => self.visit_bin_xor(ast, id),
                    BinaryOp::Or => self.visit_bin_or(ast, id),
                    BinaryOp::LAnd => self.visit_bin_land(ast, id),
                    BinaryOp::LOr => self.visit_bin_lor(ast, id),
                    BinaryOp::Assign => self.visit_bin_assign(ast, id),
                    BinaryOp::MulAssign => self.visit_bin_mul_assign(ast, id),
                    BinaryOp::DivAssign => self.visit_bin_div_assign(ast, id),
                    BinaryOp::RemAssign => self.visit_bin_rem_assign(ast, id),
                    BinaryOp::AddAssign => self.visit_bin_add_assign(ast, id),
                    BinaryOp::SubAssign => self.visit_bin_sub_assign(ast, id),
                    BinaryOp::ShlAssign => self.visit_bin_shl_assign(ast, id),
                    BinaryOp::ShrAssign => self.visit_bin_shr_assign(ast, id),
                    BinaryOp::AndAssign => self.visit_bin_and_assign(ast, id),
                    BinaryOp::XorAssign => self.visit_bin_xor_assign(ast, id),
                    BinaryOp::OrAssign => self.visit_bin_or_assign(ast, id),
                    BinaryOp::Comma => self.visit_bin_comma(ast, id),
                };
            },
            StmtKind::Unary {
                op, ..
            } => {
                let id = ExprId(id.index());
                return match op {
                    UnaryOp::PostInc => self.visit_unary_post_inc(ast, id),
                    UnaryOp::PostDec => self.visit_unary_post_dec(ast, id),
                    UnaryOp::PreInc => self.visit_unary_pre_inc(ast, id),
                    UnaryOp::PreDec => self.visit_unary_pre_dec(ast, id),
                    UnaryOp::AddrOf => self.visit_unary_addr_of(ast, id),
                    UnaryOp::Deref => self.visit_unary_deref(ast, id),
                    UnaryOp::Plus => self.visit_unary_plus(ast, id),
                    UnaryOp::Minus => self.visit_unary_minus(ast, id),
                    UnaryOp::Not => self.visit_unary_not(ast, id),
                    UnaryOp::LNot => self.visit_unary_lnot(ast, id),
                    UnaryOp::SizeOf => self.visit_unary_size_of(ast, id),
                    UnaryOp::AlignOf => self.visit_unary_align_of(ast, id),
                    UnaryOp::Real => self.visit_unary_real(ast, id),
                    UnaryOp::Imag => self.visit_unary_imag(ast, id),
                    UnaryOp::Extension => self.visit_unary_extension(ast, id),
                };
            },
            _ => {},
        }

        let expr_id = ExprId(id.index());
        match &node.kind {
            StmtKind::Null { .. } => self.visit_null_stmt(ast, id),
            StmtKind::Compound { .. } => self.visit_compound_stmt(ast, id),
            StmtKind::Decl { .. } => self.visit_decl_stmt(ast, id),
            StmtKind::If { .. } => self.visit_if_stmt(ast, id),
            StmtKind::While { .. } => self.visit_while_stmt(ast, id),
            StmtKind::Do { .. } => self.visit_do_stmt(ast, id),
            StmtKind::For { .. } => self.visit_for_stmt(ast, id),
            StmtKind::Switch { .. } => self.visit_switch_stmt(ast, id),
            StmtKind::Case { .. } => self.visit_case_stmt(ast, id),
            StmtKind::Default { .. } => self.visit_default_stmt(ast, id),
            StmtKind::Break { .. } => self.visit_break_stmt(ast, id),
            StmtKind::Continue { .. } => self.visit_continue_stmt(ast, id),
            StmtKind::Return { .. } => self.visit_return_stmt(ast, id),
            StmtKind::Goto { .. } => self.visit_goto_stmt(ast, id),
            StmtKind::Label { .. } => self.visit_label_stmt(ast, id),
            StmtKind::IntegerLiteral { .. } => self.visit_integer_literal(ast, expr_id),
            StmtKind::FloatingLiteral { .. } => self.visit_floating_literal(ast, expr_id),
            StmtKind::CharacterLiteral { .. } => self.visit_character_literal(ast, expr_id),
            StmtKind::StringLiteral { .. } => self.visit_string_literal(ast, expr_id),
            StmtKind::DeclRef { .. } => self.visit_decl_ref_expr(ast, expr_id),
            StmtKind::Paren { .. } => self.visit_paren_expr(ast, expr_id),
            StmtKind::SizeOfAlignOfType { .. } => self.visit_size_of_align_of_type_expr(ast, expr_id),
            StmtKind::Conditional { .. } => self.visit_conditional_operator(ast, expr_id),
            StmtKind::ImplicitCast { .. } => self.visit_implicit_cast_expr(ast, expr_id),
            StmtKind::CStyleCast { .. } => self.visit_c_style_cast_expr(ast, expr_id),
            StmtKind::Member { .. } => self.visit_member_expr(ast, expr_id),
            StmtKind::ArraySubscript { .. } => self.visit_array_subscript_expr(ast, expr_id),
            StmtKind::Call { .. } => self.visit_call_expr(ast, expr_id),
            StmtKind::InitList { .. } => self.visit_init_list_expr(ast, expr_id),
            StmtKind::ObjCMessage { .. } => self.visit_objc_message_expr(ast, expr_id),
            StmtKind::Binary { .. } | StmtKind::Unary { .. } => unreachable!("dispatched on opcode above"),
        }
    }

    // ── base cases ──────────────────────────────────────────────────────

    /// Final fallback; returns the visitor's default value.
    fn visit_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        let _ = (ast, id);
        Self::Value::default()
    }

    fn visit_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_stmt(ast, id.into())
    }

    // ── statement classes ───────────────────────────────────────────────

    fn visit_null_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_compound_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_decl_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_if_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_while_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_do_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_for_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_switch_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_case_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_default_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_break_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_continue_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_return_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_goto_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    fn visit_label_stmt(
        &mut self,
        ast: &AstArena,
        id: StmtId,
    ) -> Self::Value {
        self.visit_stmt(ast, id)
    }

    // ── expression classes ──────────────────────────────────────────────

    fn visit_integer_literal(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_floating_literal(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_character_literal(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_string_literal(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_decl_ref_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_paren_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_unary_operator(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_size_of_align_of_type_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_binary_operator(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_conditional_operator(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_implicit_cast_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_c_style_cast_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_member_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_array_subscript_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_call_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_init_list_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    fn visit_objc_message_expr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_expr(ast, id)
    }

    // ── binary opcodes; each falls back to the class-level handler ──────

    fn visit_bin_mul(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_div(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_rem(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_add(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_sub(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_shl(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_shr(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_lt(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_gt(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_le(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_ge(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_eq(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_ne(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_and(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_xor(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_or(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_land(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_lor(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_mul_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_div_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_rem_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_add_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_sub_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_shl_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_shr_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_and_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_xor_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_or_assign(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    fn visit_bin_comma(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_binary_operator(ast, id)
    }

    // ── unary opcodes; each falls back to the class-level handler ───────

    fn visit_unary_post_inc(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_post_dec(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_pre_inc(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_pre_dec(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_addr_of(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_deref(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_plus(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_minus(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_not(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_lnot(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_size_of(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_align_of(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_real(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_imag(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }

    fn visit_unary_extension(
        &mut self,
        ast: &AstArena,
        id: ExprId,
    ) -> Self::Value {
        self.visit_unary_operator(ast, id)
    }
}

#[cfg(test)]
#[path = "../../tests/src/ast/visitor_tests.rs"]
mod tests;
