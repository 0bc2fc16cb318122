//! Expression parsing: precedence climbing over the binary operators,
//! with the cast / parenthesized-expression ambiguity resolved by a
//! mark-and-backtrack probe of the token stream.

use crate::ast::stmt::{BinaryOp, ExprId, UnaryOp};
use crate::basic::diagnostic::DiagCode;
use crate::basic::source_location::SourceRange;
use crate::basic::token_kinds::TokenKind;
use crate::parse::Parser;

impl Parser {
    /// expression: assignment-expression (`,` assignment-expression)*
    pub(crate) fn parse_expression(&mut self) -> ExprId {
        let mut lhs = self.parse_assignment_expression();
        while self.at(TokenKind::Comma) {
            let op_loc = self.consume().loc;
            let rhs = self.parse_assignment_expression();
            lhs = self.sema.act_on_binary_op(&mut self.diags, &self.pp.idents, BinaryOp::Comma, lhs, rhs, op_loc);
        }
        lhs
    }

    /// assignment-expression. Assignment is right-associative.
    pub(crate) fn parse_assignment_expression(&mut self) -> ExprId {
        let lhs = self.parse_conditional_expression();
        let Some(op) = assignment_op(self.cur_kind()) else {
            return lhs;
        };
        let op_loc = self.consume().loc;
        let rhs = self.parse_assignment_expression();
        self.sema.act_on_binary_op(&mut self.diags, &self.pp.idents, op, lhs, rhs, op_loc)
    }

    fn parse_conditional_expression(&mut self) -> ExprId {
        let cond = self.parse_binary_expression(1);
        if !self.at(TokenKind::Question) {
            return cond;
        }
        self.consume();
        let then_expr = self.parse_expression();
        self.expect(TokenKind::Colon);
        let else_expr = self.parse_conditional_expression();
        self.sema.act_on_conditional(&mut self.diags, &self.pp.idents, cond, then_expr, else_expr)
    }

    /// Precedence climbing over the left-associative binary operators.
    fn parse_binary_expression(
        &mut self,
        min_prec: u8,
    ) -> ExprId {
        let mut lhs = self.parse_cast_expression();
        loop {
            let Some((op, prec)) = binary_op(self.cur_kind()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let op_loc = self.consume().loc;
            let rhs = self.parse_binary_expression(prec + 1);
            lhs = self.sema.act_on_binary_op(&mut self.diags, &self.pp.idents, op, lhs, rhs, op_loc);
        }
        lhs
    }

    /// cast-expression: `( type-name ) cast-expression` or a unary
    /// expression. `(x)` where `x` is not a type falls through to the
    /// parenthesized-expression path via backtracking.
    pub(crate) fn parse_cast_expression(&mut self) -> ExprId {
        if self.at(TokenKind::LParen) {
            let mark = self.pp.mark();
            let lparen = self.consume();
            if self.starts_type_name()
                && let Some(ty) = self.parse_type_name()
                && self.at(TokenKind::RParen)
            {
                self.consume();
                // `(int)(x)` is a cast; `(int)` followed by an operator or
                // terminator was a parenthesized name after all.
                if self.starts_expression() {
                    let operand = self.parse_cast_expression();
                    let range = SourceRange::new(lparen.loc, self.sema.ctx.ast.expr_range(operand).end);
                    return self.sema.act_on_cast(ty, operand, range);
                }
            }
            self.pp.backtrack_to(mark);
        }
        self.parse_unary_expression()
    }

    fn starts_expression(&mut self) -> bool {
        matches!(
            self.cur_kind(),
            TokenKind::Identifier
                | TokenKind::NumericConstant
                | TokenKind::FloatingConstant
                | TokenKind::CharConstant
                | TokenKind::StringLiteral
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Tilde
                | TokenKind::Exclaim
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::KwSizeof
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwThis
                | TokenKind::At
        )
    }

    fn parse_unary_expression(&mut self) -> ExprId {
        let op = match self.cur_kind() {
            TokenKind::PlusPlus => Some(UnaryOp::PreInc),
            TokenKind::MinusMinus => Some(UnaryOp::PreDec),
            TokenKind::Amp => Some(UnaryOp::AddrOf),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::Not),
            TokenKind::Exclaim => Some(UnaryOp::LNot),
            TokenKind::KwReal => Some(UnaryOp::Real),
            TokenKind::KwImag => Some(UnaryOp::Imag),
            TokenKind::KwExtension => Some(UnaryOp::Extension),
            _ => None,
        };
        if let Some(op) = op {
            let token = self.consume();
            let operand = self.parse_cast_expression();
            return self.sema.act_on_unary_op(&mut self.diags, &self.pp.idents, op, operand, token.loc);
        }

        match self.cur_kind() {
            TokenKind::KwSizeof => self.parse_sizeof_alignof(true),
            TokenKind::KwAlignof => self.parse_sizeof_alignof(false),
            _ => self.parse_postfix_expression(),
        }
    }

    /// `sizeof unary-expression` / `sizeof ( type-name )`, and the
    /// `__alignof__` variants.
    fn parse_sizeof_alignof(
        &mut self,
        is_sizeof: bool,
    ) -> ExprId {
        let keyword = self.consume();

        if self.at(TokenKind::LParen) {
            let mark = self.pp.mark();
            self.consume();
            if self.starts_type_name()
                && let Some(ty) = self.parse_type_name()
                && self.at(TokenKind::RParen)
            {
                let rparen = self.consume();
                let range = SourceRange::new(keyword.loc, rparen.loc);
                return self.sema.act_on_sizeof_alignof_type(
                    &mut self.diags,
                    &self.pp.idents,
                    is_sizeof,
                    ty,
                    keyword.loc,
                    range,
                );
            }
            self.pp.backtrack_to(mark);
        }

        let operand = self.parse_unary_expression();
        let op = if is_sizeof {
            UnaryOp::SizeOf
        } else {
            UnaryOp::AlignOf
        };
        self.sema.act_on_unary_op(&mut self.diags, &self.pp.idents, op, operand, keyword.loc)
    }

    fn parse_postfix_expression(&mut self) -> ExprId {
        let mut expr = self.parse_primary_expression();
        loop {
            match self.cur_kind() {
                TokenKind::LParen => {
                    self.consume();
                    let mut args = Vec::new();
                    if !self.at(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_assignment_expression());
                            if self.try_consume(TokenKind::Comma).is_none() {
                                break;
                            }
                        }
                    }
                    let rparen = self.cur_loc();
                    self.expect(TokenKind::RParen);
                    expr = self.sema.act_on_call(&mut self.diags, &self.pp.idents, expr, args, rparen);
                },
                TokenKind::LBracket => {
                    self.consume();
                    let index = self.parse_expression();
                    let rbracket = self.cur_loc();
                    self.expect(TokenKind::RBracket);
                    expr = self.sema.act_on_array_subscript(&mut self.diags, &self.pp.idents, expr, index, rbracket);
                },
                TokenKind::Period | TokenKind::Arrow => {
                    let is_arrow = self.consume().kind == TokenKind::Arrow;
                    let Some(member_token) = self.try_consume(TokenKind::Identifier) else {
                        let loc = self.cur_loc();
                        self.diags.report(loc, DiagCode::ErrExpectedMember).arg_str(if is_arrow {
                            "->"
                        } else {
                            "."
                        });
                        break;
                    };
                    let member = member_token.ident.expect("identifier token carries its ident");
                    expr = self.sema.act_on_member_access(
                        &mut self.diags,
                        &self.pp.idents,
                        expr,
                        is_arrow,
                        member,
                        member_token.loc,
                    );
                },
                TokenKind::PlusPlus => {
                    let token = self.consume();
                    expr = self.sema.act_on_unary_op(
                        &mut self.diags,
                        &self.pp.idents,
                        UnaryOp::PostInc,
                        expr,
                        token.loc,
                    );
                },
                TokenKind::MinusMinus => {
                    let token = self.consume();
                    expr = self.sema.act_on_unary_op(
                        &mut self.diags,
                        &self.pp.idents,
                        UnaryOp::PostDec,
                        expr,
                        token.loc,
                    );
                },
                _ => break,
            }
        }
        expr
    }

    fn parse_primary_expression(&mut self) -> ExprId {
        match self.cur_kind() {
            TokenKind::NumericConstant | TokenKind::FloatingConstant => {
                let token = self.consume();
                let spelling = self.spelling(&token);
                self.sema.act_on_numeric_literal(&spelling, token.loc)
            },
            TokenKind::CharConstant => {
                let token = self.consume();
                let spelling = self.spelling(&token);
                self.sema.act_on_char_literal(&spelling, token.loc)
            },
            TokenKind::StringLiteral => {
                let token = self.consume();
                let spelling = self.spelling(&token);
                self.sema.act_on_string_literal(&spelling, token.loc)
            },
            TokenKind::KwTrue | TokenKind::KwFalse => {
                let token = self.consume();
                let spelling = if token.kind == TokenKind::KwTrue {
                    "1"
                } else {
                    "0"
                };
                self.sema.act_on_numeric_literal(spelling, token.loc)
            },
            TokenKind::Identifier => {
                let token = self.consume();
                let name = token.ident.expect("identifier token carries its ident");
                self.sema.act_on_identifier_expr(&mut self.diags, &self.pp.idents, name, token.loc)
            },
            TokenKind::LParen => {
                let lparen = self.consume();
                let inner = self.parse_expression();
                let rparen = self.cur_loc();
                self.expect(TokenKind::RParen);
                self.sema.act_on_paren_expr(inner, SourceRange::new(lparen.loc, rparen))
            },
            TokenKind::LBracket if self.pp.lang.objc => self.parse_objc_message_expression(),
            _ => {
                let loc = self.cur_loc();
                self.diags.report(loc, DiagCode::ErrExpectedExpression);
                // Eat the offending token so the caller makes progress.
                if !self.at(TokenKind::Eof)
                    && !matches!(self.cur_kind(), TokenKind::Semi | TokenKind::RParen | TokenKind::RBrace)
                {
                    self.consume();
                }
                self.sema.error_expr(loc)
            },
        }
    }
}

fn assignment_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Equal => BinaryOp::Assign,
        TokenKind::StarEqual => BinaryOp::MulAssign,
        TokenKind::SlashEqual => BinaryOp::DivAssign,
        TokenKind::PercentEqual => BinaryOp::RemAssign,
        TokenKind::PlusEqual => BinaryOp::AddAssign,
        TokenKind::MinusEqual => BinaryOp::SubAssign,
        TokenKind::LessLessEqual => BinaryOp::ShlAssign,
        TokenKind::GreaterGreaterEqual => BinaryOp::ShrAssign,
        TokenKind::AmpEqual => BinaryOp::AndAssign,
        TokenKind::CaretEqual => BinaryOp::XorAssign,
        TokenKind::PipeEqual => BinaryOp::OrAssign,
        _ => return None,
    })
}

/// The left-associative binary operators and their precedence, higher
/// binding tighter.
fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::PipePipe => (BinaryOp::LOr, 1),
        TokenKind::AmpAmp => (BinaryOp::LAnd, 2),
        TokenKind::Pipe => (BinaryOp::Or, 3),
        TokenKind::Caret => (BinaryOp::Xor, 4),
        TokenKind::Amp => (BinaryOp::And, 5),
        TokenKind::EqualEqual => (BinaryOp::Eq, 6),
        TokenKind::ExclaimEqual => (BinaryOp::Ne, 6),
        TokenKind::Less => (BinaryOp::Lt, 7),
        TokenKind::Greater => (BinaryOp::Gt, 7),
        TokenKind::LessEqual => (BinaryOp::Le, 7),
        TokenKind::GreaterEqual => (BinaryOp::Ge, 7),
        TokenKind::LessLess => (BinaryOp::Shl, 8),
        TokenKind::GreaterGreater => (BinaryOp::Shr, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Rem, 10),
        _ => return None,
    })
}
