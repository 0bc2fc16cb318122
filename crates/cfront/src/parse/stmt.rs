//! Statement parsing.
//!
//! Errors never unwind: a failed region becomes a null-statement sentinel
//! after `skip_until` has resynchronized the stream, and every pushed
//! scope is popped on the same path that pushed it.

use crate::ast::stmt::{ExprId, StmtId, StmtKind};
use crate::basic::diagnostic::DiagCode;
use crate::basic::source_location::SourceRange;
use crate::basic::token_kinds::TokenKind;
use crate::decl::scope::ScopeFlags;
use crate::parse::{Parser, SkipFlags};

impl Parser {
    /// `{ ... }`. The caller decides whether the block gets its own scope;
    /// a function definition's outermost block reuses the function scope.
    pub(crate) fn parse_compound_statement(
        &mut self,
        enter_scope: bool,
    ) -> StmtId {
        let lbrace = self.cur_loc();
        self.expect(TokenKind::LBrace);
        if enter_scope {
            self.sema.push_scope(ScopeFlags::BLOCK | ScopeFlags::DECL);
        }

        let mut body = Vec::new();
        loop {
            if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                break;
            }
            body.push(self.parse_statement());
        }

        let rbrace = self.cur_loc();
        self.expect(TokenKind::RBrace);
        if enter_scope {
            self.sema.pop_scope();
        }
        self.sema.ctx.ast.alloc_stmt(StmtKind::Compound {
            body,
            lbrace_loc: lbrace,
            rbrace_loc: rbrace,
        })
    }

    fn null_stmt_here(&mut self) -> StmtId {
        let loc = self.cur_loc();
        self.sema.ctx.ast.alloc_stmt(StmtKind::Null {
            semi_loc: loc,
        })
    }

    pub(crate) fn parse_statement(&mut self) -> StmtId {
        match self.cur_kind() {
            TokenKind::LBrace => self.parse_compound_statement(true),
            TokenKind::Semi => {
                let semi = self.consume();
                self.sema.ctx.ast.alloc_stmt(StmtKind::Null {
                    semi_loc: semi.loc,
                })
            },
            TokenKind::KwIf => self.parse_if_statement(),
            TokenKind::KwWhile => self.parse_while_statement(),
            TokenKind::KwDo => self.parse_do_statement(),
            TokenKind::KwFor => self.parse_for_statement(),
            TokenKind::KwSwitch => self.parse_switch_statement(),
            TokenKind::KwCase => self.parse_case_statement(),
            TokenKind::KwDefault => self.parse_default_statement(),
            TokenKind::KwBreak => {
                let token = self.consume();
                if !self.sema.scopes.in_break_scope() {
                    self.diags.report(token.loc, DiagCode::ErrBreakNotInLoop);
                }
                self.expect(TokenKind::Semi);
                self.sema.ctx.ast.alloc_stmt(StmtKind::Break {
                    break_loc: token.loc,
                })
            },
            TokenKind::KwContinue => {
                let token = self.consume();
                if !self.sema.scopes.in_continue_scope() {
                    self.diags.report(token.loc, DiagCode::ErrContinueNotInLoop);
                }
                self.expect(TokenKind::Semi);
                self.sema.ctx.ast.alloc_stmt(StmtKind::Continue {
                    continue_loc: token.loc,
                })
            },
            TokenKind::KwReturn => {
                let token = self.consume();
                let value = if self.at(TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expression())
                };
                if self.expect(TokenKind::Semi).is_none() {
                    self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
                }
                self.sema.act_on_return_stmt(&mut self.diags, &self.pp.idents, token.loc, value)
            },
            TokenKind::KwGoto => {
                let token = self.consume();
                let label = self.try_consume(TokenKind::Identifier).and_then(|t| t.ident);
                self.expect(TokenKind::Semi);
                match label {
                    Some(label) => self.sema.ctx.ast.alloc_stmt(StmtKind::Goto {
                        label,
                        goto_loc: token.loc,
                    }),
                    None => {
                        let loc = token.loc;
                        self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
                        self.null_stmt_here()
                    },
                }
            },
            TokenKind::Identifier if self.peek(1).kind == TokenKind::Colon => {
                let token = self.consume();
                self.consume();
                let label = token.ident.expect("identifier token carries its ident");
                let body = self.parse_statement();
                self.sema.ctx.ast.alloc_stmt(StmtKind::Label {
                    label,
                    body,
                    label_loc: token.loc,
                })
            },
            _ => {
                if self.at_start_of_declaration() {
                    self.parse_declaration_statement()
                } else {
                    self.parse_expression_statement()
                }
            },
        }
    }

    /// Whether the statement about to be parsed is a declaration. Handles
    /// the `T(x);` / `T x;` ambiguity by tentatively parsing ahead and
    /// rolling the token stream back.
    fn at_start_of_declaration(&mut self) -> bool {
        match self.cur_kind() {
            TokenKind::KwTypedef
            | TokenKind::KwExtern
            | TokenKind::KwStatic
            | TokenKind::KwAuto
            | TokenKind::KwRegister
            | TokenKind::KwVoid
            | TokenKind::KwChar
            | TokenKind::KwInt
            | TokenKind::KwFloat
            | TokenKind::KwDouble
            | TokenKind::KwBool
            | TokenKind::KwWchar
            | TokenKind::KwShort
            | TokenKind::KwLong
            | TokenKind::KwSigned
            | TokenKind::KwUnsigned
            | TokenKind::KwConst
            | TokenKind::KwVolatile
            | TokenKind::KwRestrict
            | TokenKind::KwComplex
            | TokenKind::KwStruct
            | TokenKind::KwUnion
            | TokenKind::KwClass
            | TokenKind::KwEnum
            | TokenKind::KwInline
            | TokenKind::KwTypeof => true,
            TokenKind::Identifier => {
                let name = self.cur().ident.expect("identifier token carries its ident");
                if self.is_objc_id_name(name) {
                    return true;
                }
                if self.lookup_type_name(name).is_none() {
                    return false;
                }
                // A type name followed by `(` could still be a cast-like
                // expression; parse ahead, then rewind.
                if self.peek(1).kind != TokenKind::LParen {
                    return true;
                }
                let mark = self.pp.mark();
                self.consume();
                self.consume();
                let declarator = self.parse_declarator(true);
                let is_declaration = declarator.name.is_some()
                    && self.at(TokenKind::RParen)
                    && matches!(
                        self.peek(1).kind,
                        TokenKind::Semi | TokenKind::Equal | TokenKind::Comma | TokenKind::LParen | TokenKind::LBracket
                    );
                self.pp.backtrack_to(mark);
                is_declaration
            },
            _ => false,
        }
    }

    fn parse_declaration_statement(&mut self) -> StmtId {
        let start = self.cur_loc();
        let decls = self.parse_declaration_or_function_definition();
        let end = self.cur_loc();
        if decls.is_empty() {
            return self.null_stmt_here();
        }
        self.sema.act_on_decl_stmt(decls, SourceRange::new(start, end))
    }

    fn parse_expression_statement(&mut self) -> StmtId {
        // An expression is already a statement; no wrapper node exists.
        let expr = self.parse_expression();
        if self.expect(TokenKind::Semi).is_none() {
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
        }
        expr.into()
    }

    fn parse_paren_condition(&mut self) -> ExprId {
        self.expect(TokenKind::LParen);
        let cond = self.parse_expression();
        let cond = self.sema.check_condition(&mut self.diags, &self.pp.idents, cond);
        self.expect(TokenKind::RParen);
        cond
    }

    fn parse_if_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.sema.push_scope(ScopeFlags::CONTROL | ScopeFlags::DECL);
        let cond = self.parse_paren_condition();
        let then_body = self.parse_statement();
        let else_body = if self.try_consume(TokenKind::KwElse).is_some() {
            Some(self.parse_statement())
        } else {
            None
        };
        self.sema.pop_scope();
        self.sema.ctx.ast.alloc_stmt(StmtKind::If {
            cond,
            then_body,
            else_body,
            if_loc: token.loc,
        })
    }

    fn parse_while_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.sema.push_scope(ScopeFlags::CONTROL | ScopeFlags::DECL | ScopeFlags::BREAK | ScopeFlags::CONTINUE);
        let cond = self.parse_paren_condition();
        let body = self.parse_statement();
        self.sema.pop_scope();
        self.sema.ctx.ast.alloc_stmt(StmtKind::While {
            cond,
            body,
            while_loc: token.loc,
        })
    }

    fn parse_do_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.sema.push_scope(ScopeFlags::BLOCK | ScopeFlags::DECL | ScopeFlags::BREAK | ScopeFlags::CONTINUE);
        let body = self.parse_statement();
        self.sema.pop_scope();
        self.expect(TokenKind::KwWhile);
        let cond = self.parse_paren_condition();
        self.expect(TokenKind::Semi);
        self.sema.ctx.ast.alloc_stmt(StmtKind::Do {
            body,
            cond,
            do_loc: token.loc,
        })
    }

    fn parse_for_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.sema.push_scope(ScopeFlags::CONTROL | ScopeFlags::DECL | ScopeFlags::BREAK | ScopeFlags::CONTINUE);
        self.expect(TokenKind::LParen);

        let init = if self.at(TokenKind::Semi) {
            self.consume();
            None
        } else if self.at_start_of_declaration() {
            Some(self.parse_declaration_statement())
        } else {
            Some(self.parse_expression_statement())
        };

        let cond = if self.at(TokenKind::Semi) {
            None
        } else {
            let expr = self.parse_expression();
            Some(self.sema.check_condition(&mut self.diags, &self.pp.idents, expr))
        };
        self.expect(TokenKind::Semi);

        let inc = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::RParen);

        let body = self.parse_statement();
        self.sema.pop_scope();
        self.sema.ctx.ast.alloc_stmt(StmtKind::For {
            init,
            cond,
            inc,
            body,
            for_loc: token.loc,
        })
    }

    fn parse_switch_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.sema.push_scope(ScopeFlags::CONTROL | ScopeFlags::DECL | ScopeFlags::BREAK);
        let cond = self.parse_paren_condition();
        let body = self.parse_statement();
        self.sema.pop_scope();
        self.sema.ctx.ast.alloc_stmt(StmtKind::Switch {
            cond,
            body,
            switch_loc: token.loc,
        })
    }

    fn parse_case_statement(&mut self) -> StmtId {
        let token = self.consume();
        let value = self.parse_expression();
        self.expect(TokenKind::Colon);
        let body = if self.at(TokenKind::RBrace) || self.at(TokenKind::KwCase) || self.at(TokenKind::KwDefault) {
            None
        } else {
            Some(self.parse_statement())
        };
        self.sema.ctx.ast.alloc_stmt(StmtKind::Case {
            value,
            body,
            case_loc: token.loc,
        })
    }

    fn parse_default_statement(&mut self) -> StmtId {
        let token = self.consume();
        self.expect(TokenKind::Colon);
        let body = if self.at(TokenKind::RBrace) || self.at(TokenKind::KwCase) || self.at(TokenKind::KwDefault) {
            None
        } else {
            Some(self.parse_statement())
        };
        self.sema.ctx.ast.alloc_stmt(StmtKind::Default {
            body,
            default_loc: token.loc,
        })
    }
}
