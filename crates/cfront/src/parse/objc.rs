//! Objective-C parsing: `@interface` / `@protocol` / `@implementation`
//! directives, method declarations, and message-send expressions.

use crate::ast::stmt::ExprId;
use crate::basic::diagnostic::DiagCode;
use crate::basic::ident::ObjCAtKeyword;
use crate::basic::source_location::SourceRange;
use crate::basic::token_kinds::TokenKind;
use crate::decl::decl::{DeclId, DeclKind, DeclName};
use crate::decl::lookup::LookupKind;
use crate::decl::scope::ScopeFlags;
use crate::parse::{Parser, SkipFlags};
use crate::sema::declspec::ParamInfo;

impl Parser {
    /// Dispatch on the keyword after a line-initial `@`.
    pub(crate) fn parse_objc_at_directive(&mut self) {
        let at = self.consume();
        if !self.pp.lang.objc {
            self.diags.report(at.loc, DiagCode::ErrExpectedDeclaration);
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            return;
        }

        let keyword = self.cur().ident.and_then(|id| self.pp.idents.info(id).objc_at_keyword());
        match keyword {
            Some(ObjCAtKeyword::Interface) => {
                self.consume();
                self.parse_objc_interface(false);
            },
            Some(ObjCAtKeyword::Implementation) => {
                self.consume();
                self.parse_objc_interface(true);
            },
            Some(ObjCAtKeyword::Protocol) => {
                self.consume();
                self.parse_objc_protocol();
            },
            Some(ObjCAtKeyword::Class) => {
                // `@class A, B;` forward declarations.
                self.consume();
                self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            },
            _ => {
                let loc = self.cur_loc();
                self.diags.report(loc, DiagCode::ErrExpectedDeclaration);
                self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            },
        }
    }

    /// `@interface Name : Super { ivars } methods @end`, and the
    /// corresponding `@implementation` with method bodies.
    fn parse_objc_interface(
        &mut self,
        is_implementation: bool,
    ) {
        let Some(name_token) = self.try_consume(TokenKind::Identifier) else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
            return;
        };
        let name = name_token.ident.expect("identifier token carries its ident");

        let super_name = if self.try_consume(TokenKind::Colon).is_some() {
            self.try_consume(TokenKind::Identifier).and_then(|t| t.ident)
        } else {
            None
        };

        // Protocol conformance list: accepted and skipped.
        if self.at(TokenKind::Less) {
            self.skip_until(&[TokenKind::Greater], SkipFlags::empty());
        }

        let interface = if is_implementation {
            let prior = self.sema.resolver.lookup(DeclName::Ident(name), LookupKind::Ordinary, &self.sema.ctx.decls);
            match prior {
                Some(decl) if matches!(self.sema.ctx.decls.decl(decl).kind, DeclKind::ObjCInterface { .. }) => {
                    let context = self.sema.translation_unit();
                    self.sema.ctx.decls.create(
                        DeclKind::ObjCImplementation {
                            interface: decl,
                        },
                        Some(DeclName::Ident(name)),
                        name_token.loc,
                        Some(context),
                        Some(context),
                    );
                    self.sema.push_context(decl);
                    decl
                },
                _ => {
                    self.diags
                        .report(name_token.loc, DiagCode::ErrUndeclaredIdentifier)
                        .arg_identifier(self.pp.idents.spelling(name));
                    self.sema.act_on_start_interface(
                        &mut self.diags,
                        &self.pp.idents,
                        name,
                        super_name,
                        name_token.loc,
                    )
                },
            }
        } else {
            self.sema.act_on_start_interface(&mut self.diags, &self.pp.idents, name, super_name, name_token.loc)
        };

        // Instance variable block.
        if self.try_consume(TokenKind::LBrace).is_some() {
            loop {
                if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                    break;
                }
                // Visibility directives inside the ivar block.
                if self.at(TokenKind::At) {
                    self.consume();
                    self.consume();
                    continue;
                }
                let Some(spec) = self.parse_decl_specifiers() else {
                    self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
                    continue;
                };
                loop {
                    let declarator = self.parse_declarator(false);
                    let base = self.sema.type_from_decl_spec(&spec);
                    let ty = self.sema.type_from_declarator(&self.pp.idents, base, &declarator);
                    if let Some(ivar_name) = declarator.name {
                        self.sema.act_on_interface_ivar(interface, ivar_name, declarator.name_loc, ty);
                    }
                    if self.try_consume(TokenKind::Comma).is_none() {
                        break;
                    }
                }
                self.expect(TokenKind::Semi);
            }
            self.expect(TokenKind::RBrace);
        }

        // Methods until @end.
        loop {
            match self.cur_kind() {
                TokenKind::Minus => self.parse_objc_method(interface, true, is_implementation),
                TokenKind::Plus => self.parse_objc_method(interface, false, is_implementation),
                TokenKind::At => {
                    let at = self.consume();
                    let keyword = self.cur().ident.and_then(|id| self.pp.idents.info(id).objc_at_keyword());
                    if keyword == Some(ObjCAtKeyword::End) {
                        self.consume();
                        break;
                    }
                    self.diags.report(at.loc, DiagCode::ErrExpectedDeclaration);
                    self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
                },
                TokenKind::Eof => break,
                _ => {
                    // Plain C declarations are legal between methods.
                    self.parse_declaration_or_function_definition();
                },
            }
        }

        self.sema.act_on_finish_interface(interface);
    }

    /// `- (type)piece:(type)arg piece:(type)arg ...` followed by `;` in an
    /// interface or a brace body in an implementation.
    fn parse_objc_method(
        &mut self,
        interface: DeclId,
        is_instance: bool,
        allow_body: bool,
    ) {
        let marker = self.consume();
        let id_ty = self.sema.ctx.types.builtins.objc_id_ty;

        let result_ty = if self.at(TokenKind::LParen) {
            self.consume();
            let ty = self.parse_type_name().unwrap_or(id_ty);
            self.expect(TokenKind::RParen);
            ty
        } else {
            id_ty
        };

        let mut pieces = Vec::new();
        let mut params: Vec<ParamInfo> = Vec::new();

        let Some(first_piece) = self.try_consume(TokenKind::Identifier) else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            return;
        };
        pieces.push(first_piece.ident.expect("identifier token carries its ident"));

        while self.try_consume(TokenKind::Colon).is_some() {
            let param_ty = if self.try_consume(TokenKind::LParen).is_some() {
                let ty = self.parse_type_name().unwrap_or(id_ty);
                self.expect(TokenKind::RParen);
                ty
            } else {
                id_ty
            };
            let param_token = self.try_consume(TokenKind::Identifier);
            params.push(ParamInfo {
                name: param_token.as_ref().and_then(|t| t.ident),
                loc: param_token.map(|t| t.loc).unwrap_or(marker.loc),
                ty: param_ty,
            });
            // Further keyword pieces.
            if self.at(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Colon {
                let piece = self.consume();
                pieces.push(piece.ident.expect("identifier token carries its ident"));
            }
        }

        let selector = if params.is_empty() {
            self.sema.ctx.selectors.get_nullary(pieces[0])
        } else {
            self.sema.ctx.selectors.get_keyword(&pieces)
        };

        let param_decls: Vec<DeclId> = params
            .iter()
            .map(|param| {
                self.sema.ctx.decls.create(
                    DeclKind::Parm {
                        ty: param.ty,
                    },
                    param.name.map(DeclName::Ident),
                    param.loc,
                    Some(interface),
                    Some(interface),
                )
            })
            .collect();

        let method =
            self.sema.act_on_objc_method(interface, selector, is_instance, result_ty, param_decls, marker.loc);

        if allow_body && self.at(TokenKind::LBrace) {
            self.sema.push_scope(ScopeFlags::FN | ScopeFlags::DECL);
            let params: Vec<DeclId> = match &self.sema.ctx.decls.decl(method).kind {
                DeclKind::ObjCMethod {
                    params, ..
                } => params.clone(),
                _ => Vec::new(),
            };
            for param in params {
                if let Some(name) = self.sema.ctx.decls.decl(param).name {
                    self.sema.resolver.push_decl(name, param);
                    self.sema.scopes.add_decl(name, param);
                }
            }
            let body = self.parse_compound_statement(false);
            if let DeclKind::ObjCMethod {
                body: stored, ..
            } = &mut self.sema.ctx.decls.decl_mut(method).kind
            {
                *stored = Some(body);
            }
            self.sema.pop_scope();
        } else {
            self.expect(TokenKind::Semi);
        }
    }

    fn parse_objc_protocol(&mut self) {
        let Some(name_token) = self.try_consume(TokenKind::Identifier) else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
            return;
        };
        let name = name_token.ident.expect("identifier token carries its ident");
        let protocol = self.sema.act_on_protocol(name, name_token.loc);

        // Method declarations inside the protocol reuse the interface
        // machinery; bodies are not allowed.
        loop {
            match self.cur_kind() {
                TokenKind::Minus => self.parse_objc_method(protocol, true, false),
                TokenKind::Plus => self.parse_objc_method(protocol, false, false),
                TokenKind::At => {
                    self.consume();
                    let keyword = self.cur().ident.and_then(|id| self.pp.idents.info(id).objc_at_keyword());
                    self.consume();
                    if keyword == Some(ObjCAtKeyword::End) {
                        break;
                    }
                },
                TokenKind::Eof => break,
                TokenKind::Semi => {
                    self.consume();
                },
                _ => {
                    self.parse_declaration_or_function_definition();
                },
            }
        }
    }

    /// `[receiver selector]` / `[receiver piece:arg piece:arg]`.
    pub(crate) fn parse_objc_message_expression(&mut self) -> ExprId {
        let lbracket = self.consume();

        // A leading identifier naming a class sends a factory message.
        let receiver = if self.at(TokenKind::Identifier) {
            let name = self.cur().ident.expect("identifier token carries its ident");
            let is_class = self
                .sema
                .resolver
                .lookup(DeclName::Ident(name), LookupKind::Ordinary, &self.sema.ctx.decls)
                .map(|d| matches!(self.sema.ctx.decls.decl(d).kind, DeclKind::ObjCInterface { .. }))
                .unwrap_or(false);
            if is_class {
                self.consume();
                None
            } else {
                Some(self.parse_expression())
            }
        } else {
            Some(self.parse_expression())
        };

        let mut pieces = Vec::new();
        let mut args: Vec<ExprId> = Vec::new();

        if let Some(piece) = self.try_consume(TokenKind::Identifier) {
            pieces.push(piece.ident.expect("identifier token carries its ident"));
            while self.try_consume(TokenKind::Colon).is_some() {
                args.push(self.parse_assignment_expression());
                if self.at(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Colon {
                    let piece = self.consume();
                    pieces.push(piece.ident.expect("identifier token carries its ident"));
                }
            }
        } else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
        }

        let rbracket = self.cur_loc();
        self.expect(TokenKind::RBracket);

        if pieces.is_empty() {
            return self.sema.error_expr(lbracket.loc);
        }
        let selector = if args.is_empty() {
            self.sema.ctx.selectors.get_nullary(pieces[0])
        } else {
            self.sema.ctx.selectors.get_keyword(&pieces)
        };

        let range = SourceRange::new(lbracket.loc, rbracket);
        self.sema.act_on_message_send(&mut self.diags, &self.pp.idents, receiver, selector, args, range)
    }
}
