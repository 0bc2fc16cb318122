//! Declaration parsing: specifiers, declarators, tags, templates,
//! namespaces, and function definitions.

use crate::basic::diagnostic::DiagCode;
use crate::basic::ident::IdentId;
use crate::basic::token_kinds::TokenKind;
use crate::decl::decl::{Access, DeclId, DeclKind, DeclName, LinkageLang, StorageClass, TagKind};
use crate::decl::lookup::LookupKind;
use crate::decl::scope::ScopeFlags;
use crate::parse::{Parser, SkipFlags};
use crate::sema::declspec::{
    DeclSpec, Declarator, DeclaratorChunk, ParamInfo, TypeSpecKind, TypeSpecSign, TypeSpecWidth,
};
use crate::types::ty::{QualType, Qualifiers, TemplateArg};

impl Parser {
    pub(crate) fn parse_external_declaration(&mut self) {
        match self.cur_kind() {
            TokenKind::Semi => {
                self.consume();
            },
            TokenKind::KwNamespace => self.parse_namespace(),
            TokenKind::KwTemplate => self.parse_template_declaration(),
            TokenKind::At => self.parse_objc_at_directive(),
            TokenKind::KwExtern if self.peek(1).kind == TokenKind::StringLiteral => self.parse_linkage_spec(),
            _ => {
                self.parse_declaration_or_function_definition();
            },
        }
    }

    /// A simple-declaration or a function definition, disambiguated after
    /// the first declarator.
    pub(crate) fn parse_declaration_or_function_definition(&mut self) -> Vec<DeclId> {
        let Some(spec) = self.parse_decl_specifiers() else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedDeclaration);
            if !self.skip_until(&[TokenKind::Semi], SkipFlags::empty()) {
                // A stray closer; eat one token so the caller makes
                // progress.
                if !self.at(TokenKind::Eof) {
                    self.consume();
                }
            }
            return Vec::new();
        };

        // `struct S;` and friends: a tag declaration with no declarator.
        if self.at(TokenKind::Semi) {
            self.consume();
            return Vec::new();
        }

        let declarator = self.parse_declarator(false);

        // A function declarator followed by `{` is a definition.
        if declarator.is_function() && self.at(TokenKind::LBrace) {
            if let Some(decl) = self.parse_function_definition(&spec, &declarator) {
                return vec![decl];
            }
            return Vec::new();
        }

        self.parse_init_declarator_list(spec, declarator)
    }

    fn parse_function_definition(
        &mut self,
        spec: &DeclSpec,
        declarator: &Declarator,
    ) -> Option<DeclId> {
        let decl = self.sema.act_on_declarator(&mut self.diags, &self.pp.idents, spec, declarator)?;

        self.sema.push_scope(ScopeFlags::FN | ScopeFlags::DECL);
        self.sema.act_on_start_function_def(decl);
        let body = self.parse_compound_statement(false);
        self.sema.act_on_finish_function_def(&mut self.diags, &self.pp.idents, decl, body);
        self.sema.pop_scope();
        Some(decl)
    }

    /// The declarators of one declaration, with initializers.
    fn parse_init_declarator_list(
        &mut self,
        spec: DeclSpec,
        first: Declarator,
    ) -> Vec<DeclId> {
        let mut decls = Vec::new();
        let mut declarator = first;
        loop {
            if let Some(decl) = self.sema.act_on_declarator(&mut self.diags, &self.pp.idents, &spec, &declarator) {
                if self.try_consume(TokenKind::Equal).is_some() {
                    let init = self.parse_initializer();
                    self.sema.act_on_initializer(&mut self.diags, &self.pp.idents, decl, init);
                }
                decls.push(decl);
            } else {
                let loc = self.cur_loc();
                self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
            }

            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
            declarator = self.parse_declarator(false);
        }

        if self.expect(TokenKind::Semi).is_none() {
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
        }
        decls
    }

    // ── declaration specifiers ──────────────────────────────────────────

    /// Accumulate declaration specifiers. `None` when the stream does not
    /// start a declaration.
    pub(crate) fn parse_decl_specifiers(&mut self) -> Option<DeclSpec> {
        let mut spec = DeclSpec {
            loc: self.cur_loc(),
            ..Default::default()
        };
        let mut any = false;

        loop {
            match self.cur_kind() {
                TokenKind::KwConst => {
                    spec.quals |= Qualifiers::CONST;
                    self.consume();
                },
                TokenKind::KwVolatile => {
                    spec.quals |= Qualifiers::VOLATILE;
                    self.consume();
                },
                TokenKind::KwRestrict => {
                    spec.quals |= Qualifiers::RESTRICT;
                    self.consume();
                },
                TokenKind::KwTypedef => {
                    spec.is_typedef = true;
                    self.consume();
                },
                TokenKind::KwInline => {
                    spec.is_inline = true;
                    self.consume();
                },
                TokenKind::KwExtern => {
                    spec.storage = StorageClass::Extern;
                    self.consume();
                },
                TokenKind::KwStatic => {
                    spec.storage = StorageClass::Static;
                    self.consume();
                },
                TokenKind::KwAuto => {
                    spec.storage = StorageClass::Auto;
                    self.consume();
                },
                TokenKind::KwRegister => {
                    spec.storage = StorageClass::Register;
                    self.consume();
                },
                TokenKind::KwVoid => {
                    spec.kind = TypeSpecKind::Void;
                    self.consume();
                },
                TokenKind::KwChar => {
                    spec.kind = TypeSpecKind::Char;
                    self.consume();
                },
                TokenKind::KwInt => {
                    spec.kind = TypeSpecKind::Int;
                    self.consume();
                },
                TokenKind::KwFloat => {
                    spec.kind = TypeSpecKind::Float;
                    self.consume();
                },
                TokenKind::KwDouble => {
                    spec.kind = TypeSpecKind::Double;
                    self.consume();
                },
                TokenKind::KwBool => {
                    spec.kind = TypeSpecKind::Bool;
                    self.consume();
                },
                TokenKind::KwWchar => {
                    spec.kind = TypeSpecKind::WChar;
                    self.consume();
                },
                TokenKind::KwShort => {
                    spec.width = TypeSpecWidth::Short;
                    self.consume();
                },
                TokenKind::KwLong => {
                    spec.width = if spec.width == TypeSpecWidth::Long {
                        TypeSpecWidth::LongLong
                    } else {
                        TypeSpecWidth::Long
                    };
                    self.consume();
                },
                TokenKind::KwSigned => {
                    spec.sign = TypeSpecSign::Signed;
                    self.consume();
                },
                TokenKind::KwUnsigned => {
                    spec.sign = TypeSpecSign::Unsigned;
                    self.consume();
                },
                TokenKind::KwComplex => {
                    spec.is_complex = true;
                    self.consume();
                },
                TokenKind::KwStruct | TokenKind::KwUnion | TokenKind::KwClass | TokenKind::KwEnum => {
                    let ty = self.parse_tag_specifier();
                    spec.kind = TypeSpecKind::Resolved;
                    spec.resolved = Some(ty);
                },
                TokenKind::KwTypeof => {
                    let ty = self.parse_typeof_specifier();
                    spec.kind = TypeSpecKind::Resolved;
                    spec.resolved = Some(ty);
                },
                TokenKind::Identifier if spec.kind == TypeSpecKind::Unspecified
                    && spec.sign == TypeSpecSign::Unspecified
                    && spec.width == TypeSpecWidth::Unspecified =>
                {
                    let token = self.cur();
                    let name = token.ident.expect("identifier token carries its ident");
                    let Some(ty) = self.try_parse_type_name_specifier(name) else {
                        break;
                    };
                    spec.kind = TypeSpecKind::Resolved;
                    spec.resolved = Some(ty);
                },
                _ => break,
            }
            any = true;
        }

        any.then_some(spec)
    }

    /// Objective-C's `id` is a type name with no declaration behind it.
    pub(crate) fn is_objc_id_name(
        &mut self,
        name: IdentId,
    ) -> bool {
        self.pp.lang.objc
            && self.pp.idents.spelling(name) == "id"
            && self
                .sema
                .resolver
                .lookup(DeclName::Ident(name), LookupKind::Ordinary, &self.sema.ctx.decls)
                .is_none()
    }

    /// Resolve an identifier in type position: typedef names, template
    /// parameters, template specializations, and (C++/ObjC) type names.
    fn try_parse_type_name_specifier(
        &mut self,
        name: IdentId,
    ) -> Option<QualType> {
        if self.is_objc_id_name(name) {
            self.consume();
            return Some(self.sema.ctx.types.builtins.objc_id_ty);
        }
        let decl = self.lookup_type_name(name)?;
        match self.sema.ctx.decls.decl(decl).kind {
            DeclKind::Typedef { .. } => {
                self.consume();
                Some(self.sema.type_of_typedef(decl))
            },
            DeclKind::TemplateTypeParm { .. } => {
                self.consume();
                Some(self.sema.template_parm_type(decl))
            },
            DeclKind::ClassTemplate { .. } => {
                if self.peek(1).kind != TokenKind::Less {
                    return None;
                }
                let loc = self.consume().loc;
                self.consume();
                let args = self.parse_template_argument_list();
                Some(self.sema.act_on_template_specialization(&mut self.diags, &self.pp.idents, decl, args, loc))
            },
            DeclKind::Record { .. } | DeclKind::Enum { .. } => {
                self.consume();
                Some(self.sema.tag_type(decl))
            },
            DeclKind::ObjCInterface { .. } => {
                self.consume();
                Some(self.sema.ctx.types.get_objc_interface(decl, &[]))
            },
            _ => None,
        }
    }

    /// Whether an identifier currently names a type, and through which
    /// declaration.
    pub(crate) fn lookup_type_name(
        &mut self,
        name: IdentId,
    ) -> Option<DeclId> {
        let decls = &self.sema.ctx.decls;
        if let Some(decl) = self.sema.resolver.lookup(DeclName::Ident(name), LookupKind::Ordinary, decls) {
            match decls.decl(decl).kind {
                DeclKind::Typedef { .. }
                | DeclKind::TemplateTypeParm { .. }
                | DeclKind::ClassTemplate { .. }
                | DeclKind::ObjCInterface { .. } => return Some(decl),
                _ => return None,
            }
        }
        // C++ lets class and enum names stand alone as type names.
        if self.pp.lang.cplusplus() {
            let decls = &self.sema.ctx.decls;
            if let Some(decl) = self.sema.resolver.lookup(DeclName::Ident(name), LookupKind::Tag, decls) {
                return Some(decl);
            }
        }
        None
    }

    /// `typeof(expr)` and `typeof(type)` (GNU).
    fn parse_typeof_specifier(&mut self) -> QualType {
        self.consume();
        let int_ty = self.sema.ctx.types.builtins.int_ty;
        if self.expect(TokenKind::LParen).is_none() {
            return int_ty;
        }
        let ty = if self.starts_type_name() {
            let ty = self.parse_type_name().unwrap_or(int_ty);
            self.sema.ctx.types.get_typeof(ty)
        } else {
            let expr = self.parse_expression();
            let underlying = self.sema.ctx.ast.expr_ty(expr);
            self.sema.ctx.types.get_typeof_expr(expr, underlying)
        };
        self.expect(TokenKind::RParen);
        ty
    }

    /// Whether the current token can begin a type-name (used by casts,
    /// sizeof, and the declaration/expression disambiguation).
    pub(crate) fn starts_type_name(&mut self) -> bool {
        match self.cur_kind() {
            TokenKind::KwVoid
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
            | TokenKind::KwTypeof => true,
            TokenKind::Identifier => {
                let name = self.cur().ident.expect("identifier token carries its ident");
                self.is_objc_id_name(name) || self.lookup_type_name(name).is_some()
            },
            _ => false,
        }
    }

    /// type-name: specifier-qualifier-list abstract-declarator.
    pub(crate) fn parse_type_name(&mut self) -> Option<QualType> {
        let spec = self.parse_decl_specifiers()?;
        let declarator = self.parse_declarator(true);
        let base = self.sema.type_from_decl_spec(&spec);
        Some(self.sema.type_from_declarator(&self.pp.idents, base, &declarator))
    }

    // ── declarators ─────────────────────────────────────────────────────

    /// Parse a (possibly abstract) declarator. Chunks end up ordered from
    /// the declared name outward.
    pub(crate) fn parse_declarator(
        &mut self,
        abstract_allowed: bool,
    ) -> Declarator {
        let mut prefixes: Vec<DeclaratorChunk> = Vec::new();
        loop {
            match self.cur_kind() {
                TokenKind::Star => {
                    self.consume();
                    let mut quals = Qualifiers::empty();
                    loop {
                        match self.cur_kind() {
                            TokenKind::KwConst => {
                                quals |= Qualifiers::CONST;
                                self.consume();
                            },
                            TokenKind::KwVolatile => {
                                quals |= Qualifiers::VOLATILE;
                                self.consume();
                            },
                            TokenKind::KwRestrict => {
                                quals |= Qualifiers::RESTRICT;
                                self.consume();
                            },
                            _ => break,
                        }
                    }
                    prefixes.push(DeclaratorChunk::Pointer {
                        quals,
                    });
                },
                TokenKind::Amp => {
                    self.consume();
                    prefixes.push(DeclaratorChunk::Reference {
                        is_lvalue: true,
                    });
                },
                _ => break,
            }
        }

        let mut declarator = Declarator::default();

        match self.cur_kind() {
            TokenKind::Identifier => {
                let token = self.consume();
                declarator.name = token.ident;
                declarator.name_loc = token.loc;
            },
            TokenKind::LParen if self.is_grouping_paren() => {
                self.consume();
                declarator = self.parse_declarator(abstract_allowed);
                self.expect(TokenKind::RParen);
            },
            _ => {
                if !abstract_allowed {
                    let loc = self.cur_loc();
                    self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
                }
            },
        }

        let mut suffixes: Vec<DeclaratorChunk> = Vec::new();
        loop {
            match self.cur_kind() {
                TokenKind::LParen => {
                    suffixes.push(self.parse_function_declarator_suffix());
                },
                TokenKind::LBracket => {
                    self.consume();
                    let mut quals = Qualifiers::empty();
                    let mut is_static = false;
                    loop {
                        match self.cur_kind() {
                            TokenKind::KwConst => {
                                quals |= Qualifiers::CONST;
                                self.consume();
                            },
                            TokenKind::KwVolatile => {
                                quals |= Qualifiers::VOLATILE;
                                self.consume();
                            },
                            TokenKind::KwRestrict => {
                                quals |= Qualifiers::RESTRICT;
                                self.consume();
                            },
                            TokenKind::KwStatic => {
                                is_static = true;
                                self.consume();
                            },
                            _ => break,
                        }
                    }
                    let is_star = self.at(TokenKind::Star) && self.peek(1).kind == TokenKind::RBracket;
                    if is_star {
                        self.consume();
                    }
                    let size = if self.at(TokenKind::RBracket) {
                        None
                    } else {
                        Some(self.parse_assignment_expression())
                    };
                    self.expect(TokenKind::RBracket);
                    suffixes.push(DeclaratorChunk::Array {
                        size,
                        is_static,
                        is_star,
                        quals,
                    });
                },
                _ => break,
            }
        }

        declarator.chunks.extend(suffixes);
        prefixes.reverse();
        declarator.chunks.extend(prefixes);
        declarator
    }

    /// Decide whether a `(` after the declarator head groups an inner
    /// declarator rather than opening a parameter list.
    fn is_grouping_paren(&mut self) -> bool {
        match self.peek(1).kind {
            TokenKind::Star | TokenKind::Amp => true,
            TokenKind::Identifier => {
                let name = self.peek(1).ident.expect("identifier token carries its ident");
                self.lookup_type_name(name).is_none()
            },
            _ => false,
        }
    }

    fn parse_function_declarator_suffix(&mut self) -> DeclaratorChunk {
        self.consume();

        if self.at(TokenKind::RParen) {
            self.consume();
            // `()` declares no prototype in C but an empty one in C++.
            return DeclaratorChunk::Function {
                params: Vec::new(),
                variadic: false,
                is_empty: !self.pp.lang.cplusplus(),
            };
        }

        // `(void)` is the explicit empty prototype.
        if self.at(TokenKind::KwVoid) && self.peek(1).kind == TokenKind::RParen {
            self.consume();
            self.consume();
            return DeclaratorChunk::Function {
                params: Vec::new(),
                variadic: false,
                is_empty: false,
            };
        }

        self.sema.push_scope(ScopeFlags::FUNCTION_PROTOTYPE | ScopeFlags::DECL);
        let mut params = Vec::new();
        let mut variadic = false;
        loop {
            if self.at(TokenKind::Ellipsis) {
                self.consume();
                variadic = true;
                break;
            }

            let Some(spec) = self.parse_decl_specifiers() else {
                let loc = self.cur_loc();
                self.diags.report(loc, DiagCode::ErrExpectedTypeName);
                self.skip_until(&[TokenKind::RParen], SkipFlags::DONT_CONSUME);
                break;
            };
            let declarator = self.parse_declarator(true);
            let base = self.sema.type_from_decl_spec(&spec);
            let ty = self.sema.type_from_declarator(&self.pp.idents, base, &declarator);
            let ty = self.sema.adjust_parameter_type(ty);
            params.push(ParamInfo {
                name: declarator.name,
                loc: declarator.name_loc,
                ty,
            });

            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.sema.pop_scope();
        self.expect(TokenKind::RParen);

        DeclaratorChunk::Function {
            params,
            variadic,
            is_empty: false,
        }
    }

    // ── tags ────────────────────────────────────────────────────────────

    /// struct/union/class/enum specifier, with an optional body.
    fn parse_tag_specifier(&mut self) -> QualType {
        let keyword = self.consume();
        let tag_kind = match keyword.kind {
            TokenKind::KwStruct => Some(TagKind::Struct),
            TokenKind::KwUnion => Some(TagKind::Union),
            TokenKind::KwClass => Some(TagKind::Class),
            TokenKind::KwEnum => None,
            _ => unreachable!("caller checked the keyword"),
        };

        let name = if self.at(TokenKind::Identifier) {
            let token = self.consume();
            token.ident
        } else {
            None
        };

        let starts_definition = self.at(TokenKind::LBrace);
        let decl =
            self.sema.act_on_tag(&mut self.diags, &self.pp.idents, tag_kind, name, keyword.loc, starts_definition);
        let ty = self.sema.tag_type(decl);

        if starts_definition && !self.sema.ctx.decls.decl(decl).kind.is_definition() {
            match tag_kind {
                Some(_) => self.parse_record_body(decl),
                None => self.parse_enum_body(decl),
            }
        } else if starts_definition {
            // Redefinition was diagnosed; skip the body.
            self.consume();
            self.skip_until(&[TokenKind::RBrace], SkipFlags::empty());
        }

        ty
    }

    fn parse_record_body(
        &mut self,
        record: DeclId,
    ) {
        self.sema.act_on_start_tag_definition(record);
        self.sema.push_scope(ScopeFlags::CLASS | ScopeFlags::DECL);
        self.consume();

        let mut access = if self.sema.ctx.decls.tag_kind(record) == Some(TagKind::Class) {
            Access::Private
        } else {
            Access::Public
        };

        loop {
            match self.cur_kind() {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Semi => {
                    self.consume();
                },
                TokenKind::KwPublic | TokenKind::KwProtected | TokenKind::KwPrivate => {
                    access = match self.consume().kind {
                        TokenKind::KwPublic => Access::Public,
                        TokenKind::KwProtected => Access::Protected,
                        _ => Access::Private,
                    };
                    self.expect(TokenKind::Colon);
                },
                _ => self.parse_member_declaration(record, access),
            }
        }

        self.expect(TokenKind::RBrace);
        self.sema.pop_scope();
        self.sema.act_on_finish_tag_definition(record);
    }

    fn parse_member_declaration(
        &mut self,
        record: DeclId,
        access: Access,
    ) {
        let Some(spec) = self.parse_decl_specifiers() else {
            let loc = self.cur_loc();
            self.diags.report(loc, DiagCode::ErrExpectedDeclaration);
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            return;
        };

        if self.at(TokenKind::Semi) {
            // A bare tag member, e.g. a nested `struct T { ... };`.
            self.consume();
            return;
        }

        loop {
            // Anonymous bitfield: `: width`.
            if self.at(TokenKind::Colon) {
                self.consume();
                let width = self.parse_assignment_expression();
                let base = self.sema.type_from_decl_spec(&spec);
                let loc = self.cur_loc();
                let field =
                    self.sema.act_on_field(&mut self.diags, &self.pp.idents, record, None, loc, base, Some(width));
                self.sema.ctx.decls.decl_mut(field).access = access;
            } else {
                let declarator = self.parse_declarator(false);
                let base = self.sema.type_from_decl_spec(&spec);
                let ty = self.sema.type_from_declarator(&self.pp.idents, base, &declarator);

                if declarator.is_function() {
                    // Member function: declaration now; an inline body is
                    // parsed as a definition in place.
                    if let Some(name) = declarator.name {
                        let decl = self.sema.act_on_function_declarator(
                            &mut self.diags,
                            &self.pp.idents,
                            name,
                            declarator.name_loc,
                            ty,
                            &spec,
                            &declarator,
                        );
                        self.sema.ctx.decls.decl_mut(decl).access = access;
                        if self.at(TokenKind::LBrace) {
                            self.sema.push_scope(ScopeFlags::FN | ScopeFlags::DECL);
                            self.sema.act_on_start_function_def(decl);
                            let body = self.parse_compound_statement(false);
                            self.sema.act_on_finish_function_def(&mut self.diags, &self.pp.idents, decl, body);
                            self.sema.pop_scope();
                            return;
                        }
                    }
                } else {
                    let width = if self.try_consume(TokenKind::Colon).is_some() {
                        Some(self.parse_assignment_expression())
                    } else {
                        None
                    };
                    let field = self.sema.act_on_field(
                        &mut self.diags,
                        &self.pp.idents,
                        record,
                        declarator.name,
                        declarator.name_loc,
                        ty,
                        width,
                    );
                    self.sema.ctx.decls.decl_mut(field).access = access;
                }
            }

            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
        }

        if self.expect(TokenKind::Semi).is_none() {
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
        }
    }

    fn parse_enum_body(
        &mut self,
        enum_decl: DeclId,
    ) {
        self.sema.act_on_start_tag_definition(enum_decl);
        self.consume();

        let mut previous = None;
        loop {
            if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                break;
            }
            let Some(token) = self.try_consume(TokenKind::Identifier) else {
                let loc = self.cur_loc();
                self.diags.report(loc, DiagCode::ErrExpectedIdentifier);
                self.skip_until(&[TokenKind::RBrace], SkipFlags::DONT_CONSUME);
                break;
            };
            let name = token.ident.expect("identifier token carries its ident");

            let init = if self.try_consume(TokenKind::Equal).is_some() {
                Some(self.parse_assignment_expression())
            } else {
                None
            };

            let constant = self.sema.act_on_enum_constant(
                &mut self.diags,
                &self.pp.idents,
                enum_decl,
                name,
                token.loc,
                init,
                previous,
            );
            previous = Some(constant);

            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::RBrace);
        self.sema.act_on_finish_tag_definition(enum_decl);
    }

    // ── namespaces and linkage specifications ───────────────────────────

    fn parse_namespace(&mut self) {
        let keyword = self.consume();
        let name = self.try_consume(TokenKind::Identifier).and_then(|t| t.ident);
        let decl = self.sema.act_on_namespace(name, keyword.loc);

        if self.expect(TokenKind::LBrace).is_none() {
            return;
        }
        self.sema.push_context(decl);
        self.sema.push_scope(ScopeFlags::DECL);
        loop {
            if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                break;
            }
            self.parse_external_declaration();
        }
        self.sema.pop_scope();
        self.sema.pop_context();
        self.expect(TokenKind::RBrace);
    }

    fn parse_linkage_spec(&mut self) {
        let keyword = self.consume();
        let lang_token = self.consume();
        let lang = if self.spelling(&lang_token).contains("C++") {
            LinkageLang::Cxx
        } else {
            LinkageLang::C
        };
        let decl = self.sema.act_on_linkage_spec(lang, keyword.loc);
        self.sema.push_context(decl);
        if self.try_consume(TokenKind::LBrace).is_some() {
            loop {
                if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                    break;
                }
                self.parse_external_declaration();
            }
            self.expect(TokenKind::RBrace);
        } else {
            self.parse_external_declaration();
        }
        self.sema.pop_context();
    }

    // ── templates ───────────────────────────────────────────────────────

    fn parse_template_declaration(&mut self) {
        self.consume();
        if self.expect(TokenKind::Less).is_none() {
            self.skip_until(&[TokenKind::Semi], SkipFlags::empty());
            return;
        }

        self.sema.push_scope(ScopeFlags::TEMPLATE_PARAM | ScopeFlags::DECL);
        let mut params = Vec::new();
        let mut index = 0u32;
        loop {
            match self.cur_kind() {
                TokenKind::Greater | TokenKind::Eof => break,
                TokenKind::KwTypename | TokenKind::KwClass => {
                    self.consume();
                    let name_token = self.try_consume(TokenKind::Identifier);
                    let name = name_token.as_ref().and_then(|t| t.ident);
                    let loc = name_token.map(|t| t.loc).unwrap_or_else(|| self.cur_loc());
                    let default = if self.try_consume(TokenKind::Equal).is_some() {
                        self.parse_type_name()
                    } else {
                        None
                    };
                    let parm = self.sema.act_on_template_type_parm(name, loc, 0, index, default);
                    params.push(parm);
                    index += 1;
                },
                _ => {
                    // Non-type parameters are accepted syntactically and
                    // skipped.
                    self.skip_until(&[TokenKind::Comma, TokenKind::Greater], SkipFlags::DONT_CONSUME);
                },
            }
            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater);

        // The templated entity: a class definition or a function.
        if matches!(self.cur_kind(), TokenKind::KwClass | TokenKind::KwStruct | TokenKind::KwUnion) {
            let ty = self.parse_tag_specifier();
            self.expect(TokenKind::Semi);
            if let crate::types::ty::TypeKind::Record {
                decl,
            } = self.sema.ctx.types.kind(ty)
            {
                let record = *decl;
                self.sema.pop_scope();
                if let Some(name) = self.sema.ctx.decls.decl(record).ident() {
                    let loc = self.sema.ctx.decls.decl(record).loc;
                    self.sema.act_on_class_template(name, loc, params, record);
                }
                return;
            }
        } else {
            let decls = self.parse_declaration_or_function_definition();
            self.sema.pop_scope();
            if let Some(&first) = decls.first()
                && matches!(self.sema.ctx.decls.decl(first).kind, DeclKind::Function { .. })
            {
                self.sema.act_on_function_template(params, first);
            }
            return;
        }
        self.sema.pop_scope();
    }

    /// `<` has been consumed; parse arguments up to the closing `>`.
    pub(crate) fn parse_template_argument_list(&mut self) -> Vec<TemplateArg> {
        let mut args = Vec::new();
        loop {
            if self.at(TokenKind::Greater) || self.at(TokenKind::Eof) {
                break;
            }
            if self.starts_type_name() {
                match self.parse_type_name() {
                    Some(ty) => args.push(TemplateArg::Type(ty)),
                    None => break,
                }
            } else {
                let expr = self.parse_assignment_expression();
                match crate::sema::const_eval::evaluate(&self.sema.ctx, &self.pp.idents, expr)
                    .and_then(|v| v.as_int())
                {
                    Some(value) => args.push(TemplateArg::Integral(value)),
                    None => args.push(TemplateArg::Expression(expr)),
                }
            }
            if self.try_consume(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater);
        args
    }

    /// Initializer: assignment expression or braced list.
    pub(crate) fn parse_initializer(&mut self) -> crate::ast::stmt::ExprId {
        if self.at(TokenKind::LBrace) {
            let lbrace = self.consume();
            let mut inits = Vec::new();
            loop {
                if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                    break;
                }
                inits.push(self.parse_initializer());
                if self.try_consume(TokenKind::Comma).is_none() {
                    break;
                }
            }
            let rbrace = self.cur_loc();
            self.expect(TokenKind::RBrace);
            let range = crate::basic::source_location::SourceRange::new(lbrace.loc, rbrace);
            return self.sema.act_on_init_list(inits, range);
        }
        self.parse_assignment_expression()
    }
}
