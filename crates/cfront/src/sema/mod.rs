pub mod const_eval;
pub mod convert;
pub mod declspec;
pub mod expr;
pub mod objc;
pub mod overload;
pub mod template;

use tracing::debug;

use crate::ast::context::AstContext;
use crate::ast::stmt::{ExprId, StmtId, StmtKind};
use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::ident::{IdentId, IdentifierTable};
use crate::basic::source_location::{SourceLocation, SourceRange};
use crate::config::LangOptions;
use crate::decl::decl::{DeclId, DeclKind, DeclName, IdentifierNamespace, LinkageLang, StorageClass, TagKind};
use crate::decl::lookup::{IdentResolver, LookupKind};
use crate::decl::scope::{ScopeFlags, ScopeStack};
use crate::sema::declspec::{DeclSpec, Declarator, DeclaratorChunk, TypeSpecKind, TypeSpecSign, TypeSpecWidth};
use crate::types::ty::{ArraySizeModifier, QualType};

/// Semantic actions. The parser drives these after each syntactic unit;
/// they own the AST context and everything allocated into it.
pub struct Sema {
    pub ctx: AstContext,
    pub scopes: ScopeStack,
    pub resolver: IdentResolver,
    /// Stack of active declaration contexts; the translation unit is the
    /// bottom element and is never popped.
    context_stack: Vec<DeclId>,
    /// Return types of the functions being defined, innermost last.
    fn_return_types: Vec<QualType>,
    /// Same-name functions with different signatures overload instead of
    /// conflicting.
    overloading: bool,
}

impl Sema {
    pub fn new(options: &LangOptions) -> Self {
        let ctx = AstContext::new();
        let tu = ctx.decls.translation_unit();
        Self {
            ctx,
            scopes: ScopeStack::new(),
            resolver: IdentResolver::new(),
            context_stack: vec![tu],
            fn_return_types: Vec::new(),
            overloading: options.cplusplus(),
        }
    }

    pub fn translation_unit(&self) -> DeclId {
        self.ctx.decls.translation_unit()
    }

    pub fn cur_context(&self) -> DeclId {
        *self.context_stack.last().expect("context stack underflow")
    }

    pub fn push_context(
        &mut self,
        context: DeclId,
    ) {
        self.context_stack.push(context);
    }

    pub fn pop_context(&mut self) {
        assert!(self.context_stack.len() > 1, "cannot pop the translation unit context");
        self.context_stack.pop();
    }

    // ── scopes ──────────────────────────────────────────────────────────

    pub fn push_scope(
        &mut self,
        flags: ScopeFlags,
    ) {
        self.scopes.push(flags);
    }

    /// Pop the innermost scope and unshadow every name it introduced.
    pub fn pop_scope(&mut self) {
        let scope = self.scopes.pop();
        for &(name, decl) in scope.decls().iter().rev() {
            self.resolver.pop_decl(name, decl);
        }
    }

    /// Introduce a declaration into the innermost scope and make it
    /// visible.
    fn push_decl_to_scope(
        &mut self,
        name: DeclName,
        decl: DeclId,
    ) {
        self.resolver.push_decl(name, decl);
        self.scopes.add_decl(name, decl);
    }

    /// Whether `decl` was introduced in the innermost declaration scope;
    /// decides redeclaration versus shadowing.
    fn is_in_current_scope(
        &self,
        decl: DeclId,
    ) -> bool {
        self.scopes
            .innermost()
            .map(|scope| scope.decls().iter().any(|&(_, d)| d == decl))
            .unwrap_or(false)
    }

    // ── declaration specifiers ──────────────────────────────────────────

    /// Resolve accumulated specifiers to the base type they denote.
    pub fn type_from_decl_spec(
        &mut self,
        spec: &DeclSpec,
    ) -> QualType {
        let builtins = &self.ctx.types.builtins;
        let base = match spec.kind {
            TypeSpecKind::Resolved => spec.resolved.expect("resolved spec without a type"),
            TypeSpecKind::Void => builtins.void_ty,
            TypeSpecKind::Bool => builtins.bool_ty,
            TypeSpecKind::WChar => builtins.wchar_ty,
            TypeSpecKind::Char => match spec.sign {
                TypeSpecSign::Signed => builtins.schar_ty,
                TypeSpecSign::Unsigned => builtins.uchar_ty,
                TypeSpecSign::Unspecified => builtins.char_ty,
            },
            TypeSpecKind::Float => builtins.float_ty,
            TypeSpecKind::Double => {
                if spec.width == TypeSpecWidth::Long {
                    builtins.long_double_ty
                } else {
                    builtins.double_ty
                }
            },
            TypeSpecKind::Int | TypeSpecKind::Unspecified => {
                let unsigned = spec.sign == TypeSpecSign::Unsigned;
                match spec.width {
                    TypeSpecWidth::Short => {
                        if unsigned {
                            builtins.ushort_ty
                        } else {
                            builtins.short_ty
                        }
                    },
                    TypeSpecWidth::Long => {
                        if unsigned {
                            builtins.ulong_ty
                        } else {
                            builtins.long_ty
                        }
                    },
                    TypeSpecWidth::LongLong => {
                        if unsigned {
                            builtins.ulonglong_ty
                        } else {
                            builtins.longlong_ty
                        }
                    },
                    TypeSpecWidth::Unspecified => {
                        if unsigned {
                            builtins.uint_ty
                        } else {
                            builtins.int_ty
                        }
                    },
                }
            },
        };

        let base = if spec.is_complex {
            self.ctx.types.get_complex(base)
        } else {
            base
        };
        base.with_quals(spec.quals)
    }

    /// Wrap the base type with the declarator's pointer / array / function
    /// structure, innermost chunk applied last.
    pub fn type_from_declarator(
        &mut self,
        idents: &IdentifierTable,
        base: QualType,
        declarator: &Declarator,
    ) -> QualType {
        let mut ty = base;
        for chunk in declarator.chunks.iter().rev() {
            ty = match chunk {
                DeclaratorChunk::Pointer {
                    quals,
                } => self.ctx.types.get_pointer(ty).with_quals(*quals),
                DeclaratorChunk::Reference {
                    is_lvalue,
                } => self.ctx.types.get_reference(ty, *is_lvalue),
                DeclaratorChunk::Array {
                    size,
                    is_static,
                    is_star,
                    quals,
                } => {
                    let modifier = if *is_static {
                        ArraySizeModifier::Static
                    } else if *is_star {
                        ArraySizeModifier::Star
                    } else {
                        ArraySizeModifier::Normal
                    };
                    match size {
                        None => self.ctx.types.get_incomplete_array(ty, modifier, *quals),
                        Some(size_expr) => {
                            match const_eval::evaluate(&self.ctx, idents, *size_expr)
                                .and_then(|v| v.as_int())
                            {
                                Some(value) if value >= 0 => {
                                    self.ctx.types.get_constant_array(ty, value as u64, modifier, *quals)
                                },
                                _ => {
                                    if self.ctx.types.is_dependent(self.ctx.ast.expr_ty(*size_expr)) {
                                        self.ctx.types.get_dependent_sized_array(
                                            ty,
                                            Some(*size_expr),
                                            modifier,
                                            *quals,
                                        )
                                    } else {
                                        // Not foldable: a variable length array.
                                        self.ctx.types.get_variable_array(ty, *size_expr, modifier, *quals)
                                    }
                                },
                            }
                        },
                    }
                },
                DeclaratorChunk::Function {
                    params,
                    variadic,
                    is_empty,
                } => {
                    if *is_empty {
                        self.ctx.types.get_function_no_proto(ty)
                    } else {
                        let param_types: Vec<QualType> = params.iter().map(|p| p.ty).collect();
                        self.ctx.types.get_function(ty, &param_types, *variadic, Default::default())
                    }
                },
            };
        }
        ty
    }

    // ── declarations ────────────────────────────────────────────────────

    /// Process one init-declarator. Decides typedef / function / variable,
    /// performs redeclaration matching, and returns the new declaration.
    pub fn act_on_declarator(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        spec: &DeclSpec,
        declarator: &Declarator,
    ) -> Option<DeclId> {
        let base = self.type_from_decl_spec(spec);
        let ty = self.type_from_declarator(idents, base, declarator);
        let name = declarator.name?;
        let loc = declarator.name_loc;

        if spec.is_typedef {
            return Some(self.act_on_typedef_declarator(diags, idents, name, loc, ty));
        }
        if self.ctx.types.is_function_type(ty) {
            return Some(self.act_on_function_declarator(diags, idents, name, loc, ty, spec, declarator));
        }
        Some(self.act_on_variable_declarator(diags, idents, name, loc, ty, spec.storage))
    }

    pub fn act_on_variable_declarator(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        name: IdentId,
        loc: SourceLocation,
        ty: QualType,
        storage: StorageClass,
    ) -> DeclId {
        let decl_name = DeclName::Ident(name);
        let prior = self.resolver.lookup(decl_name, LookupKind::Ordinary, &self.ctx.decls);

        let context = self.cur_context();
        let decl = self.ctx.decls.create(
            DeclKind::Var {
                ty,
                storage,
                init: None,
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );

        if let Some(prior) = prior
            && self.is_in_current_scope(prior)
        {
            // Same scope: a redeclaration if the types agree, an error
            // otherwise. Either way the new declaration enters the scope.
            let prior_ty = match self.ctx.decls.decl(prior).kind {
                DeclKind::Var {
                    ty, ..
                } => Some(ty),
                _ => None,
            };
            match prior_ty {
                Some(prior_ty) if self.ctx.types.types_equal(prior_ty, ty) => {
                    self.ctx.decls.link_redeclaration(prior, decl);
                    debug!(name = idents.spelling(name), "variable redeclaration");
                },
                _ => {
                    diags
                        .report(loc, DiagCode::ErrConflictingTypes)
                        .arg_identifier(idents.spelling(name));
                    diags.report(self.ctx.decls.decl(prior).loc, DiagCode::NotePreviousDeclaration);
                },
            }
        }

        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    pub fn act_on_typedef_declarator(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        name: IdentId,
        loc: SourceLocation,
        underlying: QualType,
    ) -> DeclId {
        let decl_name = DeclName::Ident(name);
        let prior = self.resolver.lookup(decl_name, LookupKind::Ordinary, &self.ctx.decls);

        let context = self.cur_context();
        let decl = self.ctx.decls.create(
            DeclKind::Typedef {
                underlying,
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );

        if let Some(prior) = prior
            && self.is_in_current_scope(prior)
        {
            let compatible = match self.ctx.decls.decl(prior).kind {
                DeclKind::Typedef {
                    underlying: prior_underlying,
                } => self.ctx.types.types_equal(prior_underlying, underlying),
                _ => false,
            };
            if compatible {
                self.ctx.decls.link_redeclaration(prior, decl);
            } else {
                diags.report(loc, DiagCode::ErrRedefinition).arg_identifier(idents.spelling(name));
                diags.report(self.ctx.decls.decl(prior).loc, DiagCode::NotePreviousDefinition);
            }
        }

        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    pub fn act_on_function_declarator(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        name: IdentId,
        loc: SourceLocation,
        ty: QualType,
        spec: &DeclSpec,
        declarator: &Declarator,
    ) -> DeclId {
        let decl_name = DeclName::Ident(name);
        let prior = self.resolver.lookup(decl_name, LookupKind::Ordinary, &self.ctx.decls);

        let context = self.cur_context();
        let decl = self.ctx.decls.create(
            DeclKind::Function {
                ty,
                storage: spec.storage,
                is_inline: spec.is_inline,
                params: Vec::new(),
                body: None,
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );

        // Parameter declarations are created now so consumers can see the
        // prototype's names; they enter a scope only for definitions.
        if let Some(params) = declarator.function_params() {
            let param_decls: Vec<DeclId> = params
                .iter()
                .map(|param| {
                    self.ctx.decls.create(
                        DeclKind::Parm {
                            ty: param.ty,
                        },
                        param.name.map(DeclName::Ident),
                        param.loc,
                        Some(decl),
                        Some(decl),
                    )
                })
                .collect();
            if let DeclKind::Function {
                params: stored, ..
            } = &mut self.ctx.decls.decl_mut(decl).kind
            {
                *stored = param_decls;
            }
        }

        if let Some(prior) = prior {
            let prior_is_function = matches!(self.ctx.decls.decl(prior).kind, DeclKind::Function { .. });
            if prior_is_function {
                let prior_ty = match self.ctx.decls.decl(prior).kind {
                    DeclKind::Function {
                        ty, ..
                    } => ty,
                    _ => unreachable!(),
                };
                if self.function_types_compatible(prior_ty, ty) {
                    self.ctx.decls.link_redeclaration(prior, decl);
                } else if !self.is_overloadable() {
                    diags
                        .report(loc, DiagCode::ErrConflictingTypes)
                        .arg_identifier(idents.spelling(name));
                    diags.report(self.ctx.decls.decl(prior).loc, DiagCode::NotePreviousDeclaration);
                }
                // In C++ a different signature simply overloads; both stay
                // visible and calls resolve between them.
            }
        }

        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    fn is_overloadable(&self) -> bool {
        self.overloading
    }

    /// Attach an initializer, converting it to the variable's type.
    pub fn act_on_initializer(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        decl: DeclId,
        init: ExprId,
    ) {
        let var_ty = match self.ctx.decls.decl(decl).kind {
            DeclKind::Var {
                ty, ..
            } => ty,
            _ => return,
        };
        let prior_definition = self.ctx.decls.definition(decl).filter(|&d| d != decl);
        if let Some(previous) = prior_definition {
            let name = self.ctx.decls.decl_name(decl, idents).unwrap_or_default();
            diags.report(self.ctx.decls.decl(decl).loc, DiagCode::ErrRedefinition).arg_identifier(name);
            diags.report(self.ctx.decls.decl(previous).loc, DiagCode::NotePreviousDefinition);
        }
        let converted = self.convert_for_assignment(diags, idents, init, var_ty);
        if let DeclKind::Var {
            init: stored, ..
        } = &mut self.ctx.decls.decl_mut(decl).kind
        {
            *stored = Some(converted);
        }
    }

    // ── function definitions ────────────────────────────────────────────

    /// Enter a function definition: establishes the return type and
    /// declares the parameters into the just-pushed function scope.
    pub fn act_on_start_function_def(
        &mut self,
        decl: DeclId,
    ) {
        let (ty, params) = match &self.ctx.decls.decl(decl).kind {
            DeclKind::Function {
                ty,
                params,
                ..
            } => (*ty, params.clone()),
            _ => panic!("not a function declaration"),
        };
        let result = self.ctx.types.function_result_type(ty).unwrap_or(self.ctx.types.builtins.int_ty);
        self.fn_return_types.push(result);
        self.push_context(decl);

        for param in params {
            if let Some(name) = self.ctx.decls.decl(param).name {
                self.push_decl_to_scope(name, param);
            }
        }
    }

    pub fn act_on_finish_function_def(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        decl: DeclId,
        body: StmtId,
    ) {
        self.fn_return_types.pop();
        self.pop_context();

        if let Some(previous) = self.ctx.decls.definition(decl).filter(|&d| d != decl) {
            let name = self.ctx.decls.decl_name(decl, idents).unwrap_or_default();
            diags.report(self.ctx.decls.decl(decl).loc, DiagCode::ErrRedefinition).arg_identifier(name);
            diags.report(self.ctx.decls.decl(previous).loc, DiagCode::NotePreviousDefinition);
            return;
        }

        if let DeclKind::Function {
            body: stored, ..
        } = &mut self.ctx.decls.decl_mut(decl).kind
        {
            *stored = Some(body);
        }
    }

    pub fn cur_function_return_type(&self) -> Option<QualType> {
        self.fn_return_types.last().copied()
    }

    // ── tags ────────────────────────────────────────────────────────────

    /// See a `struct S` / `union U` / `enum E` reference or definition
    /// head. Returns the tag declaration, reusing or chaining with a prior
    /// one per the usual rules.
    pub fn act_on_tag(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        tag_kind: Option<TagKind>,
        name: Option<IdentId>,
        loc: SourceLocation,
        starts_definition: bool,
    ) -> DeclId {
        let context = self.cur_context();

        let make_kind = |tag_kind: Option<TagKind>| match tag_kind {
            Some(kind) => DeclKind::Record {
                tag_kind: kind,
                is_definition: false,
                fields: Vec::new(),
                ty: None,
            },
            None => DeclKind::Enum {
                is_definition: false,
                enumerators: Vec::new(),
                integer_type: None,
                ty: None,
            },
        };

        let Some(name) = name else {
            // Anonymous tags are always fresh.
            return self.ctx.decls.create(make_kind(tag_kind), None, loc, Some(context), Some(context));
        };

        let decl_name = DeclName::Ident(name);
        if let Some(prior) = self.resolver.lookup(decl_name, LookupKind::Tag, &self.ctx.decls) {
            let same_flavor = match (&self.ctx.decls.decl(prior).kind, tag_kind) {
                (
                    DeclKind::Record {
                        tag_kind: prior_kind,
                        ..
                    },
                    Some(kind),
                ) => *prior_kind == kind,
                (DeclKind::Enum { .. }, None) => true,
                _ => false,
            };
            if !same_flavor {
                diags.report(loc, DiagCode::ErrConflictingTypes).arg_identifier(idents.spelling(name));
                diags.report(self.ctx.decls.decl(prior).loc, DiagCode::NotePreviousDeclaration);
            } else if starts_definition {
                if !self.is_in_current_scope(prior) {
                    // Defining in an inner scope introduces a fresh tag
                    // that shadows the outer one.
                    let decl =
                        self.ctx.decls.create(make_kind(tag_kind), Some(decl_name), loc, Some(context), Some(context));
                    self.push_decl_to_scope(decl_name, decl);
                    return decl;
                }
                if self.ctx.decls.tag_is_defined(prior) {
                    diags.report(loc, DiagCode::ErrRedefinition).arg_identifier(idents.spelling(name));
                    let definition = self.ctx.decls.definition(prior).expect("defined tag has a definition");
                    diags.report(self.ctx.decls.decl(definition).loc, DiagCode::NotePreviousDefinition);
                } else {
                    // Completing a forward declaration: a new chain link
                    // that will carry the definition.
                    let decl =
                        self.ctx.decls.create(make_kind(tag_kind), Some(decl_name), loc, Some(context), Some(context));
                    self.ctx.decls.link_redeclaration(prior, decl);
                    return decl;
                }
            }
            return self.ctx.decls.latest_decl(prior);
        }

        let decl = self.ctx.decls.create(make_kind(tag_kind), Some(decl_name), loc, Some(context), Some(context));
        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    /// The unique Record/Enum type for a tag, created on first request so
    /// the type can circulate while the declaration is still incomplete.
    pub fn tag_type(
        &mut self,
        decl: DeclId,
    ) -> QualType {
        let canonical = self.ctx.decls.canonical_decl(decl);
        if let Some(existing) = self.ctx.decls.tag_type(canonical) {
            return QualType::unqual(existing);
        }
        let qt = match self.ctx.decls.decl(canonical).kind {
            DeclKind::Record { .. } => self.ctx.types.get_record(canonical),
            DeclKind::Enum { .. } => self.ctx.types.get_enum(canonical),
            _ => panic!("not a tag declaration"),
        };
        self.ctx.decls.set_tag_type(canonical, qt.ty());
        qt
    }

    pub fn act_on_start_tag_definition(
        &mut self,
        decl: DeclId,
    ) {
        // Install the type now so members can mention the tag itself.
        self.tag_type(decl);
        self.push_context(decl);
        match &mut self.ctx.decls.decl_mut(decl).kind {
            DeclKind::Record {
                is_definition, ..
            }
            | DeclKind::Enum {
                is_definition, ..
            } => *is_definition = true,
            _ => panic!("not a tag declaration"),
        }
    }

    pub fn act_on_field(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        record: DeclId,
        name: Option<IdentId>,
        loc: SourceLocation,
        ty: QualType,
        bit_width: Option<ExprId>,
    ) -> DeclId {
        if self.ctx.types.is_incomplete_type(ty, &self.ctx.decls)
            && let Some(name) = name
        {
            let printed = self.ctx.types.print(ty, &self.ctx.decls, idents);
            diags
                .report(loc, DiagCode::ErrFieldIncompleteType)
                .arg_identifier(idents.spelling(name))
                .arg_qualtype(printed);
        }

        if let Some(name) = name
            && self.ctx.decls.lookup_in_context(record, DeclName::Ident(name), IdentifierNamespace::MEMBER).is_some()
        {
            diags.report(loc, DiagCode::ErrRedefinition).arg_identifier(idents.spelling(name));
        }

        let field = self.ctx.decls.create(
            DeclKind::Field {
                ty,
                bit_width,
            },
            name.map(DeclName::Ident),
            loc,
            Some(record),
            Some(record),
        );
        if let DeclKind::Record {
            fields, ..
        } = &mut self.ctx.decls.decl_mut(record).kind
        {
            fields.push(field);
        }
        // In C++, members are visible as ordinary names inside the class
        // body (member function bodies resolve them through the resolver).
        if self.overloading
            && let Some(name) = name
            && self.scopes.in_class_scope()
        {
            self.push_decl_to_scope(DeclName::Ident(name), field);
        }
        field
    }

    pub fn act_on_finish_tag_definition(
        &mut self,
        decl: DeclId,
    ) {
        self.pop_context();
        // Enums settle their underlying integer type when they close.
        let int_ty = self.ctx.types.builtins.int_ty;
        if let DeclKind::Enum {
            integer_type, ..
        } = &mut self.ctx.decls.decl_mut(decl).kind
        {
            *integer_type = Some(int_ty);
        }
    }

    pub fn act_on_enum_constant(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        enum_decl: DeclId,
        name: IdentId,
        loc: SourceLocation,
        init: Option<ExprId>,
        previous: Option<DeclId>,
    ) -> DeclId {
        let int_ty = self.ctx.types.builtins.int_ty;
        let value = match init {
            Some(expr) => const_eval::evaluate(&self.ctx, idents, expr).and_then(|v| v.as_int()).unwrap_or_else(|| {
                diags.report(loc, DiagCode::ErrExprNotConstant);
                0
            }),
            None => match previous {
                Some(prev) => match self.ctx.decls.decl(prev).kind {
                    DeclKind::EnumConstant {
                        value, ..
                    } => value + 1,
                    _ => 0,
                },
                None => 0,
            },
        };

        let decl_name = DeclName::Ident(name);
        let decl = self.ctx.decls.create(
            DeclKind::EnumConstant {
                ty: int_ty,
                init,
                value,
            },
            Some(decl_name),
            loc,
            Some(enum_decl),
            Some(enum_decl),
        );
        if let DeclKind::Enum {
            enumerators, ..
        } = &mut self.ctx.decls.decl_mut(enum_decl).kind
        {
            enumerators.push(decl);
        }
        // C scoping: the enumerator is visible in the enclosing scope.
        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    // ── grouping declarations ───────────────────────────────────────────

    pub fn act_on_namespace(
        &mut self,
        name: Option<IdentId>,
        loc: SourceLocation,
    ) -> DeclId {
        let context = self.cur_context();
        let decl =
            self.ctx.decls.create(DeclKind::Namespace, name.map(DeclName::Ident), loc, Some(context), Some(context));
        if let Some(name) = name {
            self.push_decl_to_scope(DeclName::Ident(name), decl);
        }
        decl
    }

    pub fn act_on_linkage_spec(
        &mut self,
        lang: LinkageLang,
        loc: SourceLocation,
    ) -> DeclId {
        let context = self.cur_context();
        self.ctx.decls.create(
            DeclKind::LinkageSpec {
                lang,
            },
            None,
            loc,
            Some(context),
            Some(context),
        )
    }

    // ── statements ──────────────────────────────────────────────────────

    pub fn act_on_return_stmt(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        return_loc: SourceLocation,
        value: Option<ExprId>,
    ) -> StmtId {
        let return_ty = self.cur_function_return_type();
        let value = match (value, return_ty) {
            (Some(expr), Some(return_ty)) => {
                if self.ctx.types.is_void_type(return_ty) {
                    diags.report(return_loc, DiagCode::ErrReturnValueInVoid);
                    Some(expr)
                } else {
                    Some(self.convert_for_assignment(diags, idents, expr, return_ty))
                }
            },
            (None, Some(return_ty)) => {
                if !self.ctx.types.is_void_type(return_ty) {
                    diags.report(return_loc, DiagCode::WarnReturnMissingValue);
                }
                None
            },
            (value, None) => value,
        };
        self.ctx.ast.alloc_stmt(StmtKind::Return {
            value,
            return_loc,
        })
    }

    // ── small type helpers the parser leans on ──────────────────────────

    /// The sugar type a typedef name denotes.
    pub fn type_of_typedef(
        &mut self,
        decl: DeclId,
    ) -> QualType {
        let underlying = match self.ctx.decls.decl(decl).kind {
            DeclKind::Typedef {
                underlying,
            } => underlying,
            _ => panic!("not a typedef declaration"),
        };
        self.ctx.types.get_typedef(decl, underlying)
    }

    /// Parameter type adjustment (C99 6.7.5.3): arrays and functions
    /// become pointers.
    pub fn adjust_parameter_type(
        &mut self,
        ty: QualType,
    ) -> QualType {
        if let Some(element) = self.ctx.types.array_element_type(ty) {
            return self.ctx.types.get_pointer(element);
        }
        if self.ctx.types.is_function_type(ty) {
            return self.ctx.types.get_pointer(ty.without_quals());
        }
        ty
    }

    /// Wrap a just-declared function in a function template declaration.
    pub fn act_on_function_template(
        &mut self,
        params: Vec<DeclId>,
        templated: DeclId,
    ) -> DeclId {
        let context = self.cur_context();
        let name = self.ctx.decls.decl(templated).name;
        let loc = self.ctx.decls.decl(templated).loc;
        self.ctx.decls.create(
            DeclKind::FunctionTemplate {
                params,
                templated,
            },
            name,
            loc,
            Some(context),
            Some(context),
        )
    }

    /// Wrap parsed declarations in a DeclStmt.
    pub fn act_on_decl_stmt(
        &mut self,
        decls: Vec<DeclId>,
        range: SourceRange,
    ) -> StmtId {
        self.ctx.ast.alloc_stmt(StmtKind::Decl {
            decls,
            range,
        })
    }
}

impl Default for Sema {
    fn default() -> Self {
        Self::new(&LangOptions::default())
    }
}

#[cfg(test)]
#[path = "../../tests/src/sema/sema_tests.rs"]
mod tests;
