//! Objective-C declarations and message sends.

use crate::ast::stmt::{ExprData, ExprId, StmtKind, ValueCategory};
use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::ident::{IdentId, IdentifierTable};
use crate::basic::selector::SelectorId;
use crate::basic::source_location::{SourceLocation, SourceRange};
use crate::decl::decl::{DeclId, DeclKind, DeclName};
use crate::decl::lookup::LookupKind;
use crate::types::ty::QualType;

use crate::sema::Sema;

impl Sema {
    pub fn act_on_start_interface(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        name: IdentId,
        super_name: Option<IdentId>,
        loc: SourceLocation,
    ) -> DeclId {
        let super_class = super_name.and_then(|super_name| {
            let found = self.resolver.lookup(DeclName::Ident(super_name), LookupKind::Ordinary, &self.ctx.decls);
            let found = found.filter(|&d| matches!(self.ctx.decls.decl(d).kind, DeclKind::ObjCInterface { .. }));
            if found.is_none() {
                diags.report(loc, DiagCode::ErrUndeclaredIdentifier).arg_identifier(idents.spelling(super_name));
            }
            found
        });

        let context = self.cur_context();
        let decl_name = DeclName::Ident(name);
        let decl = self.ctx.decls.create(
            DeclKind::ObjCInterface {
                super_class,
                protocols: Vec::new(),
                ivars: Vec::new(),
                methods: Vec::new(),
                is_definition: true,
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );
        self.push_decl_to_scope(decl_name, decl);
        self.push_context(decl);
        decl
    }

    pub fn act_on_interface_ivar(
        &mut self,
        interface: DeclId,
        name: IdentId,
        loc: SourceLocation,
        ty: QualType,
    ) -> DeclId {
        let decl = self.ctx.decls.create(
            DeclKind::ObjCIvar {
                ty,
            },
            Some(DeclName::Ident(name)),
            loc,
            Some(interface),
            Some(interface),
        );
        if let DeclKind::ObjCInterface {
            ivars, ..
        } = &mut self.ctx.decls.decl_mut(interface).kind
        {
            ivars.push(decl);
        }
        decl
    }

    /// Declare a method and enter it into the global (selector, flavor)
    /// table so message sends can find it.
    pub fn act_on_objc_method(
        &mut self,
        interface: DeclId,
        selector: SelectorId,
        is_instance: bool,
        result_ty: QualType,
        params: Vec<DeclId>,
        loc: SourceLocation,
    ) -> DeclId {
        let decl = self.ctx.decls.create(
            DeclKind::ObjCMethod {
                selector,
                is_instance,
                result_ty,
                params,
                body: None,
            },
            Some(DeclName::Selector(selector)),
            loc,
            Some(interface),
            Some(interface),
        );
        if let DeclKind::ObjCInterface {
            methods, ..
        } = &mut self.ctx.decls.decl_mut(interface).kind
        {
            methods.push(decl);
        }
        self.ctx.decls.add_objc_method(selector, is_instance, decl);
        decl
    }

    pub fn act_on_finish_interface(
        &mut self,
        _decl: DeclId,
    ) {
        self.pop_context();
    }

    pub fn act_on_protocol(
        &mut self,
        name: IdentId,
        loc: SourceLocation,
    ) -> DeclId {
        let context = self.cur_context();
        let decl_name = DeclName::Ident(name);
        let decl = self.ctx.decls.create(
            DeclKind::ObjCProtocol {
                protocols: Vec::new(),
                methods: Vec::new(),
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );
        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    /// Type-check `[receiver selector:args...]`. The method is found
    /// through the global two-keyed method table.
    pub fn act_on_message_send(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        receiver: Option<ExprId>,
        selector: SelectorId,
        args: Vec<ExprId>,
        range: SourceRange,
    ) -> ExprId {
        let is_instance = receiver.is_some();
        let methods = self.ctx.decls.lookup_objc_method(selector, is_instance);
        let method = methods.first().copied();

        let result_ty = match method {
            Some(method) => match self.ctx.decls.decl(method).kind {
                DeclKind::ObjCMethod {
                    result_ty, ..
                } => result_ty,
                _ => self.ctx.types.builtins.objc_id_ty,
            },
            None => {
                // Unknown selector: answer `id` and let the programmer
                // know only when the dialect is strict. The table may
                // simply not have seen the interface yet.
                let name = self.ctx.selectors.name(selector, idents);
                diags.report(range.begin, DiagCode::WarnUnsupportedConstruct).arg_str(name);
                self.ctx.types.builtins.objc_id_ty
            },
        };

        let args = match method {
            Some(method) => {
                let param_types: Vec<QualType> = match &self.ctx.decls.decl(method).kind {
                    DeclKind::ObjCMethod {
                        params, ..
                    } => params
                        .iter()
                        .map(|&p| match self.ctx.decls.decl(p).kind {
                            DeclKind::Parm {
                                ty,
                            } => ty,
                            _ => self.ctx.types.builtins.objc_id_ty,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                args.into_iter()
                    .enumerate()
                    .map(|(i, arg)| match param_types.get(i) {
                        Some(&param_ty) => self.convert_for_assignment(diags, idents, arg, param_ty),
                        None => self.default_argument_promotion(arg),
                    })
                    .collect()
            },
            None => args,
        };

        self.ctx.ast.alloc_expr(StmtKind::ObjCMessage {
            data: ExprData {
                ty: result_ty,
                category: ValueCategory::RValue,
                range,
            },
            receiver,
            selector,
            args,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src/sema/objc_tests.rs"]
mod tests;
