//! Class templates: declaration, specialization tracking, and
//! instantiation.
//!
//! Specializations are keyed by their hash-consed argument list; a written
//! specialization with concrete arguments instantiates the record at most
//! once and the specialization type's canonical form is the instantiated
//! record.

use crate::basic::diagnostic::DiagnosticsEngine;
use crate::basic::ident::{IdentId, IdentifierTable};
use crate::basic::source_location::SourceLocation;
use crate::decl::decl::{DeclId, DeclKind, DeclName};
use crate::sema::Sema;
use crate::types::ty::{QualType, TemplateArg, TypeKind};

impl Sema {
    /// Declare a class template: the parameter list plus the templated
    /// record pattern.
    pub fn act_on_class_template(
        &mut self,
        name: IdentId,
        loc: SourceLocation,
        params: Vec<DeclId>,
        templated: DeclId,
    ) -> DeclId {
        let context = self.cur_context();
        let decl_name = DeclName::Ident(name);
        let decl = self.ctx.decls.create(
            DeclKind::ClassTemplate {
                params,
                templated,
            },
            Some(decl_name),
            loc,
            Some(context),
            Some(context),
        );
        self.push_decl_to_scope(decl_name, decl);
        decl
    }

    pub fn act_on_template_type_parm(
        &mut self,
        name: Option<IdentId>,
        loc: SourceLocation,
        depth: u32,
        index: u32,
        default: Option<QualType>,
    ) -> DeclId {
        let context = self.cur_context();
        let decl = self.ctx.decls.create(
            DeclKind::TemplateTypeParm {
                depth,
                index,
                default,
            },
            name.map(DeclName::Ident),
            loc,
            Some(context),
            Some(context),
        );
        if let Some(name) = name {
            self.push_decl_to_scope(DeclName::Ident(name), decl);
        }
        decl
    }

    /// The type a template parameter declaration denotes.
    pub fn template_parm_type(
        &mut self,
        decl: DeclId,
    ) -> QualType {
        let (depth, index) = match self.ctx.decls.decl(decl).kind {
            DeclKind::TemplateTypeParm {
                depth,
                index,
                ..
            } => (depth, index),
            _ => panic!("not a template parameter"),
        };
        let name = self.ctx.decls.decl(decl).ident();
        self.ctx.types.get_template_type_parm(depth, index, name)
    }

    /// A written specialization such as `vec<int>`. Dependent arguments
    /// leave the specialization its own canonical type; concrete arguments
    /// instantiate (or re-use) the record and canonicalize to it.
    pub fn act_on_template_specialization(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        template: DeclId,
        args: Vec<TemplateArg>,
        loc: SourceLocation,
    ) -> QualType {
        let dependent = args.iter().any(|arg| match arg {
            TemplateArg::Type(qt) => self.ctx.types.is_dependent(*qt),
            TemplateArg::Expression(_) => true,
            TemplateArg::Integral(_) => false,
        });
        if dependent {
            return self.ctx.types.get_template_specialization(template, &args, None);
        }

        let instantiated = match self.ctx.decls.template_specialization(template, &args) {
            Some(existing) => existing,
            None => self.instantiate_class_template(diags, idents, template, &args, loc),
        };
        let record_ty = self.tag_type(instantiated);
        self.ctx.types.get_template_specialization(template, &args, Some(record_ty))
    }

    /// Instantiate the templated record for one concrete argument list.
    fn instantiate_class_template(
        &mut self,
        diags: &mut DiagnosticsEngine,
        idents: &IdentifierTable,
        template: DeclId,
        args: &[TemplateArg],
        loc: SourceLocation,
    ) -> DeclId {
        let templated = match self.ctx.decls.decl(template).kind {
            DeclKind::ClassTemplate {
                templated, ..
            } => templated,
            _ => panic!("not a class template"),
        };
        let pattern = self.ctx.decls.definition(templated).unwrap_or(templated);
        let (tag_kind, pattern_fields, is_defined) = match &self.ctx.decls.decl(pattern).kind {
            DeclKind::Record {
                tag_kind,
                fields,
                is_definition,
                ..
            } => (*tag_kind, fields.clone(), *is_definition),
            _ => panic!("class template pattern is not a record"),
        };

        let name = self.ctx.decls.decl(template).name;
        let context = self.translation_unit();
        let instantiated = self.ctx.decls.create(
            DeclKind::Record {
                tag_kind,
                is_definition: is_defined,
                fields: Vec::new(),
                ty: None,
            },
            name,
            loc,
            Some(context),
            Some(context),
        );
        // Record the specialization before substituting members, so a
        // recursive mention of the same specialization terminates.
        self.ctx.decls.add_template_specialization(template, args.to_vec(), instantiated);

        for field in pattern_fields {
            let (field_ty, bit_width) = match self.ctx.decls.decl(field).kind {
                DeclKind::Field {
                    ty,
                    bit_width,
                } => (ty, bit_width),
                _ => continue,
            };
            let substituted = self.substitute_type(field_ty, args);
            let field_name = self.ctx.decls.decl(field).ident();
            let field_loc = self.ctx.decls.decl(field).loc;
            self.act_on_field(diags, idents, instantiated, field_name, field_loc, substituted, bit_width);
        }

        instantiated
    }

    /// Replace template parameters in `ty` with the given arguments.
    pub fn substitute_type(
        &mut self,
        ty: QualType,
        args: &[TemplateArg],
    ) -> QualType {
        let quals = ty.quals();
        let kind = self.ctx.types.kind(ty).clone();
        let substituted = match kind {
            TypeKind::TemplateTypeParm {
                index, ..
            } => match args.get(index as usize) {
                Some(TemplateArg::Type(arg)) => *arg,
                _ => self.ctx.types.builtins.int_ty,
            },
            TypeKind::Pointer {
                pointee,
            } => {
                let pointee = self.substitute_type(pointee, args);
                self.ctx.types.get_pointer(pointee)
            },
            TypeKind::Reference {
                pointee,
                is_lvalue,
            } => {
                let pointee = self.substitute_type(pointee, args);
                self.ctx.types.get_reference(pointee, is_lvalue)
            },
            TypeKind::ConstantArray {
                element,
                size,
                size_modifier,
                index_quals,
            } => {
                let element = self.substitute_type(element, args);
                self.ctx.types.get_constant_array(element, size, size_modifier, index_quals)
            },
            TypeKind::IncompleteArray {
                element,
                size_modifier,
                index_quals,
            } => {
                let element = self.substitute_type(element, args);
                self.ctx.types.get_incomplete_array(element, size_modifier, index_quals)
            },
            TypeKind::FunctionProto {
                result,
                params,
                variadic,
                type_quals,
            } => {
                let result = self.substitute_type(result, args);
                let params: Vec<QualType> = params.iter().map(|&p| self.substitute_type(p, args)).collect();
                self.ctx.types.get_function(result, &params, variadic, type_quals)
            },
            TypeKind::TemplateSpecialization {
                template,
                args: spec_args,
            } => {
                let spec_args: Vec<TemplateArg> = spec_args
                    .iter()
                    .map(|arg| match arg {
                        TemplateArg::Type(qt) => TemplateArg::Type(self.substitute_type(*qt, args)),
                        other => other.clone(),
                    })
                    .collect();
                self.ctx.types.get_template_specialization(template, &spec_args, None)
            },
            TypeKind::Typedef {
                underlying, ..
            } => {
                // Substitution works on the meaning; the sugar does not
                // survive it.
                self.substitute_type(underlying, args)
            },
            _ => return ty,
        };
        substituted.with_quals(quals)
    }
}

#[cfg(test)]
#[path = "../../tests/src/sema/template_tests.rs"]
mod tests;
