//! Rendering types for diagnostics.
//!
//! Prints the *written* form: sugar like typedefs shows up under its own
//! name, which is the point of keeping it around.

use crate::basic::ident::IdentifierTable;
use crate::decl::decl::TagKind;
use crate::decl::table::DeclTable;
use crate::types::context::TypeContext;
use crate::types::ty::{QualType, Qualifiers, TypeKind};

impl TypeContext {
    pub fn print(
        &self,
        qt: QualType,
        decls: &DeclTable,
        idents: &IdentifierTable,
    ) -> String {
        let mut out = String::new();
        let quals = qt.quals();
        if quals.contains(Qualifiers::CONST) {
            out.push_str("const ");
        }
        if quals.contains(Qualifiers::VOLATILE) {
            out.push_str("volatile ");
        }
        if quals.contains(Qualifiers::RESTRICT) {
            out.push_str("restrict ");
        }

        match self.kind(qt) {
            TypeKind::Builtin(kind) => out.push_str(kind.name()),
            TypeKind::Complex {
                element,
            } => {
                out.push_str("_Complex ");
                out.push_str(&self.print(*element, decls, idents));
            },
            TypeKind::Pointer {
                pointee,
            } => {
                out.push_str(&self.print(*pointee, decls, idents));
                out.push_str(" *");
            },
            TypeKind::BlockPointer {
                pointee,
            } => {
                out.push_str(&self.print(*pointee, decls, idents));
                out.push_str(" ^");
            },
            TypeKind::Reference {
                pointee,
                is_lvalue,
            } => {
                out.push_str(&self.print(*pointee, decls, idents));
                out.push_str(if *is_lvalue {
                    " &"
                } else {
                    " &&"
                });
            },
            TypeKind::MemberPointer {
                pointee,
                class,
            } => {
                out.push_str(&self.print(*pointee, decls, idents));
                out.push_str(&format!(
                    " {}::*",
                    self.print(QualType::unqual(*class), decls, idents)
                ));
            },
            TypeKind::ConstantArray {
                element,
                size,
                ..
            } => {
                out.push_str(&self.print(*element, decls, idents));
                out.push_str(&format!(" [{size}]"));
            },
            TypeKind::IncompleteArray {
                element, ..
            } => {
                out.push_str(&self.print(*element, decls, idents));
                out.push_str(" []");
            },
            TypeKind::VariableArray {
                element, ..
            } => {
                out.push_str(&self.print(*element, decls, idents));
                out.push_str(" [*]");
            },
            TypeKind::DependentSizedArray {
                element, ..
            } => {
                out.push_str(&self.print(*element, decls, idents));
                out.push_str(" [<dependent>]");
            },
            TypeKind::Vector {
                element,
                num_elements,
            }
            | TypeKind::ExtVector {
                element,
                num_elements,
            } => {
                out.push_str(&format!(
                    "__vector({}, {num_elements})",
                    self.print(*element, decls, idents)
                ));
            },
            TypeKind::FunctionNoProto {
                result,
            } => {
                out.push_str(&self.print(*result, decls, idents));
                out.push_str(" ()");
            },
            TypeKind::FunctionProto {
                result,
                params,
                variadic,
                ..
            } => {
                out.push_str(&self.print(*result, decls, idents));
                out.push_str(" (");
                for (i, &param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.print(param, decls, idents));
                }
                if *variadic {
                    if !params.is_empty() {
                        out.push_str(", ");
                    }
                    out.push_str("...");
                }
                if params.is_empty() && !variadic {
                    out.push_str("void");
                }
                out.push(')');
            },
            TypeKind::Typedef {
                decl, ..
            } => out.push_str(decls.decl_name(*decl, idents).as_deref().unwrap_or("<anonymous>")),
            TypeKind::TypeOfExpr { .. } => out.push_str("typeof(<expr>)"),
            TypeKind::TypeOf {
                underlying,
            } => {
                out.push_str(&format!("typeof({})", self.print(*underlying, decls, idents)));
            },
            TypeKind::Record {
                decl,
            } => {
                let keyword = match decls.tag_kind(*decl) {
                    Some(TagKind::Union) => "union",
                    Some(TagKind::Class) => "class",
                    _ => "struct",
                };
                out.push_str(keyword);
                out.push(' ');
                out.push_str(decls.decl_name(*decl, idents).as_deref().unwrap_or("<anonymous>"));
            },
            TypeKind::Enum {
                decl,
            } => {
                out.push_str("enum ");
                out.push_str(decls.decl_name(*decl, idents).as_deref().unwrap_or("<anonymous>"));
            },
            TypeKind::TemplateTypeParm {
                name, ..
            } => match name {
                Some(name) => out.push_str(idents.spelling(*name)),
                None => out.push_str("<template parameter>"),
            },
            TypeKind::TemplateSpecialization {
                template,
                args,
            } => {
                out.push_str(decls.decl_name(*template, idents).as_deref().unwrap_or("<template>"));
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match arg {
                        crate::types::ty::TemplateArg::Type(qt) => {
                            out.push_str(&self.print(*qt, decls, idents));
                        },
                        crate::types::ty::TemplateArg::Expression(_) => out.push_str("<expr>"),
                        crate::types::ty::TemplateArg::Integral(v) => out.push_str(&v.to_string()),
                    }
                }
                out.push('>');
            },
            TypeKind::DependentName {
                qualifier,
                name,
            } => {
                for &piece in qualifier {
                    out.push_str(idents.spelling(piece));
                    out.push_str("::");
                }
                out.push_str(idents.spelling(*name));
            },
            TypeKind::ObjCInterface {
                decl, ..
            } => {
                out.push_str(decls.decl_name(*decl, idents).as_deref().unwrap_or("<interface>"));
            },
            TypeKind::ObjCQualifiedId { .. } => out.push_str("id<...>"),
            TypeKind::ExtQual {
                base,
                address_space,
                ..
            } => {
                out.push_str(&format!(
                    "__attribute__((address_space({address_space}))) {}",
                    self.print(QualType::unqual(*base), decls, idents)
                ));
            },
        }
        out
    }
}
