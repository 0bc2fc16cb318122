//! Type allocation, uniquing, and canonicalization.
//!
//! Every type is constructed exactly once per canonical identity: the
//! `get_*` constructors intern by a value key, so type equality on
//! canonical forms is handle equality. Canonical handles are computed at
//! construction time by recursively canonicalizing components.

use std::collections::HashMap;

use crate::ast::stmt::ExprId;
use crate::basic::ident::IdentId;
use crate::decl::decl::DeclId;
use crate::types::ty::{
    ArraySizeModifier, BuiltinKind, GcAttr, QualType, Qualifiers, TemplateArg, Type, TypeId, TypeKind,
};

/// Interning key. Only types whose identity is a pure value function of
/// their components appear here; variable and dependent-sized arrays are
/// allocated fresh each time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TypeKey {
    Builtin(BuiltinKind),
    Complex(QualType),
    Pointer(QualType),
    BlockPointer(QualType),
    Reference(QualType, bool),
    MemberPointer(QualType, TypeId),
    ConstantArray(QualType, u64, ArraySizeModifier, Qualifiers),
    IncompleteArray(QualType, ArraySizeModifier, Qualifiers),
    Vector(QualType, u32, bool),
    FunctionNoProto(QualType),
    FunctionProto(QualType, Vec<QualType>, bool, Qualifiers),
    Typedef(DeclId),
    TypeOf(QualType),
    Record(DeclId),
    Enum(DeclId),
    TemplateTypeParm(u32, u32),
    TemplateSpecialization(DeclId, Vec<TemplateArg>),
    DependentName(Vec<IdentId>, IdentId),
    ObjCInterface(DeclId, Vec<DeclId>),
    ObjCQualifiedId(Vec<DeclId>),
    ExtQual(TypeId, u32, GcAttr),
}

/// Pre-allocated handles for every builtin type.
pub struct BuiltinTypes {
    pub void_ty: QualType,
    pub bool_ty: QualType,
    pub char_ty: QualType,
    pub schar_ty: QualType,
    pub uchar_ty: QualType,
    pub wchar_ty: QualType,
    pub short_ty: QualType,
    pub ushort_ty: QualType,
    pub int_ty: QualType,
    pub uint_ty: QualType,
    pub long_ty: QualType,
    pub ulong_ty: QualType,
    pub longlong_ty: QualType,
    pub ulonglong_ty: QualType,
    pub float_ty: QualType,
    pub double_ty: QualType,
    pub long_double_ty: QualType,
    pub objc_id_ty: QualType,
    pub objc_sel_ty: QualType,
}

pub struct TypeContext {
    types: Vec<Type>,
    interned: HashMap<TypeKey, TypeId>,
    pub builtins: BuiltinTypes,
}

impl TypeContext {
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            interned: HashMap::new(),
            builtins: BuiltinTypes {
                void_ty: QualType::unqual(TypeId(0)),
                bool_ty: QualType::unqual(TypeId(0)),
                char_ty: QualType::unqual(TypeId(0)),
                schar_ty: QualType::unqual(TypeId(0)),
                uchar_ty: QualType::unqual(TypeId(0)),
                wchar_ty: QualType::unqual(TypeId(0)),
                short_ty: QualType::unqual(TypeId(0)),
                ushort_ty: QualType::unqual(TypeId(0)),
                int_ty: QualType::unqual(TypeId(0)),
                uint_ty: QualType::unqual(TypeId(0)),
                long_ty: QualType::unqual(TypeId(0)),
                ulong_ty: QualType::unqual(TypeId(0)),
                longlong_ty: QualType::unqual(TypeId(0)),
                ulonglong_ty: QualType::unqual(TypeId(0)),
                float_ty: QualType::unqual(TypeId(0)),
                double_ty: QualType::unqual(TypeId(0)),
                long_double_ty: QualType::unqual(TypeId(0)),
                objc_id_ty: QualType::unqual(TypeId(0)),
                objc_sel_ty: QualType::unqual(TypeId(0)),
            },
        };
        ctx.builtins.void_ty = ctx.get_builtin(BuiltinKind::Void);
        ctx.builtins.bool_ty = ctx.get_builtin(BuiltinKind::Bool);
        ctx.builtins.char_ty = ctx.get_builtin(BuiltinKind::Char);
        ctx.builtins.schar_ty = ctx.get_builtin(BuiltinKind::SChar);
        ctx.builtins.uchar_ty = ctx.get_builtin(BuiltinKind::UChar);
        ctx.builtins.wchar_ty = ctx.get_builtin(BuiltinKind::WChar);
        ctx.builtins.short_ty = ctx.get_builtin(BuiltinKind::Short);
        ctx.builtins.ushort_ty = ctx.get_builtin(BuiltinKind::UShort);
        ctx.builtins.int_ty = ctx.get_builtin(BuiltinKind::Int);
        ctx.builtins.uint_ty = ctx.get_builtin(BuiltinKind::UInt);
        ctx.builtins.long_ty = ctx.get_builtin(BuiltinKind::Long);
        ctx.builtins.ulong_ty = ctx.get_builtin(BuiltinKind::ULong);
        ctx.builtins.longlong_ty = ctx.get_builtin(BuiltinKind::LongLong);
        ctx.builtins.ulonglong_ty = ctx.get_builtin(BuiltinKind::ULongLong);
        ctx.builtins.float_ty = ctx.get_builtin(BuiltinKind::Float);
        ctx.builtins.double_ty = ctx.get_builtin(BuiltinKind::Double);
        ctx.builtins.long_double_ty = ctx.get_builtin(BuiltinKind::LongDouble);
        ctx.builtins.objc_id_ty = ctx.get_builtin(BuiltinKind::ObjCId);
        ctx.builtins.objc_sel_ty = ctx.get_builtin(BuiltinKind::ObjCSel);
        ctx
    }

    pub fn ty(
        &self,
        id: TypeId,
    ) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn kind(
        &self,
        qt: QualType,
    ) -> &TypeKind {
        &self.ty(qt.ty()).kind
    }

    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    // ── canonical form ──────────────────────────────────────────────────

    /// The fully desugared form of `qt`, with `qt`'s qualifiers folded onto
    /// the canonical type's own.
    pub fn canonical(
        &self,
        qt: QualType,
    ) -> QualType {
        let canon = self.ty(qt.ty()).canonical;
        canon.with_quals(qt.quals())
    }

    pub fn is_canonical(
        &self,
        qt: QualType,
    ) -> bool {
        let ty = self.ty(qt.ty());
        ty.canonical == QualType::unqual(qt.ty())
    }

    /// Canonical handle equality modulo nothing: the fast same-type test.
    pub fn types_equal(
        &self,
        a: QualType,
        b: QualType,
    ) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    pub fn is_dependent(
        &self,
        qt: QualType,
    ) -> bool {
        self.ty(qt.ty()).dependent
    }

    /// One-step unwrap of the outermost sugar node. Non-sugar types come
    /// back unchanged. Distinct from `canonical`, which strips everything.
    pub fn desugared(
        &self,
        qt: QualType,
    ) -> QualType {
        match &self.ty(qt.ty()).kind {
            TypeKind::Typedef {
                underlying, ..
            }
            | TypeKind::TypeOf {
                underlying,
            }
            | TypeKind::TypeOfExpr {
                underlying, ..
            } => underlying.with_quals(qt.quals()),
            _ => qt,
        }
    }

    /// Drop the CVR qualifiers and any extended-qualifier wrapper on the
    /// outermost type.
    pub fn get_unqualified(
        &self,
        qt: QualType,
    ) -> QualType {
        match self.ty(qt.ty()).kind {
            TypeKind::ExtQual {
                base, ..
            } => QualType::unqual(base),
            _ => qt.without_quals(),
        }
    }

    /// For a reference type, the referent; otherwise the type itself.
    pub fn non_reference_type(
        &self,
        qt: QualType,
    ) -> QualType {
        match self.canonical_kind(qt) {
            TypeKind::Reference {
                pointee, ..
            } => *pointee,
            _ => qt,
        }
    }

    /// The kind of the canonical type, for classification.
    pub fn canonical_kind(
        &self,
        qt: QualType,
    ) -> &TypeKind {
        let canon = self.ty(qt.ty()).canonical;
        &self.ty(canon.ty()).kind
    }

    // ── constructors ────────────────────────────────────────────────────

    pub fn get_builtin(
        &mut self,
        kind: BuiltinKind,
    ) -> QualType {
        self.intern(TypeKey::Builtin(kind), |_| (TypeKind::Builtin(kind), None, false))
    }

    pub fn get_complex(
        &mut self,
        element: QualType,
    ) -> QualType {
        self.intern(TypeKey::Complex(element), |ctx| {
            let canon_elt = ctx.canonical(element);
            let canon = (canon_elt != element).then(|| ctx.get_complex(canon_elt));
            (
                TypeKind::Complex {
                    element,
                },
                canon,
                ctx.is_dependent(element),
            )
        })
    }

    pub fn get_pointer(
        &mut self,
        pointee: QualType,
    ) -> QualType {
        self.intern(TypeKey::Pointer(pointee), |ctx| {
            let canon_pointee = ctx.canonical(pointee);
            let canon = (canon_pointee != pointee).then(|| ctx.get_pointer(canon_pointee));
            (
                TypeKind::Pointer {
                    pointee,
                },
                canon,
                ctx.is_dependent(pointee),
            )
        })
    }

    pub fn get_block_pointer(
        &mut self,
        pointee: QualType,
    ) -> QualType {
        self.intern(TypeKey::BlockPointer(pointee), |ctx| {
            let canon_pointee = ctx.canonical(pointee);
            let canon = (canon_pointee != pointee).then(|| ctx.get_block_pointer(canon_pointee));
            (
                TypeKind::BlockPointer {
                    pointee,
                },
                canon,
                ctx.is_dependent(pointee),
            )
        })
    }

    pub fn get_reference(
        &mut self,
        pointee: QualType,
        is_lvalue: bool,
    ) -> QualType {
        self.intern(TypeKey::Reference(pointee, is_lvalue), |ctx| {
            let canon_pointee = ctx.canonical(pointee);
            let canon = (canon_pointee != pointee).then(|| ctx.get_reference(canon_pointee, is_lvalue));
            (
                TypeKind::Reference {
                    pointee,
                    is_lvalue,
                },
                canon,
                ctx.is_dependent(pointee),
            )
        })
    }

    pub fn get_member_pointer(
        &mut self,
        pointee: QualType,
        class: TypeId,
    ) -> QualType {
        self.intern(TypeKey::MemberPointer(pointee, class), |ctx| {
            let canon_pointee = ctx.canonical(pointee);
            let canon_class = ctx.ty(class).canonical.ty();
            let canon = (canon_pointee != pointee || canon_class != class)
                .then(|| ctx.get_member_pointer(canon_pointee, canon_class));
            let dependent = ctx.is_dependent(pointee) || ctx.ty(class).dependent;
            (
                TypeKind::MemberPointer {
                    pointee,
                    class,
                },
                canon,
                dependent,
            )
        })
    }

    pub fn get_constant_array(
        &mut self,
        element: QualType,
        size: u64,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    ) -> QualType {
        self.intern(TypeKey::ConstantArray(element, size, size_modifier, index_quals), |ctx| {
            let canon_elt = ctx.canonical(element);
            let canon =
                (canon_elt != element).then(|| ctx.get_constant_array(canon_elt, size, size_modifier, index_quals));
            (
                TypeKind::ConstantArray {
                    element,
                    size,
                    size_modifier,
                    index_quals,
                },
                canon,
                ctx.is_dependent(element),
            )
        })
    }

    pub fn get_incomplete_array(
        &mut self,
        element: QualType,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    ) -> QualType {
        self.intern(TypeKey::IncompleteArray(element, size_modifier, index_quals), |ctx| {
            let canon_elt = ctx.canonical(element);
            let canon =
                (canon_elt != element).then(|| ctx.get_incomplete_array(canon_elt, size_modifier, index_quals));
            (
                TypeKind::IncompleteArray {
                    element,
                    size_modifier,
                    index_quals,
                },
                canon,
                ctx.is_dependent(element),
            )
        })
    }

    /// Variable-length arrays carry their size expression, so they are
    /// allocated fresh rather than uniqued.
    pub fn get_variable_array(
        &mut self,
        element: QualType,
        size_expr: ExprId,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    ) -> QualType {
        let canon_elt = self.canonical(element);
        let canon = if canon_elt != element {
            Some(self.get_variable_array(canon_elt, size_expr, size_modifier, index_quals))
        } else {
            None
        };
        let dependent = self.is_dependent(element);
        self.allocate(
            TypeKind::VariableArray {
                element,
                size_expr,
                size_modifier,
                index_quals,
            },
            canon,
            dependent,
        )
    }

    /// Dependent-sized arrays are likewise never uniqued.
    pub fn get_dependent_sized_array(
        &mut self,
        element: QualType,
        size_expr: Option<ExprId>,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    ) -> QualType {
        self.allocate(
            TypeKind::DependentSizedArray {
                element,
                size_expr,
                size_modifier,
                index_quals,
            },
            None,
            true,
        )
    }

    pub fn get_vector(
        &mut self,
        element: QualType,
        num_elements: u32,
    ) -> QualType {
        self.intern(TypeKey::Vector(element, num_elements, false), |ctx| {
            let canon_elt = ctx.canonical(element);
            let canon = (canon_elt != element).then(|| ctx.get_vector(canon_elt, num_elements));
            (
                TypeKind::Vector {
                    element,
                    num_elements,
                },
                canon,
                ctx.is_dependent(element),
            )
        })
    }

    pub fn get_ext_vector(
        &mut self,
        element: QualType,
        num_elements: u32,
    ) -> QualType {
        self.intern(TypeKey::Vector(element, num_elements, true), |ctx| {
            let canon_elt = ctx.canonical(element);
            let canon = (canon_elt != element).then(|| ctx.get_ext_vector(canon_elt, num_elements));
            (
                TypeKind::ExtVector {
                    element,
                    num_elements,
                },
                canon,
                ctx.is_dependent(element),
            )
        })
    }

    pub fn get_function_no_proto(
        &mut self,
        result: QualType,
    ) -> QualType {
        self.intern(TypeKey::FunctionNoProto(result), |ctx| {
            let canon_result = ctx.canonical(result);
            let canon = (canon_result != result).then(|| ctx.get_function_no_proto(canon_result));
            (
                TypeKind::FunctionNoProto {
                    result,
                },
                canon,
                ctx.is_dependent(result),
            )
        })
    }

    pub fn get_function(
        &mut self,
        result: QualType,
        params: &[QualType],
        variadic: bool,
        type_quals: Qualifiers,
    ) -> QualType {
        let key = TypeKey::FunctionProto(result, params.to_vec(), variadic, type_quals);
        let params = params.to_vec();
        self.intern(key, |ctx| {
            let canon_result = ctx.canonical(result);
            let canon_params: Vec<QualType> = params.iter().map(|&p| ctx.canonical(p)).collect();
            let all_canonical = canon_result == result && canon_params == params;
            let canon = (!all_canonical).then(|| ctx.get_function(canon_result, &canon_params, variadic, type_quals));
            let dependent = ctx.is_dependent(result) || params.iter().any(|&p| ctx.is_dependent(p));
            (
                TypeKind::FunctionProto {
                    result,
                    params,
                    variadic,
                    type_quals,
                },
                canon,
                dependent,
            )
        })
    }

    /// One type per typedef declaration; canonical is the underlying type's
    /// canonical form.
    pub fn get_typedef(
        &mut self,
        decl: DeclId,
        underlying: QualType,
    ) -> QualType {
        self.intern(TypeKey::Typedef(decl), |ctx| {
            let canon = Some(ctx.canonical(underlying));
            (
                TypeKind::Typedef {
                    decl,
                    underlying,
                },
                canon,
                ctx.is_dependent(underlying),
            )
        })
    }

    pub fn get_typeof(
        &mut self,
        underlying: QualType,
    ) -> QualType {
        self.intern(TypeKey::TypeOf(underlying), |ctx| {
            let canon = Some(ctx.canonical(underlying));
            (
                TypeKind::TypeOf {
                    underlying,
                },
                canon,
                ctx.is_dependent(underlying),
            )
        })
    }

    /// `typeof(expr)` types are expr-keyed and not uniqued; the computed
    /// type of the expression is recorded for desugaring.
    pub fn get_typeof_expr(
        &mut self,
        expr: ExprId,
        underlying: QualType,
    ) -> QualType {
        let canon = Some(self.canonical(underlying));
        let dependent = self.is_dependent(underlying);
        self.allocate(
            TypeKind::TypeOfExpr {
                expr,
                underlying,
            },
            canon,
            dependent,
        )
    }

    pub fn get_record(
        &mut self,
        decl: DeclId,
    ) -> QualType {
        self.intern(TypeKey::Record(decl), |_| {
            (
                TypeKind::Record {
                    decl,
                },
                None,
                false,
            )
        })
    }

    pub fn get_enum(
        &mut self,
        decl: DeclId,
    ) -> QualType {
        self.intern(TypeKey::Enum(decl), |_| {
            (
                TypeKind::Enum {
                    decl,
                },
                None,
                false,
            )
        })
    }

    pub fn get_template_type_parm(
        &mut self,
        depth: u32,
        index: u32,
        name: Option<IdentId>,
    ) -> QualType {
        self.intern(TypeKey::TemplateTypeParm(depth, index), |_| {
            (
                TypeKind::TemplateTypeParm {
                    depth,
                    index,
                    name,
                },
                None,
                true,
            )
        })
    }

    /// A written template specialization such as `vec<int>`. When the
    /// instantiated record type is known it becomes the canonical form;
    /// otherwise (dependent arguments) the specialization is its own
    /// canonical type.
    pub fn get_template_specialization(
        &mut self,
        template: DeclId,
        args: &[TemplateArg],
        instantiation: Option<QualType>,
    ) -> QualType {
        let key = TypeKey::TemplateSpecialization(template, args.to_vec());
        let args = args.to_vec();
        self.intern(key, |ctx| {
            let dependent = args.iter().any(|arg| match arg {
                TemplateArg::Type(qt) => ctx.is_dependent(*qt),
                TemplateArg::Expression(_) => true,
                TemplateArg::Integral(_) => false,
            });
            let canon = instantiation.map(|qt| ctx.canonical(qt));
            (
                TypeKind::TemplateSpecialization {
                    template,
                    args,
                },
                canon,
                dependent,
            )
        })
    }

    pub fn get_dependent_name(
        &mut self,
        qualifier: &[IdentId],
        name: IdentId,
    ) -> QualType {
        self.intern(TypeKey::DependentName(qualifier.to_vec(), name), |_| {
            (
                TypeKind::DependentName {
                    qualifier: qualifier.to_vec(),
                    name,
                },
                None,
                true,
            )
        })
    }

    pub fn get_objc_interface(
        &mut self,
        decl: DeclId,
        protocols: &[DeclId],
    ) -> QualType {
        self.intern(TypeKey::ObjCInterface(decl, protocols.to_vec()), |_| {
            (
                TypeKind::ObjCInterface {
                    decl,
                    protocols: protocols.to_vec(),
                },
                None,
                false,
            )
        })
    }

    pub fn get_objc_qualified_id(
        &mut self,
        protocols: &[DeclId],
    ) -> QualType {
        self.intern(TypeKey::ObjCQualifiedId(protocols.to_vec()), |_| {
            (
                TypeKind::ObjCQualifiedId {
                    protocols: protocols.to_vec(),
                },
                None,
                false,
            )
        })
    }

    /// Wrap a type with an address space or GC attribute. Keyed on the
    /// triple; canonical iff the base is canonical.
    pub fn get_ext_qual(
        &mut self,
        base: TypeId,
        address_space: u32,
        gc_attr: GcAttr,
    ) -> QualType {
        self.intern(TypeKey::ExtQual(base, address_space, gc_attr), |ctx| {
            let canon_base = ctx.ty(base).canonical;
            let canon = (canon_base != QualType::unqual(base))
                .then(|| ctx.get_ext_qual(canon_base.ty(), address_space, gc_attr));
            let dependent = ctx.ty(base).dependent;
            (
                TypeKind::ExtQual {
                    base,
                    address_space,
                    gc_attr,
                },
                canon,
                dependent,
            )
        })
    }

    // ── internal ────────────────────────────────────────────────────────

    /// Look up or build. The builder returns the kind, the canonical form
    /// (`None` meaning self-canonical), and the dependence flag.
    fn intern(
        &mut self,
        key: TypeKey,
        build: impl FnOnce(&mut Self) -> (TypeKind, Option<QualType>, bool),
    ) -> QualType {
        if let Some(&id) = self.interned.get(&key) {
            return QualType::unqual(id);
        }
        let (kind, canonical, dependent) = build(self);
        // The builder may have interned components recursively; re-check
        // before allocating so a key is never mapped twice.
        if let Some(&id) = self.interned.get(&key) {
            return QualType::unqual(id);
        }
        let qt = self.allocate(kind, canonical, dependent);
        self.interned.insert(key, qt.ty());
        qt
    }

    fn allocate(
        &mut self,
        kind: TypeKind,
        canonical: Option<QualType>,
        dependent: bool,
    ) -> QualType {
        let id = TypeId(self.types.len() as u32);
        let canonical = canonical.unwrap_or(QualType::unqual(id));
        debug_assert!(
            canonical == QualType::unqual(id) || self.is_canonical(canonical.without_quals()),
            "canonical handle must itself be canonical"
        );
        self.types.push(Type {
            kind,
            canonical,
            dependent,
        });
        QualType::unqual(id)
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/src/types/context_tests.rs"]
mod tests;
