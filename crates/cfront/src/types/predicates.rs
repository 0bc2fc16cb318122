//! Type classification.
//!
//! All predicates classify the canonical type, modulo qualifiers; sugar
//! never changes the answer.

use crate::decl::table::DeclTable;
use crate::types::context::TypeContext;
use crate::types::ty::{BuiltinKind, QualType, TypeKind};

impl TypeContext {
    pub(crate) fn canonical_builtin(
        &self,
        qt: QualType,
    ) -> Option<BuiltinKind> {
        match self.canonical_kind(qt) {
            TypeKind::Builtin(kind) => Some(*kind),
            _ => None,
        }
    }

    // ── C99 6.2.5 categories ────────────────────────────────────────────

    pub fn is_void_type(
        &self,
        qt: QualType,
    ) -> bool {
        self.canonical_builtin(qt) == Some(BuiltinKind::Void)
    }

    pub fn is_function_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::FunctionProto { .. } | TypeKind::FunctionNoProto { .. })
    }

    /// Types that describe objects: everything but functions, references,
    /// and incomplete types.
    pub fn is_object_type(
        &self,
        qt: QualType,
        decls: &DeclTable,
    ) -> bool {
        !self.is_function_type(qt) && !self.is_reference_type(qt) && !self.is_incomplete_type(qt, decls)
    }

    /// A type with no known size: void, an undefined tag, or an array of
    /// unknown bound.
    pub fn is_incomplete_type(
        &self,
        qt: QualType,
        decls: &DeclTable,
    ) -> bool {
        match self.canonical_kind(qt) {
            TypeKind::Builtin(BuiltinKind::Void) => true,
            TypeKind::Record {
                decl,
            }
            | TypeKind::Enum {
                decl,
            } => !decls.tag_is_defined(*decl),
            TypeKind::IncompleteArray { .. } => true,
            _ => false,
        }
    }

    // ── numeric categories ──────────────────────────────────────────────

    pub fn is_integer_type(
        &self,
        qt: QualType,
    ) -> bool {
        match self.canonical_kind(qt) {
            TypeKind::Builtin(kind) => kind.is_integer(),
            // Enumerations are integer types in C.
            TypeKind::Enum { .. } => true,
            _ => false,
        }
    }

    pub fn is_signed_integer_type(
        &self,
        qt: QualType,
    ) -> bool {
        match self.canonical_kind(qt) {
            TypeKind::Builtin(kind) => kind.is_signed_integer(),
            TypeKind::Enum { .. } => true,
            _ => false,
        }
    }

    pub fn is_unsigned_integer_type(
        &self,
        qt: QualType,
    ) -> bool {
        match self.canonical_kind(qt) {
            TypeKind::Builtin(kind) => kind.is_unsigned_integer(),
            _ => false,
        }
    }

    pub fn is_real_floating_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Builtin(kind) if kind.is_floating())
    }

    pub fn is_complex_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Complex { .. })
    }

    /// Integer, floating, or complex.
    pub fn is_arithmetic_type(
        &self,
        qt: QualType,
    ) -> bool {
        self.is_integer_type(qt) || self.is_real_floating_type(qt) || self.is_complex_type(qt)
    }

    /// Arithmetic or pointer: the types usable in boolean contexts.
    pub fn is_scalar_type(
        &self,
        qt: QualType,
    ) -> bool {
        self.is_arithmetic_type(qt)
            || self.is_pointer_type(qt)
            || matches!(self.canonical_kind(qt), TypeKind::BlockPointer { .. } | TypeKind::MemberPointer { .. })
    }

    /// Arrays and structures (C99 6.2.5p21).
    pub fn is_aggregate_type(
        &self,
        qt: QualType,
    ) -> bool {
        match self.canonical_kind(qt) {
            TypeKind::Record { .. } => true,
            TypeKind::ConstantArray { .. }
            | TypeKind::IncompleteArray { .. }
            | TypeKind::VariableArray { .. }
            | TypeKind::DependentSizedArray { .. } => true,
            _ => false,
        }
    }

    // ── structural categories ───────────────────────────────────────────

    pub fn is_pointer_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Pointer { .. })
    }

    pub fn is_block_pointer_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::BlockPointer { .. })
    }

    pub fn is_reference_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Reference { .. })
    }

    pub fn is_member_pointer_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::MemberPointer { .. })
    }

    pub fn is_array_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(
            self.canonical_kind(qt),
            TypeKind::ConstantArray { .. }
                | TypeKind::IncompleteArray { .. }
                | TypeKind::VariableArray { .. }
                | TypeKind::DependentSizedArray { .. }
        )
    }

    pub fn is_record_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Record { .. })
    }

    pub fn is_enum_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Enum { .. })
    }

    pub fn is_vector_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::Vector { .. } | TypeKind::ExtVector { .. })
    }

    pub fn is_objc_interface_type(
        &self,
        qt: QualType,
    ) -> bool {
        matches!(self.canonical_kind(qt), TypeKind::ObjCInterface { .. })
    }

    // ── component accessors on canonical form ───────────────────────────

    /// The pointee of a pointer type, or `None`.
    pub fn pointee_type(
        &self,
        qt: QualType,
    ) -> Option<QualType> {
        match self.canonical_kind(qt) {
            TypeKind::Pointer {
                pointee,
            }
            | TypeKind::BlockPointer {
                pointee,
            } => Some(*pointee),
            _ => None,
        }
    }

    /// The element type of any array flavor, or `None`.
    pub fn array_element_type(
        &self,
        qt: QualType,
    ) -> Option<QualType> {
        match self.canonical_kind(qt) {
            TypeKind::ConstantArray {
                element, ..
            }
            | TypeKind::IncompleteArray {
                element, ..
            }
            | TypeKind::VariableArray {
                element, ..
            }
            | TypeKind::DependentSizedArray {
                element, ..
            } => Some(*element),
            _ => None,
        }
    }

    /// The result type of a function type, or `None`.
    pub fn function_result_type(
        &self,
        qt: QualType,
    ) -> Option<QualType> {
        match self.canonical_kind(qt) {
            TypeKind::FunctionProto {
                result, ..
            }
            | TypeKind::FunctionNoProto {
                result,
            } => Some(*result),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/types/predicates_tests.rs"]
mod tests;
