//! Type representation.
//!
//! Types are a closed sum stored in the [`TypeContext`]'s arena and
//! addressed by `TypeId`. A [`QualType`] is a type handle plus the three
//! C qualifier bits, packed into a single word; the qualifiers live on the
//! reference, so qualifier-only differences never allocate new types.

use bitflags::bitflags;

use crate::ast::stmt::ExprId;
use crate::basic::ident::IdentId;
use crate::decl::decl::DeclId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

bitflags! {
    /// The C/C++ cv-qualifiers plus C99 `restrict`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        const CONST    = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
    }
}

impl Qualifiers {
    /// Strict superset on the qualifier bits.
    pub fn is_strict_superset_of(
        self,
        other: Qualifiers,
    ) -> bool {
        self != other && self.contains(other)
    }
}

/// A qualified reference to a type: the low three bits are the qualifier
/// set, the rest is the arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualType(u32);

impl QualType {
    const QUAL_BITS: u32 = 3;

    pub fn new(
        ty: TypeId,
        quals: Qualifiers,
    ) -> QualType {
        assert!(ty.0 < (1 << (32 - Self::QUAL_BITS)), "ran out of type ids");
        QualType((ty.0 << Self::QUAL_BITS) | quals.bits() as u32)
    }

    pub fn unqual(ty: TypeId) -> QualType {
        Self::new(ty, Qualifiers::empty())
    }

    pub fn ty(self) -> TypeId {
        TypeId(self.0 >> Self::QUAL_BITS)
    }

    pub fn quals(self) -> Qualifiers {
        Qualifiers::from_bits_truncate((self.0 & ((1 << Self::QUAL_BITS) - 1)) as u8)
    }

    pub fn is_const(self) -> bool {
        self.quals().contains(Qualifiers::CONST)
    }

    pub fn is_volatile(self) -> bool {
        self.quals().contains(Qualifiers::VOLATILE)
    }

    pub fn is_restrict(self) -> bool {
        self.quals().contains(Qualifiers::RESTRICT)
    }

    pub fn with_quals(
        self,
        quals: Qualifiers,
    ) -> QualType {
        QualType::new(self.ty(), self.quals() | quals)
    }

    pub fn with_const(self) -> QualType {
        self.with_quals(Qualifiers::CONST)
    }

    /// Same type handle with no qualifier bits. Does not look through
    /// extended qualifiers; see `TypeContext::get_unqualified`.
    pub fn without_quals(self) -> QualType {
        QualType::unqual(self.ty())
    }

    /// Strict qualifier superset, identical type handle not required.
    pub fn is_more_qualified_than(
        self,
        other: QualType,
    ) -> bool {
        self.quals().is_strict_superset_of(other.quals())
    }

    pub fn is_at_least_as_qualified_as(
        self,
        other: QualType,
    ) -> bool {
        self.quals().contains(other.quals())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    WChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    /// Objective-C `id`.
    ObjCId,
    /// Objective-C `SEL`.
    ObjCSel,
}

impl BuiltinKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BuiltinKind::Bool
                | BuiltinKind::Char
                | BuiltinKind::SChar
                | BuiltinKind::UChar
                | BuiltinKind::WChar
                | BuiltinKind::Short
                | BuiltinKind::UShort
                | BuiltinKind::Int
                | BuiltinKind::UInt
                | BuiltinKind::Long
                | BuiltinKind::ULong
                | BuiltinKind::LongLong
                | BuiltinKind::ULongLong
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, BuiltinKind::Float | BuiltinKind::Double | BuiltinKind::LongDouble)
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            BuiltinKind::Char
                | BuiltinKind::SChar
                | BuiltinKind::Short
                | BuiltinKind::Int
                | BuiltinKind::Long
                | BuiltinKind::LongLong
        )
    }

    pub fn is_unsigned_integer(self) -> bool {
        self.is_integer() && !self.is_signed_integer()
    }

    /// Rank for the integer promotion / usual arithmetic conversion rules.
    pub fn integer_rank(self) -> u32 {
        match self {
            BuiltinKind::Bool => 1,
            BuiltinKind::Char | BuiltinKind::SChar | BuiltinKind::UChar => 2,
            BuiltinKind::Short | BuiltinKind::UShort | BuiltinKind::WChar => 3,
            BuiltinKind::Int | BuiltinKind::UInt => 4,
            BuiltinKind::Long | BuiltinKind::ULong => 5,
            BuiltinKind::LongLong | BuiltinKind::ULongLong => 6,
            _ => 0,
        }
    }

    /// Rank for floating conversions.
    pub fn floating_rank(self) -> u32 {
        match self {
            BuiltinKind::Float => 1,
            BuiltinKind::Double => 2,
            BuiltinKind::LongDouble => 3,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::Void => "void",
            BuiltinKind::Bool => "_Bool",
            BuiltinKind::Char => "char",
            BuiltinKind::SChar => "signed char",
            BuiltinKind::UChar => "unsigned char",
            BuiltinKind::WChar => "wchar_t",
            BuiltinKind::Short => "short",
            BuiltinKind::UShort => "unsigned short",
            BuiltinKind::Int => "int",
            BuiltinKind::UInt => "unsigned int",
            BuiltinKind::Long => "long",
            BuiltinKind::ULong => "unsigned long",
            BuiltinKind::LongLong => "long long",
            BuiltinKind::ULongLong => "unsigned long long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::LongDouble => "long double",
            BuiltinKind::ObjCId => "id",
            BuiltinKind::ObjCSel => "SEL",
        }
    }
}

/// How an array declarator spelled its size bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArraySizeModifier {
    #[default]
    Normal,
    /// `[static n]`
    Static,
    /// `[*]`
    Star,
}

/// Garbage-collection attribute carried by an extended qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GcAttr {
    #[default]
    None,
    Weak,
    Strong,
}

/// A template argument, hash-consed as part of specialization keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateArg {
    Type(QualType),
    Expression(ExprId),
    Integral(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Builtin(BuiltinKind),
    Complex {
        element: QualType,
    },
    Pointer {
        pointee: QualType,
    },
    BlockPointer {
        pointee: QualType,
    },
    Reference {
        pointee: QualType,
        is_lvalue: bool,
    },
    MemberPointer {
        pointee: QualType,
        class: TypeId,
    },
    ConstantArray {
        element: QualType,
        size: u64,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    },
    IncompleteArray {
        element: QualType,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    },
    VariableArray {
        element: QualType,
        size_expr: ExprId,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    },
    DependentSizedArray {
        element: QualType,
        size_expr: Option<ExprId>,
        size_modifier: ArraySizeModifier,
        index_quals: Qualifiers,
    },
    Vector {
        element: QualType,
        num_elements: u32,
    },
    ExtVector {
        element: QualType,
        num_elements: u32,
    },
    FunctionNoProto {
        result: QualType,
    },
    FunctionProto {
        result: QualType,
        params: Vec<QualType>,
        variadic: bool,
        type_quals: Qualifiers,
    },
    Typedef {
        decl: DeclId,
        underlying: QualType,
    },
    TypeOfExpr {
        expr: ExprId,
        underlying: QualType,
    },
    TypeOf {
        underlying: QualType,
    },
    Record {
        decl: DeclId,
    },
    Enum {
        decl: DeclId,
    },
    TemplateTypeParm {
        depth: u32,
        index: u32,
        name: Option<IdentId>,
    },
    TemplateSpecialization {
        template: DeclId,
        args: Vec<TemplateArg>,
    },
    DependentName {
        qualifier: Vec<IdentId>,
        name: IdentId,
    },
    ObjCInterface {
        decl: DeclId,
        protocols: Vec<DeclId>,
    },
    ObjCQualifiedId {
        protocols: Vec<DeclId>,
    },
    ExtQual {
        base: TypeId,
        address_space: u32,
        gc_attr: GcAttr,
    },
}

impl TypeKind {
    /// Sugar exists only for diagnostic fidelity; its canonical form is the
    /// type it stands for.
    pub fn is_sugar(&self) -> bool {
        matches!(self, TypeKind::Typedef { .. } | TypeKind::TypeOf { .. } | TypeKind::TypeOfExpr { .. })
    }
}

/// One allocated type node.
#[derive(Debug)]
pub struct Type {
    pub kind: TypeKind,
    /// The canonical form of this type, computed at construction. A type is
    /// self-canonical iff this refers back to it with no qualifiers.
    pub(crate) canonical: QualType,
    pub(crate) dependent: bool,
}

impl Type {
    pub fn canonical(&self) -> QualType {
        self.canonical
    }

    pub fn is_dependent(&self) -> bool {
        self.dependent
    }
}

#[cfg(test)]
#[path = "../../tests/src/types/ty_tests.rs"]
mod tests;
