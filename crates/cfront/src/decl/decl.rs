//! Declaration nodes.
//!
//! Declarations form a tree rooted at the translation unit. Each node
//! records its lexical parent (the syntactic container) and semantic parent
//! (the context the name is introduced into); the two differ for
//! out-of-line definitions. Redeclaration chains are kept as flat id lists
//! in the [`DeclTable`](crate::decl::table::DeclTable), keyed by the
//! canonical (first) declaration.

use bitflags::bitflags;

use crate::ast::stmt::{ExprId, StmtId};
use crate::basic::ident::IdentId;
use crate::basic::selector::SelectorId;
use crate::basic::source_location::SourceLocation;
use crate::types::ty::{QualType, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// What a declaration is named by: an identifier, or a selector for
/// Objective-C methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclName {
    Ident(IdentId),
    Selector(SelectorId),
}

/// C++ member access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    None,
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageClass {
    #[default]
    None,
    Extern,
    Static,
    Auto,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Struct,
    Union,
    Class,
}

impl TagKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TagKind::Struct => "struct",
            TagKind::Union => "union",
            TagKind::Class => "class",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkageLang {
    C,
    Cxx,
}

bitflags! {
    /// Which namespace(s) a declaration's name lives in. C keeps tags,
    /// labels, members, and ordinary names separate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IdentifierNamespace: u8 {
        const ORDINARY = 1 << 0;
        const TAG      = 1 << 1;
        const MEMBER   = 1 << 2;
        const LABEL    = 1 << 3;
        const PROTOCOL = 1 << 4;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    TranslationUnit,

    // ── named values ────────────────────────────────────────────────────
    Var {
        ty: QualType,
        storage: StorageClass,
        init: Option<ExprId>,
    },
    Function {
        ty: QualType,
        storage: StorageClass,
        is_inline: bool,
        params: Vec<DeclId>,
        body: Option<StmtId>,
    },
    Parm {
        ty: QualType,
    },
    Field {
        ty: QualType,
        bit_width: Option<ExprId>,
    },
    EnumConstant {
        ty: QualType,
        init: Option<ExprId>,
        value: i64,
    },

    // ── type declarations ───────────────────────────────────────────────
    Typedef {
        underlying: QualType,
    },
    Record {
        tag_kind: TagKind,
        is_definition: bool,
        fields: Vec<DeclId>,
        /// The unique Record type for this tag, installed when the type is
        /// first requested (two-phase: the decl can be incomplete while its
        /// type handle circulates).
        ty: Option<TypeId>,
    },
    Enum {
        is_definition: bool,
        enumerators: Vec<DeclId>,
        /// Underlying integer type, fixed when the definition closes.
        integer_type: Option<QualType>,
        ty: Option<TypeId>,
    },
    ClassTemplate {
        params: Vec<DeclId>,
        templated: DeclId,
    },
    FunctionTemplate {
        params: Vec<DeclId>,
        templated: DeclId,
    },
    TemplateTypeParm {
        depth: u32,
        index: u32,
        default: Option<QualType>,
    },

    // ── grouping ────────────────────────────────────────────────────────
    Namespace,
    LinkageSpec {
        lang: LinkageLang,
    },

    // ── Objective-C ─────────────────────────────────────────────────────
    ObjCInterface {
        super_class: Option<DeclId>,
        protocols: Vec<DeclId>,
        ivars: Vec<DeclId>,
        methods: Vec<DeclId>,
        is_definition: bool,
    },
    ObjCProtocol {
        protocols: Vec<DeclId>,
        methods: Vec<DeclId>,
    },
    ObjCMethod {
        selector: SelectorId,
        is_instance: bool,
        result_ty: QualType,
        params: Vec<DeclId>,
        body: Option<StmtId>,
    },
    ObjCIvar {
        ty: QualType,
    },
    ObjCCategory {
        interface: DeclId,
        methods: Vec<DeclId>,
    },
    ObjCImplementation {
        interface: DeclId,
    },
}

impl DeclKind {
    /// Whether a declaration with this kind constitutes a definition of
    /// its entity.
    pub fn is_definition(&self) -> bool {
        match self {
            DeclKind::Var {
                init, ..
            } => init.is_some(),
            DeclKind::Function {
                body, ..
            } => body.is_some(),
            DeclKind::Record {
                is_definition, ..
            }
            | DeclKind::Enum {
                is_definition, ..
            }
            | DeclKind::ObjCInterface {
                is_definition, ..
            } => *is_definition,
            DeclKind::ObjCMethod {
                body, ..
            } => body.is_some(),
            _ => false,
        }
    }

    /// Whether declarations of this kind open a declaration context.
    pub fn is_context(&self) -> bool {
        matches!(
            self,
            DeclKind::TranslationUnit
                | DeclKind::Function { .. }
                | DeclKind::Record { .. }
                | DeclKind::Enum { .. }
                | DeclKind::Namespace
                | DeclKind::LinkageSpec { .. }
                | DeclKind::ObjCInterface { .. }
                | DeclKind::ObjCProtocol { .. }
                | DeclKind::ObjCMethod { .. }
                | DeclKind::ObjCCategory { .. }
                | DeclKind::ObjCImplementation { .. }
        )
    }

    /// The namespaces this declaration's name is introduced into.
    pub fn namespaces(&self) -> IdentifierNamespace {
        match self {
            DeclKind::Record { .. } | DeclKind::Enum { .. } => IdentifierNamespace::TAG,
            // Fields answer member lookup; they also answer ordinary
            // lookup when a class scope pushes them into the resolver.
            DeclKind::Field { .. } | DeclKind::ObjCIvar { .. } => {
                IdentifierNamespace::MEMBER | IdentifierNamespace::ORDINARY
            },
            DeclKind::ObjCProtocol { .. } => IdentifierNamespace::PROTOCOL,
            DeclKind::ClassTemplate { .. } => IdentifierNamespace::ORDINARY | IdentifierNamespace::TAG,
            _ => IdentifierNamespace::ORDINARY,
        }
    }
}

#[derive(Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: Option<DeclName>,
    pub loc: SourceLocation,
    /// Syntactic container.
    pub lexical_parent: Option<DeclId>,
    /// Context the name is introduced into; differs from the lexical parent
    /// for out-of-line definitions.
    pub semantic_parent: Option<DeclId>,
    pub access: Access,
    /// First declaration of this entity; self for the first one.
    pub(crate) canonical: DeclId,
    pub(crate) namespaces: IdentifierNamespace,
}

impl Decl {
    pub fn canonical(&self) -> DeclId {
        self.canonical
    }

    pub fn namespaces(&self) -> IdentifierNamespace {
        self.namespaces
    }

    pub fn ident(&self) -> Option<IdentId> {
        match self.name {
            Some(DeclName::Ident(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/decl/decl_tests.rs"]
mod tests;
