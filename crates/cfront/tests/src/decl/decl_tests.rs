use super::*;

use crate::types::ty::{QualType, TypeId};

fn int_qt() -> QualType {
    QualType::unqual(TypeId(0))
}

#[test]
fn definitions_are_recognized_per_kind() {
    assert!(
        !DeclKind::Var {
            ty: int_qt(),
            storage: StorageClass::None,
            init: None,
        }
        .is_definition()
    );
    assert!(
        DeclKind::Var {
            ty: int_qt(),
            storage: StorageClass::None,
            init: Some(ExprId(0)),
        }
        .is_definition()
    );
    assert!(
        !DeclKind::Function {
            ty: int_qt(),
            storage: StorageClass::None,
            is_inline: false,
            params: Vec::new(),
            body: None,
        }
        .is_definition()
    );
    assert!(
        DeclKind::Record {
            tag_kind: TagKind::Struct,
            is_definition: true,
            fields: Vec::new(),
            ty: None,
        }
        .is_definition()
    );
    assert!(!DeclKind::Typedef {
        underlying: int_qt(),
    }
    .is_definition());
}

#[test]
fn namespaces_partition_names() {
    let tag = DeclKind::Record {
        tag_kind: TagKind::Struct,
        is_definition: false,
        fields: Vec::new(),
        ty: None,
    };
    let var = DeclKind::Var {
        ty: int_qt(),
        storage: StorageClass::None,
        init: None,
    };
    let field = DeclKind::Field {
        ty: int_qt(),
        bit_width: None,
    };

    assert!(tag.namespaces().contains(IdentifierNamespace::TAG));
    assert!(!tag.namespaces().contains(IdentifierNamespace::ORDINARY));
    assert!(var.namespaces().contains(IdentifierNamespace::ORDINARY));
    assert!(field.namespaces().contains(IdentifierNamespace::MEMBER));
}

#[test]
fn contexts_are_the_grouping_kinds() {
    assert!(DeclKind::TranslationUnit.is_context());
    assert!(DeclKind::Namespace.is_context());
    assert!(
        DeclKind::Record {
            tag_kind: TagKind::Union,
            is_definition: false,
            fields: Vec::new(),
            ty: None,
        }
        .is_context()
    );
    assert!(!DeclKind::Var {
        ty: int_qt(),
        storage: StorageClass::None,
        init: None,
    }
    .is_context());
}
