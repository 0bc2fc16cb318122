use super::*;

#[test]
fn qualtype_packs_into_one_word() {
    assert_eq!(std::mem::size_of::<QualType>(), 4);
    let qt = QualType::new(TypeId(12345), Qualifiers::CONST | Qualifiers::RESTRICT);
    assert_eq!(qt.ty(), TypeId(12345));
    assert!(qt.is_const());
    assert!(!qt.is_volatile());
    assert!(qt.is_restrict());
    assert_eq!(qt.without_quals().quals(), Qualifiers::empty());
    assert_eq!(qt.without_quals().ty(), TypeId(12345));
}

#[test]
fn qualifier_ordering_predicates() {
    let ty = TypeId(7);
    let bare = QualType::unqual(ty);
    let const_only = QualType::new(ty, Qualifiers::CONST);
    let const_volatile = QualType::new(ty, Qualifiers::CONST | Qualifiers::VOLATILE);

    assert!(const_only.is_more_qualified_than(bare));
    assert!(const_volatile.is_more_qualified_than(const_only));
    assert!(!const_only.is_more_qualified_than(const_volatile));
    assert!(!const_only.is_more_qualified_than(const_only));

    assert!(const_only.is_at_least_as_qualified_as(const_only));
    assert!(const_only.is_at_least_as_qualified_as(bare));
    assert!(!bare.is_at_least_as_qualified_as(const_only));
}

#[test]
fn with_quals_accumulates() {
    let qt = QualType::unqual(TypeId(3)).with_const().with_quals(Qualifiers::VOLATILE);
    assert!(qt.is_const());
    assert!(qt.is_volatile());
}

#[test]
fn sugar_classification() {
    assert!(
        TypeKind::Typedef {
            decl: crate::decl::decl::DeclId(0),
            underlying: QualType::unqual(TypeId(0)),
        }
        .is_sugar()
    );
    assert!(
        TypeKind::TypeOf {
            underlying: QualType::unqual(TypeId(0)),
        }
        .is_sugar()
    );
    assert!(!TypeKind::Builtin(BuiltinKind::Int).is_sugar());
    assert!(
        !TypeKind::Pointer {
            pointee: QualType::unqual(TypeId(0)),
        }
        .is_sugar()
    );
}

#[test]
fn integer_ranks_order_the_usual_suspects() {
    assert!(BuiltinKind::Bool.integer_rank() < BuiltinKind::Char.integer_rank());
    assert!(BuiltinKind::Char.integer_rank() < BuiltinKind::Int.integer_rank());
    assert!(BuiltinKind::Int.integer_rank() < BuiltinKind::Long.integer_rank());
    assert!(BuiltinKind::Long.integer_rank() < BuiltinKind::LongLong.integer_rank());
    assert!(BuiltinKind::Float.floating_rank() < BuiltinKind::Double.floating_rank());
}
