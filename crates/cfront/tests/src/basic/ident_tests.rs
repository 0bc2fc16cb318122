use super::*;

use crate::config::{LangDialect, LangOptions};

#[test]
fn interning_is_idempotent() {
    let mut table = IdentifierTable::new(&LangOptions::default());
    let a = table.get("foo");
    let b = table.get("foo");
    let c = table.get("bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.spelling(a), "foo");
}

#[test]
fn keywords_depend_on_the_dialect() {
    let mut c99 = IdentifierTable::new(&LangOptions::for_dialect(LangDialect::C99));
    let id = c99.get("restrict");
    assert_eq!(c99.info(id).token_kind(), TokenKind::KwRestrict);
    let id = c99.get("class");
    assert_eq!(c99.info(id).token_kind(), TokenKind::Identifier);

    let mut cxx = IdentifierTable::new(&LangOptions::for_dialect(LangDialect::Cxx));
    let id = cxx.get("class");
    assert_eq!(cxx.info(id).token_kind(), TokenKind::KwClass);
    let id = cxx.get("bool");
    assert_eq!(cxx.info(id).token_kind(), TokenKind::KwBool);

    let mut c89 = IdentifierTable::new(&LangOptions {
        gnu: false,
        ..LangOptions::for_dialect(LangDialect::C89)
    });
    let id = c89.get("inline");
    assert_eq!(c89.info(id).token_kind(), TokenKind::Identifier);
    let id = c89.get("int");
    assert_eq!(c89.info(id).token_kind(), TokenKind::KwInt);
}

#[test]
fn macro_flag_is_mutable_state() {
    let mut table = IdentifierTable::new(&LangOptions::default());
    let id = table.get("FOO");
    assert!(!table.info(id).has_macro);
    table.info_mut(id).has_macro = true;
    assert!(table.info(id).has_macro);
}

#[test]
fn objc_at_keywords_are_recognized() {
    let mut table = IdentifierTable::new(&LangOptions::default());
    let id = table.get("interface");
    assert_eq!(table.info(id).objc_at_keyword(), Some(ObjCAtKeyword::Interface));
    let id = table.get("end");
    assert_eq!(table.info(id).objc_at_keyword(), Some(ObjCAtKeyword::End));
    let id = table.get("banana");
    assert_eq!(table.info(id).objc_at_keyword(), None);
}
