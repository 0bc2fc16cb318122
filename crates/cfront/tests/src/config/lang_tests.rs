use super::*;

#[test]
fn defaults_track_the_dialect() {
    let c89 = LangOptions::for_dialect(LangDialect::C89);
    assert!(!c89.line_comments);
    assert!(!c89.bool_keyword);

    let c99 = LangOptions::for_dialect(LangDialect::C99);
    assert!(c99.line_comments);
    assert!(c99.c99());
    assert!(!c99.cplusplus());

    let cxx = LangOptions::for_dialect(LangDialect::Cxx);
    assert!(cxx.bool_keyword);
    assert!(cxx.cplusplus());
}

#[test]
fn toml_overlay_patches_defaults() {
    let options = LangOptions::from_toml_str(
        r#"
dialect = "cxx"
objc = true
"#,
    )
    .unwrap();
    assert_eq!(options.dialect, LangDialect::Cxx);
    assert!(options.objc);
    // Untouched fields keep the dialect defaults.
    assert!(options.bool_keyword);
}

#[test]
fn unknown_keys_are_tolerated() {
    let options = LangOptions::from_toml_str("future-flag = 3\n").unwrap();
    assert_eq!(options, LangOptions::default());
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(LangOptions::from_toml_str("dialect = [").is_err());
}
