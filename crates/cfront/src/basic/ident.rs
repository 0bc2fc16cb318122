//! Identifier interning.
//!
//! Every distinct identifier spelling in the translation unit maps to one
//! [`IdentifierInfo`], addressed by a copyable [`IdentId`]. The info record
//! carries the token kind (keyword-ness is decided here, per dialect, not in
//! the raw lexer), whether a macro is currently defined under the name, and
//! the Objective-C `@`-keyword code if the spelling is one.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::basic::token_kinds::TokenKind;
use crate::config::LangOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentId(u32);

impl IdentId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Objective-C keywords recognized after `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjCAtKeyword {
    Interface,
    Implementation,
    Protocol,
    End,
    Property,
    Selector,
    Encode,
    Class,
    Private,
    Protected,
    Public,
}

#[derive(Debug)]
pub struct IdentifierInfo {
    spelling: String,
    token_kind: TokenKind,
    /// Whether a macro is currently defined under this name. Maintained by
    /// the preprocessor.
    pub has_macro: bool,
    objc_at_keyword: Option<ObjCAtKeyword>,
}

impl IdentifierInfo {
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn token_kind(&self) -> TokenKind {
        self.token_kind
    }

    pub fn objc_at_keyword(&self) -> Option<ObjCAtKeyword> {
        self.objc_at_keyword
    }
}

// Which dialects each keyword is active in.
const KW_ALL: u8 = 1 << 0;
const KW_C99: u8 = 1 << 1;
const KW_CXX: u8 = 1 << 2;
const KW_GNU: u8 = 1 << 3;
const KW_BOOL: u8 = 1 << 4;

static KEYWORDS: Lazy<HashMap<&'static str, (TokenKind, u8)>> = Lazy::new(|| {
    use TokenKind::*;
    HashMap::from([
        ("auto", (KwAuto, KW_ALL)),
        ("break", (KwBreak, KW_ALL)),
        ("case", (KwCase, KW_ALL)),
        ("char", (KwChar, KW_ALL)),
        ("const", (KwConst, KW_ALL)),
        ("continue", (KwContinue, KW_ALL)),
        ("default", (KwDefault, KW_ALL)),
        ("do", (KwDo, KW_ALL)),
        ("double", (KwDouble, KW_ALL)),
        ("else", (KwElse, KW_ALL)),
        ("enum", (KwEnum, KW_ALL)),
        ("extern", (KwExtern, KW_ALL)),
        ("float", (KwFloat, KW_ALL)),
        ("for", (KwFor, KW_ALL)),
        ("goto", (KwGoto, KW_ALL)),
        ("if", (KwIf, KW_ALL)),
        ("int", (KwInt, KW_ALL)),
        ("long", (KwLong, KW_ALL)),
        ("register", (KwRegister, KW_ALL)),
        ("return", (KwReturn, KW_ALL)),
        ("short", (KwShort, KW_ALL)),
        ("signed", (KwSigned, KW_ALL)),
        ("sizeof", (KwSizeof, KW_ALL)),
        ("static", (KwStatic, KW_ALL)),
        ("struct", (KwStruct, KW_ALL)),
        ("switch", (KwSwitch, KW_ALL)),
        ("typedef", (KwTypedef, KW_ALL)),
        ("union", (KwUnion, KW_ALL)),
        ("unsigned", (KwUnsigned, KW_ALL)),
        ("void", (KwVoid, KW_ALL)),
        ("volatile", (KwVolatile, KW_ALL)),
        ("while", (KwWhile, KW_ALL)),
        // C99
        ("inline", (KwInline, KW_C99 | KW_CXX | KW_GNU)),
        ("restrict", (KwRestrict, KW_C99)),
        ("_Bool", (KwBool, KW_C99)),
        ("_Complex", (KwComplex, KW_C99)),
        ("_Imaginary", (KwImaginary, KW_C99)),
        // C++
        ("class", (KwClass, KW_CXX)),
        ("namespace", (KwNamespace, KW_CXX)),
        ("template", (KwTemplate, KW_CXX)),
        ("typename", (KwTypename, KW_CXX)),
        ("using", (KwUsing, KW_CXX)),
        ("public", (KwPublic, KW_CXX)),
        ("protected", (KwProtected, KW_CXX)),
        ("private", (KwPrivate, KW_CXX)),
        ("virtual", (KwVirtual, KW_CXX)),
        ("friend", (KwFriend, KW_CXX)),
        ("this", (KwThis, KW_CXX)),
        ("new", (KwNew, KW_CXX)),
        ("delete", (KwDelete, KW_CXX)),
        ("operator", (KwOperator, KW_CXX)),
        ("wchar_t", (KwWchar, KW_CXX)),
        ("bool", (KwBool, KW_BOOL)),
        ("true", (KwTrue, KW_BOOL)),
        ("false", (KwFalse, KW_BOOL)),
        // GNU
        ("typeof", (KwTypeof, KW_GNU)),
        ("__typeof__", (KwTypeof, KW_GNU)),
        ("__extension__", (KwExtension, KW_GNU)),
        ("__alignof__", (KwAlignof, KW_GNU)),
        ("__real__", (KwReal, KW_GNU)),
        ("__imag__", (KwImag, KW_GNU)),
    ])
});

fn objc_at_keyword(spelling: &str) -> Option<ObjCAtKeyword> {
    Some(match spelling {
        "interface" => ObjCAtKeyword::Interface,
        "implementation" => ObjCAtKeyword::Implementation,
        "protocol" => ObjCAtKeyword::Protocol,
        "end" => ObjCAtKeyword::End,
        "property" => ObjCAtKeyword::Property,
        "selector" => ObjCAtKeyword::Selector,
        "encode" => ObjCAtKeyword::Encode,
        "class" => ObjCAtKeyword::Class,
        "private" => ObjCAtKeyword::Private,
        "protected" => ObjCAtKeyword::Protected,
        "public" => ObjCAtKeyword::Public,
        _ => return None,
    })
}

pub struct IdentifierTable {
    infos: Vec<IdentifierInfo>,
    map: HashMap<String, IdentId>,
    active_keywords: u8,
}

impl IdentifierTable {
    pub fn new(options: &LangOptions) -> Self {
        let mut active = KW_ALL;
        if options.c99() {
            active |= KW_C99;
        }
        if options.cplusplus() {
            active |= KW_CXX;
        }
        if options.gnu {
            active |= KW_GNU;
        }
        if options.bool_keyword {
            active |= KW_BOOL;
        }
        Self {
            infos: Vec::new(),
            map: HashMap::new(),
            active_keywords: active,
        }
    }

    /// Intern a spelling, creating the info record on first sight.
    pub fn get(
        &mut self,
        spelling: &str,
    ) -> IdentId {
        if let Some(&id) = self.map.get(spelling) {
            return id;
        }

        let token_kind = match KEYWORDS.get(spelling) {
            Some(&(kind, flavors)) if flavors & self.active_keywords != 0 => kind,
            _ => TokenKind::Identifier,
        };

        let id = IdentId(self.infos.len() as u32);
        self.infos.push(IdentifierInfo {
            spelling: spelling.to_owned(),
            token_kind,
            has_macro: false,
            objc_at_keyword: objc_at_keyword(spelling),
        });
        self.map.insert(spelling.to_owned(), id);
        id
    }

    /// Look up an already-interned spelling without creating it.
    pub fn find(
        &self,
        spelling: &str,
    ) -> Option<IdentId> {
        self.map.get(spelling).copied()
    }

    pub fn info(
        &self,
        id: IdentId,
    ) -> &IdentifierInfo {
        &self.infos[id.0 as usize]
    }

    pub fn info_mut(
        &mut self,
        id: IdentId,
    ) -> &mut IdentifierInfo {
        &mut self.infos[id.0 as usize]
    }

    pub fn spelling(
        &self,
        id: IdentId,
    ) -> &str {
        &self.infos[id.0 as usize].spelling
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src/basic/ident_tests.rs"]
mod tests;
