use std::collections::HashMap;

use serde::Deserialize;
use toml::Value;

/// Base dialect the translation unit is compiled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LangDialect {
    C89,
    #[default]
    C99,
    Cxx,
}

/// Language options controlling keyword sets and semantic behavior.
///
/// Loaded from a `cfront.toml` file when present; every field has a
/// default so a missing or partial file is fine.
#[derive(Debug, Clone, PartialEq)]
pub struct LangOptions {
    pub dialect: LangDialect,
    /// Accept Objective-C constructs (`@interface`, message sends, selectors).
    pub objc: bool,
    /// Accept GNU extensions (`typeof`, `__extension__`, case ranges).
    pub gnu: bool,
    /// Treat `//` comments as valid (C99 and later, or GNU mode).
    pub line_comments: bool,
    /// Recognize `bool`, `true`, `false` as keywords.
    pub bool_keyword: bool,
}

impl Default for LangOptions {
    fn default() -> Self {
        Self::for_dialect(LangDialect::C99)
    }
}

impl LangOptions {
    pub fn for_dialect(dialect: LangDialect) -> Self {
        Self {
            dialect,
            objc: false,
            gnu: true,
            line_comments: dialect != LangDialect::C89,
            bool_keyword: dialect == LangDialect::Cxx,
        }
    }

    pub fn c99(&self) -> bool {
        self.dialect == LangDialect::C99
    }

    pub fn cplusplus(&self) -> bool {
        self.dialect == LangDialect::Cxx
    }

    /// Parse a TOML document and overlay it onto the defaults for the
    /// dialect it names.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let patch: LangOptionsPatch = toml::from_str(text)?;
        let mut options = Self::for_dialect(patch.dialect.unwrap_or_default());
        options.apply_patch(patch);
        Ok(options)
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: LangOptionsPatch,
    ) {
        if let Some(v) = patch.dialect {
            self.dialect = v;
        }
        if let Some(v) = patch.objc {
            self.objc = v;
        }
        if let Some(v) = patch.gnu {
            self.gnu = v;
        }
        if let Some(v) = patch.line_comments {
            self.line_comments = v;
        }
        if let Some(v) = patch.bool_keyword {
            self.bool_keyword = v;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct LangOptionsPatch {
    pub(crate) dialect: Option<LangDialect>,
    pub(crate) objc: Option<bool>,
    pub(crate) gnu: Option<bool>,
    pub(crate) line_comments: Option<bool>,
    pub(crate) bool_keyword: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}

#[cfg(test)]
#[path = "../../tests/src/config/lang_tests.rs"]
mod tests;
