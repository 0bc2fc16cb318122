//! Objective-C selector interning.
//!
//! A selector names a method: either a single zero-argument piece (`copy`)
//! or one keyword piece per argument (`setObject:forKey:`). Selectors are
//! interned so equality is id equality.

use std::collections::HashMap;

use crate::basic::ident::{IdentId, IdentifierTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorId(u32);

impl SelectorId {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SelectorData {
    /// Keyword pieces, in order. A nullary selector has one piece.
    pieces: Vec<IdentId>,
    num_args: u32,
}

#[derive(Default)]
pub struct SelectorTable {
    selectors: Vec<SelectorData>,
    map: HashMap<SelectorData, SelectorId>,
}

impl SelectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a zero-argument selector.
    pub fn get_nullary(
        &mut self,
        piece: IdentId,
    ) -> SelectorId {
        self.intern(SelectorData {
            pieces: vec![piece],
            num_args: 0,
        })
    }

    /// Intern a keyword selector with one piece per argument.
    pub fn get_keyword(
        &mut self,
        pieces: &[IdentId],
    ) -> SelectorId {
        assert!(!pieces.is_empty(), "keyword selector needs at least one piece");
        self.intern(SelectorData {
            pieces: pieces.to_vec(),
            num_args: pieces.len() as u32,
        })
    }

    fn intern(
        &mut self,
        data: SelectorData,
    ) -> SelectorId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = SelectorId(self.selectors.len() as u32);
        self.selectors.push(data.clone());
        self.map.insert(data, id);
        id
    }

    pub fn num_args(
        &self,
        id: SelectorId,
    ) -> u32 {
        self.selectors[id.0 as usize].num_args
    }

    /// Render `setObject:forKey:` style spelling.
    pub fn name(
        &self,
        id: SelectorId,
        idents: &IdentifierTable,
    ) -> String {
        let data = &self.selectors[id.0 as usize];
        if data.num_args == 0 {
            return idents.spelling(data.pieces[0]).to_owned();
        }
        let mut out = String::new();
        for &piece in &data.pieces {
            out.push_str(idents.spelling(piece));
            out.push(':');
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/src/basic/selector_tests.rs"]
mod tests;
