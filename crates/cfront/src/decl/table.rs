//! Declaration ownership, redeclaration chains, and context member maps.

use std::collections::HashMap;

use crate::basic::ident::IdentifierTable;
use crate::basic::selector::SelectorId;
use crate::basic::source_location::SourceLocation;
use crate::decl::decl::{Decl, DeclId, DeclKind, DeclName, IdentifierNamespace, TagKind};
use crate::types::ty::{TemplateArg, TypeId};

/// Members of one declaration context, with a by-name lookup map.
#[derive(Debug, Default)]
struct DeclContextData {
    decls: Vec<DeclId>,
    lookup: HashMap<DeclName, Vec<DeclId>>,
}

pub struct DeclTable {
    decls: Vec<Decl>,
    /// Redeclaration chains, keyed by the canonical declaration. A chain
    /// entry exists only once an entity has been declared twice; the vec
    /// holds every declaration in order, canonical first.
    chains: HashMap<DeclId, Vec<DeclId>>,
    contexts: HashMap<DeclId, DeclContextData>,
    /// Objective-C method tables, keyed by (selector, is-instance).
    objc_methods: HashMap<(SelectorId, bool), Vec<DeclId>>,
    /// Class/function template specializations, keyed by template and
    /// hash-consed argument list.
    template_specs: HashMap<(DeclId, Vec<TemplateArg>), DeclId>,
    translation_unit: DeclId,
}

impl DeclTable {
    pub fn new() -> Self {
        let mut table = Self {
            decls: Vec::new(),
            chains: HashMap::new(),
            contexts: HashMap::new(),
            objc_methods: HashMap::new(),
            template_specs: HashMap::new(),
            translation_unit: DeclId(0),
        };
        let tu = table.create(DeclKind::TranslationUnit, None, SourceLocation::invalid(), None, None);
        table.translation_unit = tu;
        table
    }

    pub fn translation_unit(&self) -> DeclId {
        self.translation_unit
    }

    /// Allocate a declaration. It starts as its own canonical declaration
    /// and is added to its semantic parent's context.
    pub fn create(
        &mut self,
        kind: DeclKind,
        name: Option<DeclName>,
        loc: SourceLocation,
        lexical_parent: Option<DeclId>,
        semantic_parent: Option<DeclId>,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let namespaces = kind.namespaces();
        let is_context = kind.is_context();
        self.decls.push(Decl {
            kind,
            name,
            loc,
            lexical_parent,
            semantic_parent,
            access: Default::default(),
            canonical: id,
            namespaces,
        });
        if is_context {
            self.contexts.entry(id).or_default();
        }
        if let Some(parent) = semantic_parent {
            self.add_to_context(parent, id);
        }
        id
    }

    pub fn decl(
        &self,
        id: DeclId,
    ) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(
        &mut self,
        id: DeclId,
    ) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Every declaration in allocation order.
    pub fn all_decls(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId)
    }

    pub fn decl_name(
        &self,
        id: DeclId,
        idents: &IdentifierTable,
    ) -> Option<String> {
        match self.decl(id).name {
            Some(DeclName::Ident(ident)) => Some(idents.spelling(ident).to_owned()),
            // Selector spellings need the selector table; callers that have
            // one render methods themselves.
            Some(DeclName::Selector(_)) => None,
            None => None,
        }
    }

    // ── redeclaration chains ────────────────────────────────────────────

    /// Link `new_decl` as a redeclaration of `prev`. The chain's canonical
    /// element stays the first-declared one.
    pub fn link_redeclaration(
        &mut self,
        prev: DeclId,
        new_decl: DeclId,
    ) {
        let canonical = self.decl(prev).canonical;
        debug_assert_ne!(canonical, new_decl, "declaration cannot redeclare itself");
        self.decl_mut(new_decl).canonical = canonical;
        let chain = self.chains.entry(canonical).or_insert_with(|| vec![canonical]);
        chain.push(new_decl);
    }

    pub fn canonical_decl(
        &self,
        id: DeclId,
    ) -> DeclId {
        self.decl(id).canonical
    }

    /// Every declaration of the entity, in declaration order. A lone
    /// declaration yields just itself.
    pub fn redeclarations(
        &self,
        id: DeclId,
    ) -> Vec<DeclId> {
        let canonical = self.decl(id).canonical;
        match self.chains.get(&canonical) {
            Some(chain) => chain.clone(),
            None => vec![canonical],
        }
    }

    /// The most recently seen declaration of the entity.
    pub fn latest_decl(
        &self,
        id: DeclId,
    ) -> DeclId {
        let canonical = self.decl(id).canonical;
        match self.chains.get(&canonical) {
            Some(chain) => *chain.last().expect("chains are never empty"),
            None => canonical,
        }
    }

    /// The unique definition in the chain, if the entity is defined.
    pub fn definition(
        &self,
        id: DeclId,
    ) -> Option<DeclId> {
        self.redeclarations(id).into_iter().find(|&d| self.decl(d).kind.is_definition())
    }

    // ── tag queries ─────────────────────────────────────────────────────

    pub fn tag_kind(
        &self,
        id: DeclId,
    ) -> Option<TagKind> {
        match self.decl(id).kind {
            DeclKind::Record {
                tag_kind, ..
            } => Some(tag_kind),
            _ => None,
        }
    }

    /// Whether any declaration in the tag's chain is a definition.
    pub fn tag_is_defined(
        &self,
        id: DeclId,
    ) -> bool {
        self.definition(id).is_some()
    }

    /// The record type id installed on this tag (same for every chain
    /// member, stored on the canonical one).
    pub fn tag_type(
        &self,
        id: DeclId,
    ) -> Option<TypeId> {
        let canonical = self.decl(id).canonical;
        match self.decl(canonical).kind {
            DeclKind::Record {
                ty, ..
            }
            | DeclKind::Enum {
                ty, ..
            } => ty,
            _ => None,
        }
    }

    pub fn set_tag_type(
        &mut self,
        id: DeclId,
        type_id: TypeId,
    ) {
        let canonical = self.decl(id).canonical;
        match &mut self.decl_mut(canonical).kind {
            DeclKind::Record {
                ty, ..
            }
            | DeclKind::Enum {
                ty, ..
            } => *ty = Some(type_id),
            _ => panic!("not a tag declaration"),
        }
    }

    // ── declaration contexts ────────────────────────────────────────────

    pub fn add_to_context(
        &mut self,
        context: DeclId,
        decl: DeclId,
    ) {
        let name = self.decl(decl).name;
        let data = self.contexts.entry(context).or_default();
        data.decls.push(decl);
        if let Some(name) = name {
            data.lookup.entry(name).or_default().push(decl);
        }
    }

    /// Members of a context in declaration order.
    pub fn context_decls(
        &self,
        context: DeclId,
    ) -> &[DeclId] {
        self.contexts.get(&context).map(|data| data.decls.as_slice()).unwrap_or(&[])
    }

    /// Look a name up in one context, filtered by namespace. Used for
    /// member lookup and C++ qualified lookup.
    pub fn lookup_in_context(
        &self,
        context: DeclId,
        name: DeclName,
        namespaces: IdentifierNamespace,
    ) -> Option<DeclId> {
        let data = self.contexts.get(&context)?;
        let candidates = data.lookup.get(&name)?;
        candidates.iter().rev().copied().find(|&d| self.decl(d).namespaces.intersects(namespaces))
    }

    /// All same-named members of a context (the C++ overload set).
    pub fn lookup_all_in_context(
        &self,
        context: DeclId,
        name: DeclName,
        namespaces: IdentifierNamespace,
    ) -> Vec<DeclId> {
        let Some(data) = self.contexts.get(&context) else {
            return Vec::new();
        };
        match data.lookup.get(&name) {
            Some(candidates) => {
                candidates.iter().copied().filter(|&d| self.decl(d).namespaces.intersects(namespaces)).collect()
            },
            None => Vec::new(),
        }
    }

    // ── Objective-C method tables ───────────────────────────────────────

    pub fn add_objc_method(
        &mut self,
        selector: SelectorId,
        is_instance: bool,
        method: DeclId,
    ) {
        self.objc_methods.entry((selector, is_instance)).or_default().push(method);
    }

    pub fn lookup_objc_method(
        &self,
        selector: SelectorId,
        is_instance: bool,
    ) -> &[DeclId] {
        self.objc_methods.get(&(selector, is_instance)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    // ── template specializations ────────────────────────────────────────

    /// The recorded specialization of `template` for `args`, if any.
    pub fn template_specialization(
        &self,
        template: DeclId,
        args: &[TemplateArg],
    ) -> Option<DeclId> {
        self.template_specs.get(&(template, args.to_vec())).copied()
    }

    /// Record a specialization so instantiation is done at most once per
    /// argument list.
    pub fn add_template_specialization(
        &mut self,
        template: DeclId,
        args: Vec<TemplateArg>,
        specialization: DeclId,
    ) {
        self.template_specs.insert((template, args), specialization);
    }

    pub fn template_specializations_of(
        &self,
        template: DeclId,
    ) -> Vec<DeclId> {
        self.template_specs.iter().filter(|((t, _), _)| *t == template).map(|(_, &d)| d).collect()
    }
}

impl Default for DeclTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/src/decl/table_tests.rs"]
mod tests;
