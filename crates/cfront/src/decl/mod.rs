pub mod decl;
pub mod lookup;
pub mod scope;
pub mod table;

pub use decl::{Access, Decl, DeclId, DeclKind, DeclName, StorageClass, TagKind};
pub use lookup::{IdentResolver, LookupKind};
pub use scope::{Scope, ScopeFlags, ScopeStack};
pub use table::DeclTable;
