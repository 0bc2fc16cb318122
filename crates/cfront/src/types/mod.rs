pub mod context;
pub mod predicates;
pub mod printer;
pub mod ty;

pub use context::TypeContext;
pub use ty::{QualType, Qualifiers, TypeId, TypeKind};
