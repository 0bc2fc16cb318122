pub mod context;
pub mod dump;
pub mod stmt;
pub mod visitor;

pub use context::AstContext;

pub use stmt::{AstArena, BinaryOp, CastKind, ExprId, Stmt, StmtClass, StmtId, StmtKind, UnaryOp, ValueCategory};
pub use visitor::StmtVisitor;
