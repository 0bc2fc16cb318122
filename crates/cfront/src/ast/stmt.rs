//! Statement and expression nodes.
//!
//! A single arena holds both: `Expr` is a refinement of `Stmt`, and every
//! node carries a [`StmtClass`] for visitor dispatch. Binary and unary
//! operators are one node each with an opcode sub-tag rather than one class
//! per operator. Parents own their children by index; the arena lives as
//! long as the translation unit.

use crate::basic::ident::IdentId;
use crate::basic::selector::SelectorId;
use crate::basic::source_location::{SourceLocation, SourceRange};
use crate::decl::decl::DeclId;
use crate::types::ty::QualType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub(crate) u32);

/// An id known to address an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub(crate) u32);

impl From<ExprId> for StmtId {
    fn from(id: ExprId) -> StmtId {
        StmtId(id.0)
    }
}

impl StmtId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl ExprId {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    LValue,
    RValue,
}

/// Payload common to every expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprData {
    pub ty: QualType,
    pub category: ValueCategory,
    pub range: SourceRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Xor,
    Or,
    LAnd,
    LOr,
    Assign,
    MulAssign,
    DivAssign,
    RemAssign,
    AddAssign,
    SubAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
    Comma,
}

impl BinaryOp {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::RemAssign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::AndAssign
                | BinaryOp::XorAssign
                | BinaryOp::OrAssign
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn spelling(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&",
            BinaryOp::Xor => "^",
            BinaryOp::Or => "|",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
            BinaryOp::Assign => "=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::AndAssign => "&=",
            BinaryOp::XorAssign => "^=",
            BinaryOp::OrAssign => "|=",
            BinaryOp::Comma => ",",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    PostInc,
    PostDec,
    PreInc,
    PreDec,
    AddrOf,
    Deref,
    Plus,
    Minus,
    Not,
    LNot,
    /// `sizeof expr`
    SizeOf,
    /// `__alignof__ expr`
    AlignOf,
    /// `__real__ expr`
    Real,
    /// `__imag__ expr`
    Imag,
    /// `__extension__ expr`
    Extension,
}

impl UnaryOp {
    pub fn spelling(self) -> &'static str {
        match self {
            UnaryOp::PostInc | UnaryOp::PreInc => "++",
            UnaryOp::PostDec | UnaryOp::PreDec => "--",
            UnaryOp::AddrOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "~",
            UnaryOp::LNot => "!",
            UnaryOp::SizeOf => "sizeof",
            UnaryOp::AlignOf => "__alignof__",
            UnaryOp::Real => "__real__",
            UnaryOp::Imag => "__imag__",
            UnaryOp::Extension => "__extension__",
        }
    }
}

/// What an implicit cast does; consumers dispatch on this when lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    LValueToRValue,
    ArrayToPointerDecay,
    FunctionToPointerDecay,
    IntegralCast,
    FloatingCast,
    IntegralToFloating,
    FloatingToIntegral,
    IntegralToPointer,
    PointerToIntegral,
    PointerCast,
    ToVoid,
    NoOp,
}

/// Dispatch tag; one value per constructible node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtClass {
    NullStmt,
    CompoundStmt,
    DeclStmt,
    IfStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    SwitchStmt,
    CaseStmt,
    DefaultStmt,
    BreakStmt,
    ContinueStmt,
    ReturnStmt,
    GotoStmt,
    LabelStmt,

    IntegerLiteral,
    FloatingLiteral,
    CharacterLiteral,
    StringLiteral,
    DeclRefExpr,
    ParenExpr,
    UnaryOperator,
    SizeOfAlignOfTypeExpr,
    BinaryOperator,
    ConditionalOperator,
    ImplicitCastExpr,
    CStyleCastExpr,
    MemberExpr,
    ArraySubscriptExpr,
    CallExpr,
    InitListExpr,
    ObjCMessageExpr,
}

impl StmtClass {
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            StmtClass::IntegerLiteral
                | StmtClass::FloatingLiteral
                | StmtClass::CharacterLiteral
                | StmtClass::StringLiteral
                | StmtClass::DeclRefExpr
                | StmtClass::ParenExpr
                | StmtClass::UnaryOperator
                | StmtClass::SizeOfAlignOfTypeExpr
                | StmtClass::BinaryOperator
                | StmtClass::ConditionalOperator
                | StmtClass::ImplicitCastExpr
                | StmtClass::CStyleCastExpr
                | StmtClass::MemberExpr
                | StmtClass::ArraySubscriptExpr
                | StmtClass::CallExpr
                | StmtClass::InitListExpr
                | StmtClass::ObjCMessageExpr
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // ── statements ──────────────────────────────────────────────────────
    Null {
        semi_loc: SourceLocation,
    },
    Compound {
        body: Vec<StmtId>,
        lbrace_loc: SourceLocation,
        rbrace_loc: SourceLocation,
    },
    Decl {
        decls: Vec<DeclId>,
        range: SourceRange,
    },
    If {
        cond: ExprId,
        then_body: StmtId,
        else_body: Option<StmtId>,
        if_loc: SourceLocation,
    },
    While {
        cond: ExprId,
        body: StmtId,
        while_loc: SourceLocation,
    },
    Do {
        body: StmtId,
        cond: ExprId,
        do_loc: SourceLocation,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        inc: Option<ExprId>,
        body: StmtId,
        for_loc: SourceLocation,
    },
    Switch {
        cond: ExprId,
        body: StmtId,
        switch_loc: SourceLocation,
    },
    Case {
        value: ExprId,
        body: Option<StmtId>,
        case_loc: SourceLocation,
    },
    Default {
        body: Option<StmtId>,
        default_loc: SourceLocation,
    },
    Break {
        break_loc: SourceLocation,
    },
    Continue {
        continue_loc: SourceLocation,
    },
    Return {
        value: Option<ExprId>,
        return_loc: SourceLocation,
    },
    Goto {
        label: IdentId,
        goto_loc: SourceLocation,
    },
    Label {
        label: IdentId,
        body: StmtId,
        label_loc: SourceLocation,
    },

    // ── expressions ─────────────────────────────────────────────────────
    IntegerLiteral {
        data: ExprData,
        value: u64,
    },
    FloatingLiteral {
        data: ExprData,
        value: f64,
    },
    CharacterLiteral {
        data: ExprData,
        value: u32,
    },
    StringLiteral {
        data: ExprData,
        bytes: Vec<u8>,
    },
    DeclRef {
        data: ExprData,
        decl: DeclId,
    },
    Paren {
        data: ExprData,
        inner: ExprId,
    },
    Unary {
        data: ExprData,
        op: UnaryOp,
        operand: ExprId,
    },
    /// `sizeof(type)` / `__alignof__(type)`.
    SizeOfAlignOfType {
        data: ExprData,
        is_sizeof: bool,
        operand_ty: QualType,
    },
    Binary {
        data: ExprData,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Conditional {
        data: ExprData,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    ImplicitCast {
        data: ExprData,
        kind: CastKind,
        operand: ExprId,
    },
    CStyleCast {
        data: ExprData,
        operand: ExprId,
    },
    Member {
        data: ExprData,
        base: ExprId,
        member: DeclId,
        is_arrow: bool,
        member_loc: SourceLocation,
    },
    ArraySubscript {
        data: ExprData,
        base: ExprId,
        index: ExprId,
    },
    Call {
        data: ExprData,
        callee: ExprId,
        args: Vec<ExprId>,
    },
    InitList {
        data: ExprData,
        inits: Vec<ExprId>,
    },
    ObjCMessage {
        data: ExprData,
        receiver: Option<ExprId>,
        selector: SelectorId,
        args: Vec<ExprId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
}

impl StmtKind {
    pub fn class(&self) -> StmtClass {
        match self {
            StmtKind::Null { .. } => StmtClass::NullStmt,
            StmtKind::Compound { .. } => StmtClass::CompoundStmt,
            StmtKind::Decl { .. } => StmtClass::DeclStmt,
            StmtKind::If { .. } => StmtClass::IfStmt,
            StmtKind::While { .. } => StmtClass::WhileStmt,
            StmtKind::Do { .. } => StmtClass::DoStmt,
            StmtKind::For { .. } => StmtClass::ForStmt,
            StmtKind::Switch { .. } => StmtClass::SwitchStmt,
            StmtKind::Case { .. } => StmtClass::CaseStmt,
            StmtKind::Default { .. } => StmtClass::DefaultStmt,
            StmtKind::Break { .. } => StmtClass::BreakStmt,
            StmtKind::Continue { .. } => StmtClass::ContinueStmt,
            StmtKind::Return { .. } => StmtClass::ReturnStmt,
            StmtKind::Goto { .. } => StmtClass::GotoStmt,
            StmtKind::Label { .. } => StmtClass::LabelStmt,
            StmtKind::IntegerLiteral { .. } => StmtClass::IntegerLiteral,
            StmtKind::FloatingLiteral { .. } => StmtClass::FloatingLiteral,
            StmtKind::CharacterLiteral { .. } => StmtClass::CharacterLiteral,
            StmtKind::StringLiteral { .. } => StmtClass::StringLiteral,
            StmtKind::DeclRef { .. } => StmtClass::DeclRefExpr,
            StmtKind::Paren { .. } => StmtClass::ParenExpr,
            StmtKind::Unary { .. } => StmtClass::UnaryOperator,
            StmtKind::SizeOfAlignOfType { .. } => StmtClass::SizeOfAlignOfTypeExpr,
            StmtKind::Binary { .. } => StmtClass::BinaryOperator,
            StmtKind::Conditional { .. } => StmtClass::ConditionalOperator,
            StmtKind::ImplicitCast { .. } => StmtClass::ImplicitCastExpr,
            StmtKind::CStyleCast { .. } => StmtClass::CStyleCastExpr,
            StmtKind::Member { .. } => StmtClass::MemberExpr,
            StmtKind::ArraySubscript { .. } => StmtClass::ArraySubscriptExpr,
            StmtKind::Call { .. } => StmtClass::CallExpr,
            StmtKind::InitList { .. } => StmtClass::InitListExpr,
            StmtKind::ObjCMessage { .. } => StmtClass::ObjCMessageExpr,
        }
    }
}

impl Stmt {
    pub fn class(&self) -> StmtClass {
        self.kind.class()
    }

    /// The expression payload, when this node is an expression.
    pub fn expr_data(&self) -> Option<&ExprData> {
        match &self.kind {
            StmtKind::IntegerLiteral {
                data, ..
            }
            | StmtKind::FloatingLiteral {
                data, ..
            }
            | StmtKind::CharacterLiteral {
                data, ..
            }
            | StmtKind::StringLiteral {
                data, ..
            }
            | StmtKind::DeclRef {
                data, ..
            }
            | StmtKind::Paren {
                data, ..
            }
            | StmtKind::Unary {
                data, ..
            }
            | StmtKind::SizeOfAlignOfType {
                data, ..
            }
            | StmtKind::Binary {
                data, ..
            }
            | StmtKind::Conditional {
                data, ..
            }
            | StmtKind::ImplicitCast {
                data, ..
            }
            | StmtKind::CStyleCast {
                data, ..
            }
            | StmtKind::Member {
                data, ..
            }
            | StmtKind::ArraySubscript {
                data, ..
            }
            | StmtKind::Call {
                data, ..
            }
            | StmtKind::InitList {
                data, ..
            }
            | StmtKind::ObjCMessage {
                data, ..
            } => Some(data),
            _ => None,
        }
    }
}

/// Arena of Stmt/Expr nodes, owned by the translation unit's context.
#[derive(Default)]
pub struct AstArena {
    nodes: Vec<Stmt>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_stmt(
        &mut self,
        kind: StmtKind,
    ) -> StmtId {
        debug_assert!(!kind.class().is_expr(), "expression kinds go through alloc_expr");
        let id = StmtId(self.nodes.len() as u32);
        self.nodes.push(Stmt {
            kind,
        });
        id
    }

    pub fn alloc_expr(
        &mut self,
        kind: StmtKind,
    ) -> ExprId {
        debug_assert!(kind.class().is_expr(), "statement kinds go through alloc_stmt");
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(Stmt {
            kind,
        });
        id
    }

    pub fn stmt(
        &self,
        id: StmtId,
    ) -> &Stmt {
        &self.nodes[id.0 as usize]
    }

    /// View a statement id as an expression id when the node is one.
    pub fn as_expr(
        &self,
        id: StmtId,
    ) -> Option<ExprId> {
        self.stmt(id).class().is_expr().then_some(ExprId(id.0))
    }

    pub fn expr(
        &self,
        id: ExprId,
    ) -> &Stmt {
        &self.nodes[id.0 as usize]
    }

    pub fn expr_data(
        &self,
        id: ExprId,
    ) -> &ExprData {
        self.expr(id).expr_data().expect("node is not an expression")
    }

    pub fn expr_ty(
        &self,
        id: ExprId,
    ) -> QualType {
        self.expr_data(id).ty
    }

    pub fn expr_category(
        &self,
        id: ExprId,
    ) -> ValueCategory {
        self.expr_data(id).category
    }

    pub fn expr_range(
        &self,
        id: ExprId,
    ) -> SourceRange {
        self.expr_data(id).range
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strip any parentheses around an expression.
    pub fn ignore_parens(
        &self,
        mut id: ExprId,
    ) -> ExprId {
        while let StmtKind::Paren {
            inner, ..
        } = &self.expr(id).kind
        {
            id = *inner;
        }
        id
    }

    /// Strip parentheses and implicit casts; the classic diagnostic helper.
    pub fn ignore_paren_casts(
        &self,
        mut id: ExprId,
    ) -> ExprId {
        loop {
            match &self.expr(id).kind {
                StmtKind::Paren {
                    inner, ..
                } => id = *inner,
                StmtKind::ImplicitCast {
                    operand, ..
                } => id = *operand,
                _ => return id,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/ast/stmt_tests.rs"]
mod tests;
