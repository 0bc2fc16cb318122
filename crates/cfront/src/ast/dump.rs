//! A serde-backed dump of the declaration and statement trees.
//!
//! Consumed by the driver's `--ast-dump` mode and by snapshot tests. The
//! dump resolves handles to readable names and printed types; it is a
//! debugging view, not a persistence format.

use serde_json::{Value, json};

use crate::ast::context::AstContext;
use crate::ast::stmt::{ExprId, StmtId, StmtKind};
use crate::basic::ident::IdentifierTable;
use crate::basic::source_location::SourceLocation;
use crate::basic::source_manager::SourceManager;
use crate::decl::decl::{DeclId, DeclKind};
use crate::types::ty::QualType;

pub struct AstDumper<'a> {
    ctx: &'a AstContext,
    idents: &'a IdentifierTable,
    sm: Option<&'a SourceManager>,
}

impl<'a> AstDumper<'a> {
    pub fn new(
        ctx: &'a AstContext,
        idents: &'a IdentifierTable,
        sm: Option<&'a SourceManager>,
    ) -> Self {
        Self {
            ctx,
            idents,
            sm,
        }
    }

    pub fn dump_translation_unit(&self) -> Value {
        let tu = self.ctx.decls.translation_unit();
        json!({
            "kind": "TranslationUnitDecl",
            "decls": self.ctx.decls.context_decls(tu).iter().map(|&d| self.dump_decl(d)).collect::<Vec<_>>(),
        })
    }

    fn loc_value(
        &self,
        loc: SourceLocation,
    ) -> Value {
        let Some(sm) = self.sm else {
            return Value::Null;
        };
        if !loc.is_valid() {
            return Value::Null;
        }
        let logical = sm.logical_loc(loc);
        json!({
            "line": sm.line_number(logical),
            "col": sm.column_number(logical),
        })
    }

    fn type_value(
        &self,
        ty: QualType,
    ) -> Value {
        Value::String(self.ctx.types.print(ty, &self.ctx.decls, self.idents))
    }

    pub fn dump_decl(
        &self,
        id: DeclId,
    ) -> Value {
        let decl = self.ctx.decls.decl(id);
        let name = self
            .ctx
            .decls
            .decl_name(id, self.idents)
            .map(Value::String)
            .unwrap_or(Value::Null);
        let loc = self.loc_value(decl.loc);

        match &decl.kind {
            DeclKind::TranslationUnit => json!({ "kind": "TranslationUnitDecl" }),
            DeclKind::Var {
                ty,
                init,
                ..
            } => json!({
                "kind": "VarDecl",
                "name": name,
                "type": self.type_value(*ty),
                "loc": loc,
                "init": init.map(|e| self.dump_expr(e)),
            }),
            DeclKind::Function {
                ty,
                params,
                body,
                ..
            } => json!({
                "kind": "FunctionDecl",
                "name": name,
                "type": self.type_value(*ty),
                "loc": loc,
                "params": params.iter().map(|&p| self.dump_decl(p)).collect::<Vec<_>>(),
                "body": body.map(|b| self.dump_stmt(b)),
            }),
            DeclKind::Parm {
                ty,
            } => json!({
                "kind": "ParmDecl",
                "name": name,
                "type": self.type_value(*ty),
            }),
            DeclKind::Field {
                ty, ..
            } => json!({
                "kind": "FieldDecl",
                "name": name,
                "type": self.type_value(*ty),
                "loc": loc,
            }),
            DeclKind::EnumConstant {
                value, ..
            } => json!({
                "kind": "EnumConstantDecl",
                "name": name,
                "value": value,
            }),
            DeclKind::Typedef {
                underlying,
            } => json!({
                "kind": "TypedefDecl",
                "name": name,
                "underlying": self.type_value(*underlying),
                "loc": loc,
            }),
            DeclKind::Record {
                tag_kind,
                is_definition,
                fields,
                ..
            } => json!({
                "kind": "RecordDecl",
                "tag": tag_kind.keyword(),
                "name": name,
                "definition": is_definition,
                "loc": loc,
                "fields": fields.iter().map(|&f| self.dump_decl(f)).collect::<Vec<_>>(),
            }),
            DeclKind::Enum {
                is_definition,
                enumerators,
                ..
            } => json!({
                "kind": "EnumDecl",
                "name": name,
                "definition": is_definition,
                "loc": loc,
                "enumerators": enumerators.iter().map(|&e| self.dump_decl(e)).collect::<Vec<_>>(),
            }),
            DeclKind::ClassTemplate {
                templated, ..
            } => json!({
                "kind": "ClassTemplateDecl",
                "name": name,
                "templated": self.dump_decl(*templated),
            }),
            DeclKind::FunctionTemplate {
                templated, ..
            } => json!({
                "kind": "FunctionTemplateDecl",
                "name": name,
                "templated": self.dump_decl(*templated),
            }),
            DeclKind::TemplateTypeParm {
                index, ..
            } => json!({
                "kind": "TemplateTypeParmDecl",
                "name": name,
                "index": index,
            }),
            DeclKind::Namespace => json!({
                "kind": "NamespaceDecl",
                "name": name,
                "decls": self.ctx.decls.context_decls(id).iter().map(|&d| self.dump_decl(d)).collect::<Vec<_>>(),
            }),
            DeclKind::LinkageSpec {
                lang,
            } => json!({
                "kind": "LinkageSpecDecl",
                "lang": format!("{lang:?}"),
            }),
            DeclKind::ObjCInterface {
                ivars,
                methods,
                ..
            } => json!({
                "kind": "ObjCInterfaceDecl",
                "name": name,
                "ivars": ivars.iter().map(|&d| self.dump_decl(d)).collect::<Vec<_>>(),
                "methods": methods.iter().map(|&d| self.dump_decl(d)).collect::<Vec<_>>(),
            }),
            DeclKind::ObjCProtocol { .. } => json!({
                "kind": "ObjCProtocolDecl",
                "name": name,
            }),
            DeclKind::ObjCMethod {
                selector,
                is_instance,
                result_ty,
                ..
            } => json!({
                "kind": "ObjCMethodDecl",
                "selector": self.ctx.selectors.name(*selector, self.idents),
                "instance": is_instance,
                "result": self.type_value(*result_ty),
            }),
            DeclKind::ObjCIvar {
                ty,
            } => json!({
                "kind": "ObjCIvarDecl",
                "name": name,
                "type": self.type_value(*ty),
            }),
            DeclKind::ObjCCategory { .. } => json!({
                "kind": "ObjCCategoryDecl",
                "name": name,
            }),
            DeclKind::ObjCImplementation { .. } => json!({
                "kind": "ObjCImplementationDecl",
                "name": name,
            }),
        }
    }

    pub fn dump_stmt(
        &self,
        id: StmtId,
    ) -> Value {
        let stmt = self.ctx.ast.stmt(id);
        if stmt.class().is_expr() {
            return self.dump_expr(ExprId(id.index()));
        }

        match &stmt.kind {
            StmtKind::Null { .. } => json!({ "kind": "NullStmt" }),
            StmtKind::Compound {
                body, ..
            } => json!({
                "kind": "CompoundStmt",
                "body": body.iter().map(|&s| self.dump_stmt(s)).collect::<Vec<_>>(),
            }),
            StmtKind::Decl {
                decls, ..
            } => json!({
                "kind": "DeclStmt",
                "decls": decls.iter().map(|&d| self.dump_decl(d)).collect::<Vec<_>>(),
            }),
            StmtKind::If {
                cond,
                then_body,
                else_body,
                ..
            } => json!({
                "kind": "IfStmt",
                "cond": self.dump_expr(*cond),
                "then": self.dump_stmt(*then_body),
                "else": else_body.map(|s| self.dump_stmt(s)),
            }),
            StmtKind::While {
                cond,
                body,
                ..
            } => json!({
                "kind": "WhileStmt",
                "cond": self.dump_expr(*cond),
                "body": self.dump_stmt(*body),
            }),
            StmtKind::Do {
                body,
                cond,
                ..
            } => json!({
                "kind": "DoStmt",
                "body": self.dump_stmt(*body),
                "cond": self.dump_expr(*cond),
            }),
            StmtKind::For {
                init,
                cond,
                inc,
                body,
                ..
            } => json!({
                "kind": "ForStmt",
                "init": init.map(|s| self.dump_stmt(s)),
                "cond": cond.map(|e| self.dump_expr(e)),
                "inc": inc.map(|e| self.dump_expr(e)),
                "body": self.dump_stmt(*body),
            }),
            StmtKind::Switch {
                cond,
                body,
                ..
            } => json!({
                "kind": "SwitchStmt",
                "cond": self.dump_expr(*cond),
                "body": self.dump_stmt(*body),
            }),
            StmtKind::Case {
                value,
                body,
                ..
            } => json!({
                "kind": "CaseStmt",
                "value": self.dump_expr(*value),
                "body": body.map(|s| self.dump_stmt(s)),
            }),
            StmtKind::Default {
                body, ..
            } => json!({
                "kind": "DefaultStmt",
                "body": body.map(|s| self.dump_stmt(s)),
            }),
            StmtKind::Break { .. } => json!({ "kind": "BreakStmt" }),
            StmtKind::Continue { .. } => json!({ "kind": "ContinueStmt" }),
            StmtKind::Return {
                value, ..
            } => json!({
                "kind": "ReturnStmt",
                "value": value.map(|e| self.dump_expr(e)),
            }),
            StmtKind::Goto {
                label, ..
            } => json!({
                "kind": "GotoStmt",
                "label": self.idents.spelling(*label),
            }),
            StmtKind::Label {
                label,
                body,
                ..
            } => json!({
                "kind": "LabelStmt",
                "label": self.idents.spelling(*label),
                "body": self.dump_stmt(*body),
            }),
            _ => unreachable!("expression classes handled above"),
        }
    }

    pub fn dump_expr(
        &self,
        id: ExprId,
    ) -> Value {
        let node = self.ctx.ast.expr(id);
        let data = node.expr_data().expect("node is an expression");
        let ty = self.type_value(data.ty);
        let category = format!("{:?}", data.category);

        match &node.kind {
            StmtKind::IntegerLiteral {
                value, ..
            } => json!({
                "kind": "IntegerLiteral", "type": ty, "category": category, "value": value,
            }),
            StmtKind::FloatingLiteral {
                value, ..
            } => json!({
                "kind": "FloatingLiteral", "type": ty, "category": category, "value": value,
            }),
            StmtKind::CharacterLiteral {
                value, ..
            } => json!({
                "kind": "CharacterLiteral", "type": ty, "category": category, "value": value,
            }),
            StmtKind::StringLiteral {
                bytes, ..
            } => json!({
                "kind": "StringLiteral", "type": ty, "category": category,
                "value": String::from_utf8_lossy(bytes),
            }),
            StmtKind::DeclRef {
                decl, ..
            } => json!({
                "kind": "DeclRefExpr", "type": ty, "category": category,
                "name": self.ctx.decls.decl_name(*decl, self.idents),
            }),
            StmtKind::Paren {
                inner, ..
            } => json!({
                "kind": "ParenExpr", "type": ty, "category": category,
                "inner": self.dump_expr(*inner),
            }),
            StmtKind::Unary {
                op,
                operand,
                ..
            } => json!({
                "kind": "UnaryOperator", "opcode": format!("{op:?}"), "type": ty, "category": category,
                "operand": self.dump_expr(*operand),
            }),
            StmtKind::SizeOfAlignOfType {
                is_sizeof,
                operand_ty,
                ..
            } => json!({
                "kind": "SizeOfAlignOfTypeExpr", "sizeof": is_sizeof, "type": ty,
                "argType": self.type_value(*operand_ty),
            }),
            StmtKind::Binary {
                op,
                lhs,
                rhs,
                ..
            } => json!({
                "kind": "BinaryOperator", "opcode": format!("{op:?}"), "type": ty, "category": category,
                "lhs": self.dump_expr(*lhs),
                "rhs": self.dump_expr(*rhs),
            }),
            StmtKind::Conditional {
                cond,
                then_expr,
                else_expr,
                ..
            } => json!({
                "kind": "ConditionalOperator", "type": ty, "category": category,
                "cond": self.dump_expr(*cond),
                "then": self.dump_expr(*then_expr),
                "else": self.dump_expr(*else_expr),
            }),
            StmtKind::ImplicitCast {
                kind,
                operand,
                ..
            } => json!({
                "kind": "ImplicitCastExpr", "castKind": format!("{kind:?}"), "type": ty, "category": category,
                "operand": self.dump_expr(*operand),
            }),
            StmtKind::CStyleCast {
                operand, ..
            } => json!({
                "kind": "CStyleCastExpr", "type": ty, "category": category,
                "operand": self.dump_expr(*operand),
            }),
            StmtKind::Member {
                base,
                member,
                is_arrow,
                ..
            } => json!({
                "kind": "MemberExpr", "type": ty, "category": category, "arrow": is_arrow,
                "member": self.ctx.decls.decl_name(*member, self.idents),
                "base": self.dump_expr(*base),
            }),
            StmtKind::ArraySubscript {
                base,
                index,
                ..
            } => json!({
                "kind": "ArraySubscriptExpr", "type": ty, "category": category,
                "base": self.dump_expr(*base),
                "index": self.dump_expr(*index),
            }),
            StmtKind::Call {
                callee,
                args,
                ..
            } => json!({
                "kind": "CallExpr", "type": ty, "category": category,
                "callee": self.dump_expr(*callee),
                "args": args.iter().map(|&a| self.dump_expr(a)).collect::<Vec<_>>(),
            }),
            StmtKind::InitList {
                inits, ..
            } => json!({
                "kind": "InitListExpr", "type": ty,
                "inits": inits.iter().map(|&e| self.dump_expr(e)).collect::<Vec<_>>(),
            }),
            StmtKind::ObjCMessage {
                receiver,
                selector,
                args,
                ..
            } => json!({
                "kind": "ObjCMessageExpr", "type": ty,
                "selector": self.ctx.selectors.name(*selector, self.idents),
                "receiver": receiver.map(|r| self.dump_expr(r)),
                "args": args.iter().map(|&a| self.dump_expr(a)).collect::<Vec<_>>(),
            }),
            _ => unreachable!("statement classes never reach dump_expr"),
        }
    }
}
