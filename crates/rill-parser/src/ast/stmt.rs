//! Statement nodes.

use serde::Serialize;

use rill_common::span::Span;

use crate::ast::expr::Expr;
use crate::ast::ty::Type;

/// Any statement node.
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    Block(BlockStmt),
    Expression(ExprStmt),
    Declaration(Box<DeclarationStmt>),
    Struct(StructStmt),
    Interface(InterfaceStmt),
    Enum(EnumStmt),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    For(Box<ForStmt>),
    Return(ReturnStmt),
    Continue(Span),
    Break(Span),
    Import(ImportStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(n) => n.span,
            Stmt::Expression(n) => n.span,
            Stmt::Declaration(n) => n.span,
            Stmt::Struct(n) => n.span,
            Stmt::Interface(n) => n.span,
            Stmt::Enum(n) => n.span,
            Stmt::If(n) => n.span,
            Stmt::While(n) => n.span,
            Stmt::For(n) => n.span,
            Stmt::Return(n) => n.span,
            Stmt::Continue(span) | Stmt::Break(span) => *span,
            Stmt::Import(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `let [mut] name [: ty] = value;`. Named `fn` statements lower here
/// with an [`FnExpr`] value and an unset declared type.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationStmt {
    pub name: String,
    pub mutable: bool,
    pub value: Expr,
    pub ty: Type,
    pub span: Span,
}

/// One `name: type` property of a struct or interface body.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructStmt {
    pub name: String,
    pub type_param: Option<String>,
    pub properties: Vec<Property>,
    pub span: Span,
}

/// `interface N = type;` registers a single type (unions via `is`);
/// `interface N { ... }` registers a property map checked structurally.
#[derive(Debug, Clone, Serialize)]
pub enum InterfaceBody {
    Single(Type),
    Properties(Vec<Property>),
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceStmt {
    pub name: String,
    pub type_param: Option<String>,
    pub body: InterfaceBody,
    pub span: Span,
}

/// Members carry their ordinal, assigned in declaration order from zero.
#[derive(Debug, Clone, Serialize)]
pub struct EnumStmt {
    pub name: String,
    pub members: Vec<(String, i64)>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Stmt,
    pub else_block: Option<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
    pub span: Span,
}

/// `for (init; cond; step) body`. The step expression is the one place
/// an expression statement goes unterminated.
#[derive(Debug, Clone, Serialize)]
pub struct ForStmt {
    pub init: Stmt,
    pub cond: Expr,
    pub step: Expr,
    pub body: Stmt,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `import "path" [-> name | -> { a, b }];`
#[derive(Debug, Clone, Serialize)]
pub struct ImportStmt {
    pub path: String,
    pub alias: Option<String>,
    pub items: Option<Vec<String>>,
    pub span: Span,
}
