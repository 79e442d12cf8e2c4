//! Expression nodes.

use serde::Serialize;

use rill_common::span::Span;
use rill_common::token::TokenKind;

use crate::ast::stmt::Stmt;
use crate::ast::ty::Type;

/// Any expression node.
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    Int(IntLit),
    Float(FloatLit),
    Bool(BoolLit),
    Str(StrLit),
    Symbol(Symbol),
    Binary(Box<BinaryExpr>),
    Prefix(Box<PrefixExpr>),
    Assignment(Box<AssignmentExpr>),
    Member(Box<MemberExpr>),
    Index(Box<IndexExpr>),
    StructLiteral(StructLiteral),
    Array(ArrayLiteral),
    Call(Box<CallExpr>),
    Function(Box<FnExpr>),
    Is(Box<IsExpr>),
    Deref(Box<DerefExpr>),
    /// Sentinel produced when no handler exists for the current token.
    Error(Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(n) => n.span,
            Expr::Float(n) => n.span,
            Expr::Bool(n) => n.span,
            Expr::Str(n) => n.span,
            Expr::Symbol(n) => n.span,
            Expr::Binary(n) => n.span,
            Expr::Prefix(n) => n.span,
            Expr::Assignment(n) => n.span,
            Expr::Member(n) => n.span,
            Expr::Index(n) => n.span,
            Expr::StructLiteral(n) => n.span,
            Expr::Array(n) => n.span,
            Expr::Call(n) => n.span,
            Expr::Function(n) => n.span,
            Expr::Is(n) => n.span,
            Expr::Deref(n) => n.span,
            Expr::Error(span) => *span,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntLit {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatLit {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrLit {
    /// Unescaped contents, quotes removed.
    pub value: String,
    pub span: Span,
}

/// An identifier use. `reference` is set when the argument was spelled
/// `...name`, marking it as a reference argument at a call site.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub reference: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: TokenKind,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefixExpr {
    pub op: TokenKind,
    pub rhs: Expr,
    pub span: Span,
}

/// `target = rhs` and friends. Postfix `++`/`--` lower to this node with
/// a literal `1` on the right.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentExpr {
    pub target: Expr,
    pub op: TokenKind,
    pub rhs: Expr,
    pub span: Span,
}

/// `target.property` -- struct field or enum member access.
#[derive(Debug, Clone, Serialize)]
pub struct MemberExpr {
    pub target: Expr,
    pub property: String,
    pub span: Span,
}

/// `target[index]`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexExpr {
    pub target: Expr,
    pub index: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructLiteral {
    pub name: String,
    pub fields: Vec<FieldInit>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// One call argument, named when spelled `name: value`.
#[derive(Debug, Clone, Serialize)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Arg>,
    pub span: Span,
}

/// One function parameter. `index` is the zero-based position used for
/// positional argument binding; `reference` marks a `*` parameter and
/// `mutable` a `mut` one (`mut *` is a mutable reference).
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub name: String,
    pub index: usize,
    pub mutable: bool,
    pub reference: bool,
    pub ty: Type,
    pub span: Span,
}

/// An anonymous function. Named `fn` statements lower to a declaration
/// whose value is one of these.
#[derive(Debug, Clone, Serialize)]
pub struct FnExpr {
    pub type_param: Option<String>,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FnExpr {
    /// Find a parameter by name (named-argument binding).
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// `value is type`.
#[derive(Debug, Clone, Serialize)]
pub struct IsExpr {
    pub value: Expr,
    pub ty: Type,
    pub span: Span,
}

/// `*value`.
#[derive(Debug, Clone, Serialize)]
pub struct DerefExpr {
    pub value: Expr,
    pub span: Span,
}
