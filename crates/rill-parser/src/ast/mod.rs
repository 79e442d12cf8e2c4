//! Typed AST for Rill.
//!
//! Two closed variant families ([`Stmt`], [`Expr`]) plus the shared
//! [`ty::Type`] record used for type expressions. Every node carries a
//! [`Span`](rill_common::span::Span) for diagnostics; spans never take
//! part in comparisons.

pub mod expr;
pub mod stmt;
pub mod ty;

pub use expr::*;
pub use stmt::*;
pub use ty::Type;
