//! Shared types for the Rill toolchain.
//!
//! Every stage of the pipeline (lexer, parser, type checker, interpreter)
//! speaks in terms of the types defined here: byte-offset [`span::Span`]s,
//! the [`token::Token`] vocabulary, and the [`diagnostic::Diagnostic`]
//! record that all stages append their errors to.

pub mod diagnostic;
pub mod span;
pub mod token;
