//! Rill parser: Pratt parser producing a typed AST.
//!
//! The same precedence-climbing engine drives expressions and type
//! expressions, each with their own handler tables (see
//! [`parser::lookups`]). Statement dispatch is a third table keyed on
//! the leading token; anything without a handler falls through to an
//! expression statement.

pub mod ast;
mod parser;

use rill_common::diagnostic::Diagnostic;
use rill_common::token::Token;

use ast::Stmt;
use parser::Parser;

/// Result of parsing a token stream.
#[derive(Debug)]
pub struct Parse {
    /// Top-level statements in source order.
    pub program: Vec<Stmt>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a token stream (as produced by `rill-lexer`) into a program.
pub fn parse(tokens: Vec<Token>) -> Parse {
    let mut p = Parser::new(tokens);
    let mut program = Vec::new();

    while p.has_tokens() && !p.panicked() {
        program.push(parser::stmt::parse_stmt(&mut p));
    }

    Parse {
        program,
        diagnostics: p.into_diagnostics(),
    }
}

/// Convenience for tests and the CLI: lex then parse, merging nothing --
/// the caller is expected to gate on lexer diagnostics first.
pub fn parse_source(source: &str) -> Parse {
    parse(rill_lexer::tokenize(source).tokens)
}

/// Parse a standalone type expression, e.g. `array<int, float>`.
pub fn parse_type_source(source: &str) -> (ast::Type, Vec<Diagnostic>) {
    let mut p = Parser::new(rill_lexer::tokenize(source).tokens);
    let ty = parser::types::parse_type(&mut p, parser::lookups::BindingPower::Default);
    (ty, p.into_diagnostics())
}
