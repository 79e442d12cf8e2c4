//! Parser state: token cursor, diagnostics, and the handler tables.

pub(crate) mod expr;
pub(crate) mod lookups;
pub(crate) mod stmt;
pub(crate) mod types;

use rill_common::diagnostic::Diagnostic;
use rill_common::span::Span;
use rill_common::token::{Token, TokenKind};

use self::lookups::Lookups;

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Set when recovery is implausible; the statement loop stops consuming.
    panic_mode: bool,
    pub(crate) lookups: Lookups,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.last().map_or(false, |t| t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            panic_mode: false,
            lookups: Lookups::new(),
        }
    }

    // ── Cursor ─────────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// One-token lookahead. Clamps to the trailing `Eof`.
    pub(crate) fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    pub(crate) fn has_tokens(&self) -> bool {
        self.current_kind() != TokenKind::Eof
    }

    /// Consume and return the current token. Never moves past `Eof`.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token when it matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.current_kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Require a token of the given kind; records a diagnostic on
    /// mismatch, then advances either way so parsing can continue.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Token {
        if self.current_kind() != kind {
            let found = self.current().clone();
            self.error_at(
                format!(
                    "expected {} but found {}",
                    kind.describe(),
                    found.kind.describe()
                ),
                found.span,
                Some(found.literal),
            );
        }
        self.advance()
    }

    // ── Diagnostics ────────────────────────────────────────────────────

    pub(crate) fn error_at(&mut self, message: String, span: Span, literal: Option<String>) {
        self.diagnostics.push(Diagnostic {
            message,
            span,
            literal,
        });
    }

    pub(crate) fn error_here(&mut self, message: String) {
        let token = self.current().clone();
        self.error_at(message, token.span, Some(token.literal));
    }

    /// Record an error and stop the statement loop from consuming further.
    pub(crate) fn panic_here(&mut self, message: String) {
        self.error_here(message);
        self.panic_mode = true;
    }

    pub(crate) fn panicked(&self) -> bool {
        self.panic_mode
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Unquote and unescape a string literal's raw source text.
///
/// The lexer keeps the surrounding quotes; escape handling happens once,
/// here. Unknown escapes keep the escaped character as-is.
pub(crate) fn unescape_string(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
