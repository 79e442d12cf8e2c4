use std::fmt;

use serde::Serialize;

use crate::span::{LineIndex, Span};

/// One recorded error from any pipeline stage.
///
/// Stages append these to their own list and keep going where that makes
/// sense (the parser and checker continue, the lexer and interpreter
/// halt). Nothing in the core ever prints or panics on an error; turning
/// a diagnostic into terminal output is the CLI's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    /// Offending token text, when one exists.
    pub literal: Option<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            literal: None,
        }
    }

    pub fn with_literal(message: impl Into<String>, span: Span, literal: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            literal: Some(literal.into()),
        }
    }

    /// `[row:col]: message`, the canonical human-readable form.
    pub fn render(&self, lines: &LineIndex) -> String {
        let (row, col) = lines.row_col(self.span.start);
        format!("[{row}:{col}]: {}", self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_uses_row_and_col() {
        let source = "let x = 1;\nx = 2;\n";
        let lines = LineIndex::new(source);
        let diag = Diagnostic::new("x is not mutable", Span::new(11, 12));
        assert_eq!(diag.render(&lines), "[2:1]: x is not mutable");
    }

    #[test]
    fn literal_is_optional() {
        let diag = Diagnostic::with_literal("unexpected token", Span::new(0, 1), "@");
        assert_eq!(diag.literal.as_deref(), Some("@"));
        assert_eq!(diag.to_string(), "unexpected token");
    }
}
