//! Rill lexer -- regex-driven tokenizer for the Rill programming language.
//!
//! Tokenization walks an ordered rule table. At each position the first
//! rule whose pattern matches at the current offset fires; ties between
//! overlapping patterns are decided by rule order, not match length, so
//! multi-character operators are listed before their single-character
//! prefixes (`==` before `=`, `...` before `.`).
//!
//! The lexer never panics. An unrecognized prefix records a diagnostic
//! and force-exits the loop; callers inspect the diagnostics list before
//! handing tokens to the parser.

mod rules;

use rill_common::diagnostic::Diagnostic;
use rill_common::span::Span;
use rill_common::token::{keyword_from_str, Token, TokenKind};

use rules::{Rule, RuleAction};

/// Everything a tokenization pass produces.
#[derive(Debug)]
pub struct LexOutput {
    /// Tokens in source order, always terminated by `Eof`.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Tokenize a whole source string.
///
/// This is the only entry point; the lexer has no incremental mode.
pub fn tokenize(source: &str) -> LexOutput {
    Lexer::new(source).run()
}

struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    force_exit: bool,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            force_exit: false,
        }
    }

    fn run(mut self) -> LexOutput {
        let rules = rules::rules();

        while !self.at_eof() && !self.force_exit {
            match self.next_match(&rules) {
                Some((action, len)) => self.apply(action, len),
                None => {
                    let rest = self.remainder();
                    let bad = rest.chars().next().map(String::from).unwrap_or_default();
                    self.diagnostics.push(Diagnostic::with_literal(
                        format!("unrecognized token at `{}`", truncate(rest, 12)),
                        Span::point(self.pos as u32),
                        bad,
                    ));
                    self.force_exit = true;
                }
            }
        }

        let end = Span::point(self.pos as u32);
        self.tokens.push(Token::new(TokenKind::Eof, "", end));

        LexOutput {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// First rule matching at the current offset, with its match length.
    fn next_match(&self, rules: &[Rule]) -> Option<(RuleAction, usize)> {
        let rest = self.remainder();
        for rule in rules {
            if let Some(m) = rule.pattern.find(rest) {
                return Some((rule.action, m.end()));
            }
        }
        None
    }

    fn apply(&mut self, action: RuleAction, len: usize) {
        let start = self.pos as u32;
        let text = &self.remainder()[..len];
        let span = Span::new(start, start + len as u32);

        match action {
            RuleAction::Skip => {}
            RuleAction::Emit(kind) => self.push(kind, text, span),
            RuleAction::Word => {
                let kind = keyword_from_str(text).unwrap_or(TokenKind::Identifier);
                self.push(kind, text, span);
            }
        }

        self.pos += len;
    }

    fn push(&mut self, kind: TokenKind, text: &str, span: Span) {
        self.tokens.push(Token::new(kind, text, span));
    }

    fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn double_equals_is_one_token() {
        assert_eq!(kinds("=="), vec![TokenKind::Equals, TokenKind::Eof]);
        assert_eq!(
            kinds("= ="),
            vec![TokenKind::Assign, TokenKind::Assign, TokenKind::Eof]
        );
    }

    #[test]
    fn spread_wins_over_dot() {
        assert_eq!(
            kinds("...x"),
            vec![TokenKind::Spread, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            kinds("..x"),
            vec![
                TokenKind::Dot,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comments_emit_nothing() {
        assert_eq!(kinds("// a comment\n"), vec![TokenKind::Eof]);
        assert_eq!(kinds("/* block\ncomment */"), vec![TokenKind::Eof]);
        assert_eq!(
            kinds("1 /* skip */ 2"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn string_literal_keeps_quotes() {
        let out = tokenize(r#""hi \"there\"""#);
        assert!(out.ok());
        assert_eq!(out.tokens[0].kind, TokenKind::Str);
        assert_eq!(out.tokens[0].literal, r#""hi \"there\"""#);
    }

    #[test]
    fn number_split_is_deferred() {
        let out = tokenize("3.14 42");
        assert_eq!(out.tokens[0].literal, "3.14");
        assert_eq!(out.tokens[1].literal, "42");
        assert!(out.tokens[..2].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn keywords_upgrade_identifiers() {
        assert_eq!(
            kinds("let mutate mut"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Mut,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unrecognized_prefix_halts_with_one_diagnostic() {
        let out = tokenize("let x = 1; @ let y = 2;");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].span.start, 11);
        assert_eq!(out.diagnostics[0].literal.as_deref(), Some("@"));
        // Tokenization stopped: nothing after the bad prefix, Eof closes the stream.
        assert_eq!(out.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(out.tokens.iter().all(|t| t.literal != "y"));
    }

    #[test]
    fn punctuation_roundtrip() {
        let source = "([{}]);,:.?->x<-y";
        let out = tokenize(source);
        assert!(out.ok());
        let joined: String = out.tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(joined, source);
    }
}
