//! The ordered rule table driving tokenization.
//!
//! Order is load-bearing: the first rule that matches at the current
//! offset wins, so every multi-character operator appears before the
//! operators that prefix it.

use regex::Regex;

use rill_common::token::TokenKind;

/// What to do with a rule's match.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleAction {
    /// Advance without emitting (whitespace, comments).
    Skip,
    /// Emit a token of the given kind carrying the matched text.
    Emit(TokenKind),
    /// Identifier-shaped match: emit keyword or identifier after the
    /// reserved-word lookup.
    Word,
}

pub(crate) struct Rule {
    pub pattern: Regex,
    pub action: RuleAction,
}

fn rule(pattern: &str, action: RuleAction) -> Rule {
    // Patterns are anchored so a match can only start at the current offset.
    let anchored = format!(r"\A(?:{pattern})");
    Rule {
        pattern: Regex::new(&anchored).unwrap(),
        action,
    }
}

/// Build the rule table. Called once per tokenization pass.
pub(crate) fn rules() -> Vec<Rule> {
    use RuleAction::{Emit, Skip, Word};
    use TokenKind::*;

    vec![
        rule(r"\s+", Skip),
        rule(r"//[^\n]*", Skip),
        rule(r"(?s)/\*.*?\*/", Skip),
        rule(r#""(?:[^"\\]|\\.)*""#, Emit(Str)),
        rule(r"[0-9]+(\.[0-9]+)?", Emit(Number)),
        rule(r"[A-Za-z_][A-Za-z0-9_]*", Word),
        rule(r"\[", Emit(OpenBracket)),
        rule(r"\]", Emit(CloseBracket)),
        rule(r"\{", Emit(OpenCurly)),
        rule(r"\}", Emit(CloseCurly)),
        rule(r"\(", Emit(OpenParen)),
        rule(r"\)", Emit(CloseParen)),
        rule(r"==", Emit(Equals)),
        rule(r"!=", Emit(NotEquals)),
        rule(r"=", Emit(Assign)),
        rule(r"!", Emit(Not)),
        rule(r"<-", Emit(ArrowLeft)),
        rule(r"->", Emit(ArrowRight)),
        rule(r"<=", Emit(LessEquals)),
        rule(r"<", Emit(Less)),
        rule(r">=", Emit(GreaterEquals)),
        rule(r">", Emit(Greater)),
        rule(r"\|\|", Emit(Or)),
        rule(r"&&", Emit(And)),
        rule(r"\.\.\.", Emit(Spread)),
        rule(r"\.", Emit(Dot)),
        rule(r";", Emit(Semicolon)),
        rule(r":", Emit(Colon)),
        rule(r"\?", Emit(Question)),
        rule(r",", Emit(Comma)),
        rule(r"\+\+", Emit(PlusPlus)),
        rule(r"\+=", Emit(PlusAssign)),
        rule(r"--", Emit(MinusMinus)),
        rule(r"-=", Emit(MinusAssign)),
        rule(r"\+", Emit(Plus)),
        rule(r"-", Emit(Minus)),
        rule(r"/", Emit(Slash)),
        rule(r"\*", Emit(Star)),
        rule(r"%", Emit(Percent)),
    ]
}
