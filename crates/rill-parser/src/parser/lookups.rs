//! Handler tables for the Pratt engine.
//!
//! Three tables drive statement and expression parsing (statement
//! handlers, prefix/nud handlers, infix/led handlers with binding
//! powers), and a symmetric pair drives type expressions. Registration
//! happens exactly once, when the parser is constructed; dispatch never
//! mutates the tables.

use rustc_hash::FxHashMap;

use rill_common::token::TokenKind;

use crate::ast::{Expr, Stmt, Type};
use crate::parser::{expr, stmt, types, Parser};

/// The precedence ladder, weakest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum BindingPower {
    Default,
    Comma,
    Assignment,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Member,
    Primary,
}

pub(crate) type StmtHandler = fn(&mut Parser) -> Stmt;
pub(crate) type NudHandler = fn(&mut Parser) -> Expr;
pub(crate) type LedHandler = fn(&mut Parser, Expr, BindingPower) -> Expr;
pub(crate) type TypeNudHandler = fn(&mut Parser) -> Type;
pub(crate) type TypeLedHandler = fn(&mut Parser, Type, BindingPower) -> Type;

pub(crate) struct Lookups {
    pub stmt: FxHashMap<TokenKind, StmtHandler>,
    pub nud: FxHashMap<TokenKind, NudHandler>,
    pub led: FxHashMap<TokenKind, LedHandler>,
    pub bp: FxHashMap<TokenKind, BindingPower>,
    pub type_nud: FxHashMap<TokenKind, TypeNudHandler>,
    pub type_led: FxHashMap<TokenKind, TypeLedHandler>,
    pub type_bp: FxHashMap<TokenKind, BindingPower>,
}

impl Lookups {
    fn led(&mut self, kind: TokenKind, bp: BindingPower, handler: LedHandler) {
        self.bp.insert(kind, bp);
        self.led.insert(kind, handler);
    }

    fn nud(&mut self, kind: TokenKind, handler: NudHandler) {
        self.nud.insert(kind, handler);
    }

    fn stmt(&mut self, kind: TokenKind, handler: StmtHandler) {
        self.stmt.insert(kind, handler);
    }

    fn type_led(&mut self, kind: TokenKind, bp: BindingPower, handler: TypeLedHandler) {
        self.type_bp.insert(kind, bp);
        self.type_led.insert(kind, handler);
    }

    fn type_nud(&mut self, kind: TokenKind, handler: TypeNudHandler) {
        self.type_nud.insert(kind, handler);
    }

    pub(crate) fn new() -> Self {
        use BindingPower::*;
        use TokenKind::*;

        let mut lu = Lookups {
            stmt: FxHashMap::default(),
            nud: FxHashMap::default(),
            led: FxHashMap::default(),
            bp: FxHashMap::default(),
            type_nud: FxHashMap::default(),
            type_led: FxHashMap::default(),
            type_bp: FxHashMap::default(),
        };

        // ── Expression infix ───────────────────────────────────────────
        lu.led(And, Logical, expr::parse_binary_expr);
        lu.led(Or, Logical, expr::parse_binary_expr);

        lu.led(Less, Relational, expr::parse_binary_expr);
        lu.led(LessEquals, Relational, expr::parse_binary_expr);
        lu.led(Greater, Relational, expr::parse_binary_expr);
        lu.led(GreaterEquals, Relational, expr::parse_binary_expr);
        lu.led(Equals, Relational, expr::parse_binary_expr);
        lu.led(NotEquals, Relational, expr::parse_binary_expr);
        lu.led(Is, Relational, expr::parse_is_expr);

        lu.led(Plus, Additive, expr::parse_binary_expr);
        lu.led(Minus, Additive, expr::parse_binary_expr);
        lu.led(Star, Multiplicative, expr::parse_binary_expr);
        lu.led(Slash, Multiplicative, expr::parse_binary_expr);
        lu.led(Percent, Multiplicative, expr::parse_binary_expr);

        lu.led(Dot, Primary, expr::parse_member_expr);

        lu.led(Assign, Assignment, expr::parse_assignment_expr);
        lu.led(PlusAssign, Assignment, expr::parse_assignment_expr);
        lu.led(MinusAssign, Assignment, expr::parse_assignment_expr);
        lu.led(PlusPlus, Assignment, expr::parse_postfix_expr);
        lu.led(MinusMinus, Assignment, expr::parse_postfix_expr);

        lu.led(OpenParen, Call, expr::parse_call_expr);
        lu.led(OpenCurly, Call, expr::parse_struct_literal_expr);
        lu.led(OpenBracket, Call, expr::parse_index_expr);

        // ── Expression prefix ──────────────────────────────────────────
        lu.nud(Number, expr::parse_number_expr);
        lu.nud(Str, expr::parse_string_expr);
        lu.nud(Identifier, expr::parse_symbol_expr);
        lu.nud(True, expr::parse_bool_expr);
        lu.nud(False, expr::parse_bool_expr);
        lu.nud(Minus, expr::parse_prefix_expr);
        lu.nud(Not, expr::parse_prefix_expr);
        lu.nud(Spread, expr::parse_reference_expr);
        lu.nud(Star, expr::parse_deref_expr);
        lu.nud(OpenParen, expr::parse_grouping_expr);
        lu.nud(OpenBracket, expr::parse_array_expr);
        lu.nud(Fn, expr::parse_fn_expr);
        lu.nud(Less, expr::parse_fn_expr);

        // ── Statements ─────────────────────────────────────────────────
        lu.stmt(Let, stmt::parse_declaration_stmt);
        lu.stmt(Struct, stmt::parse_struct_stmt);
        lu.stmt(Interface, stmt::parse_interface_stmt);
        lu.stmt(Enum, stmt::parse_enum_stmt);
        lu.stmt(Fn, stmt::parse_fn_stmt);
        lu.stmt(If, stmt::parse_if_stmt);
        lu.stmt(While, stmt::parse_while_stmt);
        lu.stmt(For, stmt::parse_for_stmt);
        lu.stmt(Return, stmt::parse_return_stmt);
        lu.stmt(Continue, stmt::parse_continue_stmt);
        lu.stmt(Break, stmt::parse_break_stmt);
        lu.stmt(Import, stmt::parse_import_stmt);

        // ── Type expressions ───────────────────────────────────────────
        lu.type_nud(Identifier, types::parse_symbol_type);
        lu.type_nud(Star, types::parse_reference_type);
        lu.type_nud(OpenParen, types::parse_fn_type);
        lu.type_led(Less, Call, types::parse_generic_type);
        lu.type_led(Is, Logical, types::parse_union_type);

        lu
    }
}
