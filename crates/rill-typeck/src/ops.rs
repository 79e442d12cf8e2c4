//! The operator-result table.
//!
//! A single map keyed on `(operator, left type name, right type name)`
//! answers "what type does this operator produce for this operand
//! pair". The interpreter mirrors the same entries at the value level.

use rustc_hash::FxHashMap;

use rill_common::token::TokenKind;
use rill_parser::ast::ty;
use rill_parser::ast::Type;

pub struct OpTable {
    map: FxHashMap<(TokenKind, String, String), Type>,
}

impl OpTable {
    fn insert(&mut self, op: TokenKind, left: &str, right: &str, result: &str) {
        self.map.insert(
            (op, left.to_string(), right.to_string()),
            Type::base(result),
        );
    }

    /// Register both operand orders at once.
    fn insert_commutative(&mut self, op: TokenKind, a: &str, b: &str, result: &str) {
        self.insert(op, a, b, result);
        self.insert(op, b, a, result);
    }

    pub fn get(&self, op: TokenKind, left: &str, right: &str) -> Option<&Type> {
        self.map
            .get(&(op, left.to_string(), right.to_string()))
    }

    pub fn new() -> Self {
        use TokenKind::*;

        let mut table = OpTable {
            map: FxHashMap::default(),
        };

        // Arithmetic; a mixed int/float pair widens to float.
        for op in [Plus, Minus, Star, Slash] {
            table.insert(op, ty::INT, ty::INT, ty::INT);
            table.insert(op, ty::FLOAT, ty::FLOAT, ty::FLOAT);
            table.insert_commutative(op, ty::INT, ty::FLOAT, ty::FLOAT);
        }
        table.insert(Percent, ty::INT, ty::INT, ty::INT);

        // String concatenation, with implicit int -> string for `+`.
        table.insert(Plus, ty::STRING, ty::STRING, ty::STRING);
        table.insert_commutative(Plus, ty::STRING, ty::INT, ty::STRING);

        // Ordering comparisons over ordered operands.
        for op in [Less, LessEquals, Greater, GreaterEquals] {
            table.insert(op, ty::INT, ty::INT, ty::BOOL);
            table.insert(op, ty::FLOAT, ty::FLOAT, ty::BOOL);
            table.insert_commutative(op, ty::INT, ty::FLOAT, ty::BOOL);
            table.insert(op, ty::STRING, ty::STRING, ty::BOOL);
        }

        // Equality over comparable operands.
        for op in [Equals, NotEquals] {
            table.insert(op, ty::INT, ty::INT, ty::BOOL);
            table.insert(op, ty::FLOAT, ty::FLOAT, ty::BOOL);
            table.insert_commutative(op, ty::INT, ty::FLOAT, ty::BOOL);
            table.insert(op, ty::STRING, ty::STRING, ty::BOOL);
            table.insert(op, ty::BOOL, ty::BOOL, ty::BOOL);
        }

        // Logic.
        table.insert(And, ty::BOOL, ty::BOOL, ty::BOOL);
        table.insert(Or, ty::BOOL, ty::BOOL, ty::BOOL);

        table
    }
}

impl Default for OpTable {
    fn default() -> Self {
        Self::new()
    }
}
