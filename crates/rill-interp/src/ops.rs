//! Value-level binary operator dispatch.
//!
//! A table keyed on `(operator, left tag, right tag)` mirrors the type
//! checker's operator-result table, including the implicit widenings
//! (int -> float for arithmetic and comparisons, int -> string for `+`).
//! The numeric entry points are registered under every tag combination
//! they widen over, so lookup stays a single map probe.

use rustc_hash::FxHashMap;

use rill_common::token::TokenKind;

use crate::value::{Value, ValueTag};

pub(crate) type BinFn = fn(&Value, &Value) -> Result<Value, String>;

pub(crate) struct OpTable {
    map: FxHashMap<(TokenKind, ValueTag, ValueTag), BinFn>,
}

const NUMERIC_PAIRS: [(ValueTag, ValueTag); 4] = [
    (ValueTag::Int, ValueTag::Int),
    (ValueTag::Int, ValueTag::Float),
    (ValueTag::Float, ValueTag::Int),
    (ValueTag::Float, ValueTag::Float),
];

impl OpTable {
    fn insert(&mut self, op: TokenKind, left: ValueTag, right: ValueTag, f: BinFn) {
        self.map.insert((op, left, right), f);
    }

    /// Register a widened numeric operation under all four tag pairs.
    fn insert_numeric(&mut self, op: TokenKind, f: BinFn) {
        for (left, right) in NUMERIC_PAIRS {
            self.insert(op, left, right, f);
        }
    }

    pub(crate) fn get(&self, op: TokenKind, left: ValueTag, right: ValueTag) -> Option<BinFn> {
        self.map.get(&(op, left, right)).copied()
    }

    pub(crate) fn execute(
        &self,
        op: TokenKind,
        left: &Value,
        right: &Value,
    ) -> Result<Value, String> {
        match self.get(op, left.tag(), right.tag()) {
            Some(f) => f(left, right),
            None => Err(format!(
                "no operation for {} and {}",
                left.type_name(),
                right.type_name()
            )),
        }
    }

    pub(crate) fn new() -> Self {
        use TokenKind::*;
        use ValueTag::{Bool, Int, Str};

        let mut table = OpTable {
            map: FxHashMap::default(),
        };

        table.insert_numeric(Plus, num_add);
        table.insert_numeric(Minus, num_sub);
        table.insert_numeric(Star, num_mul);
        table.insert_numeric(Slash, num_div);
        table.insert(Percent, Int, Int, int_mod);

        table.insert(Plus, Str, Str, str_concat);
        table.insert(Plus, Str, Int, str_concat);
        table.insert(Plus, Int, Str, str_concat);

        table.insert_numeric(Less, num_lt);
        table.insert_numeric(LessEquals, num_le);
        table.insert_numeric(Greater, num_gt);
        table.insert_numeric(GreaterEquals, num_ge);
        table.insert(Less, Str, Str, str_lt);
        table.insert(LessEquals, Str, Str, str_le);
        table.insert(Greater, Str, Str, str_gt);
        table.insert(GreaterEquals, Str, Str, str_ge);

        table.insert_numeric(Equals, num_eq);
        table.insert_numeric(NotEquals, num_ne);
        table.insert(Equals, Str, Str, str_eq);
        table.insert(NotEquals, Str, Str, str_ne);
        table.insert(Equals, Bool, Bool, bool_eq);
        table.insert(NotEquals, Bool, Bool, bool_ne);

        table.insert(And, Bool, Bool, bool_and);
        table.insert(Or, Bool, Bool, bool_or);

        table
    }
}

// ── Numeric helpers ────────────────────────────────────────────────────

/// Both operands as ints, when no widening is involved.
fn as_ints(l: &Value, r: &Value) -> Option<(i64, i64)> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => None,
    }
}

/// Widen either operand to float.
fn as_floats(l: &Value, r: &Value) -> Result<(f64, f64), String> {
    let widen = |v: &Value| match v {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        other => Err(format!("expected a number, got {}", other.type_name())),
    };
    Ok((widen(l)?, widen(r)?))
}

fn num_add(l: &Value, r: &Value) -> Result<Value, String> {
    if let Some((a, b)) = as_ints(l, r) {
        return Ok(Value::Int(a.wrapping_add(b)));
    }
    let (a, b) = as_floats(l, r)?;
    Ok(Value::Float(a + b))
}

fn num_sub(l: &Value, r: &Value) -> Result<Value, String> {
    if let Some((a, b)) = as_ints(l, r) {
        return Ok(Value::Int(a.wrapping_sub(b)));
    }
    let (a, b) = as_floats(l, r)?;
    Ok(Value::Float(a - b))
}

fn num_mul(l: &Value, r: &Value) -> Result<Value, String> {
    if let Some((a, b)) = as_ints(l, r) {
        return Ok(Value::Int(a.wrapping_mul(b)));
    }
    let (a, b) = as_floats(l, r)?;
    Ok(Value::Float(a * b))
}

fn num_div(l: &Value, r: &Value) -> Result<Value, String> {
    if let Some((a, b)) = as_ints(l, r) {
        if b == 0 {
            return Err("division by zero".to_string());
        }
        return Ok(Value::Int(a.wrapping_div(b)));
    }
    let (a, b) = as_floats(l, r)?;
    Ok(Value::Float(a / b))
}

fn int_mod(l: &Value, r: &Value) -> Result<Value, String> {
    match as_ints(l, r) {
        Some((_, 0)) => Err("division by zero".to_string()),
        Some((a, b)) => Ok(Value::Int(a.wrapping_rem(b))),
        None => Err("modulo expects ints".to_string()),
    }
}

fn num_cmp(l: &Value, r: &Value) -> Result<std::cmp::Ordering, String> {
    if let Some((a, b)) = as_ints(l, r) {
        return Ok(a.cmp(&b));
    }
    let (a, b) = as_floats(l, r)?;
    a.partial_cmp(&b)
        .ok_or_else(|| "comparison with NaN".to_string())
}

fn num_lt(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)?.is_lt()))
}

fn num_le(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)?.is_le()))
}

fn num_gt(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)?.is_gt()))
}

fn num_ge(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)?.is_ge()))
}

fn num_eq(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)? == std::cmp::Ordering::Equal))
}

fn num_ne(l: &Value, r: &Value) -> Result<Value, String> {
    Ok(Value::Bool(num_cmp(l, r)? != std::cmp::Ordering::Equal))
}

// ── Strings ────────────────────────────────────────────────────────────

/// String concatenation with implicit int -> string conversion.
fn str_concat(l: &Value, r: &Value) -> Result<Value, String> {
    let text = |v: &Value| match v {
        Value::Str(s) => Ok(s.clone()),
        Value::Int(n) => Ok(n.to_string()),
        other => Err(format!("cannot concatenate {}", other.type_name())),
    };
    Ok(Value::Str(text(l)? + &text(r)?))
}

fn str_pair(l: &Value, r: &Value) -> Result<(String, String), String> {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok((a.clone(), b.clone())),
        _ => Err("expected strings".to_string()),
    }
}

fn str_lt(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a < b))
}

fn str_le(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a <= b))
}

fn str_gt(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a > b))
}

fn str_ge(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a >= b))
}

fn str_eq(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a == b))
}

fn str_ne(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = str_pair(l, r)?;
    Ok(Value::Bool(a != b))
}

// ── Bools ──────────────────────────────────────────────────────────────

fn bool_pair(l: &Value, r: &Value) -> Result<(bool, bool), String> {
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => Ok((*a, *b)),
        _ => Err("expected bools".to_string()),
    }
}

fn bool_eq(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = bool_pair(l, r)?;
    Ok(Value::Bool(a == b))
}

fn bool_ne(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = bool_pair(l, r)?;
    Ok(Value::Bool(a != b))
}

fn bool_and(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = bool_pair(l, r)?;
    Ok(Value::Bool(a && b))
}

fn bool_or(l: &Value, r: &Value) -> Result<Value, String> {
    let (a, b) = bool_pair(l, r)?;
    Ok(Value::Bool(a || b))
}
