//! Structural matching: deep equality with registered carve-outs.
//!
//! `matches(expected, input)` is deep structural equality except:
//!
//! - an unset side always matches (unknowns never cascade);
//! - a `union<...>` on the expected side matches if any member does;
//! - a `union<...>` on the input side (an inferred if-branch type)
//!   matches if every member does;
//! - special cases registered by `(expected name, input name)` -- the
//!   one seeded entry is dict-vs-struct property subsumption.

use rustc_hash::FxHashMap;

use rill_parser::ast::ty;
use rill_parser::ast::Type;

type MatchFn = fn(&MatchTable, &Type, &Type) -> bool;

pub struct MatchTable {
    map: FxHashMap<(String, String), MatchFn>,
}

impl MatchTable {
    pub fn new() -> Self {
        let mut table = MatchTable {
            map: FxHashMap::default(),
        };
        table.register(ty::DICT, ty::STRUCT, match_dict_struct);
        table
    }

    fn register(&mut self, expected: &str, input: &str, f: MatchFn) {
        self.map
            .insert((expected.to_string(), input.to_string()), f);
    }

    pub fn matches(&self, expected: &Type, input: &Type) -> bool {
        if expected.is_unset() || input.is_unset() {
            return true;
        }

        if expected.is(ty::UNION) && !input.is(ty::UNION) {
            return expected.args.iter().any(|member| self.matches(member, input));
        }

        if input.is(ty::UNION) && !expected.is(ty::UNION) {
            return input.args.iter().all(|member| self.matches(expected, member));
        }

        if let Some(f) = self
            .map
            .get(&(expected.name.clone(), input.name.clone()))
        {
            return f(self, expected, input);
        }

        expected == input
    }
}

impl Default for MatchTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Every dict property must have a name-matching struct property whose
/// type matches; extra struct properties are fine, absences are not.
fn match_dict_struct(table: &MatchTable, dict: &Type, structure: &Type) -> bool {
    dict.args.iter().all(|dict_prop| {
        structure
            .args
            .iter()
            .any(|struct_prop| dict_prop.name == struct_prop.name && table.matches(dict_prop, struct_prop))
    })
}
