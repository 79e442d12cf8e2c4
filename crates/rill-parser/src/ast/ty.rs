//! The recursive type record shared by the parser, checker, and runtime.
//!
//! A single `Type { name, args }` shape covers everything: base types,
//! user-defined names, and the wrapping conventions below.
//!
//! - `reference<T>` / `mutable<T>` are modifier wrappers; `mutable` sits
//!   innermost, `reference` composes on top.
//! - `array<T1, T2, ...>` holds the deduplicated element-type set.
//! - `struct<x<T>, y<U>>` / `dict<...>` carry each property name as the
//!   wrapper name of the corresponding argument.
//! - `union<T1, ..., Tn>` is the type-level sum.
//! - Functions are `function<function_arg<a<T>, ...>, function_return<R>>`.

use std::fmt;

use serde::Serialize;

/// Sentinel name for "no explicit type".
pub const UNSET: &str = "__unset__";

pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const BOOL: &str = "bool";
pub const STRING: &str = "string";
pub const ARRAY: &str = "array";
pub const STRUCT: &str = "struct";
pub const DICT: &str = "dict";
pub const UNION: &str = "union";
pub const ENUM: &str = "enum";
pub const FUNCTION: &str = "function";
pub const FUNCTION_ARG: &str = "function_arg";
pub const FUNCTION_RETURN: &str = "function_return";
pub const REFERENCE: &str = "reference";
pub const MUTABLE: &str = "mutable";
/// Marker type given to the variadic builtins (`print`, `println`).
pub const BUILTIN: &str = "__builtin__";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub name: String,
    pub args: Vec<Type>,
}

impl Type {
    pub fn base(name: impl Into<String>) -> Type {
        Type {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<Type>) -> Type {
        Type {
            name: name.into(),
            args,
        }
    }

    /// A single-argument wrapper, e.g. a property or a modifier.
    pub fn wrap(name: impl Into<String>, inner: Type) -> Type {
        Type {
            name: name.into(),
            args: vec![inner],
        }
    }

    pub fn unset() -> Type {
        Type::base(UNSET)
    }

    pub fn is_unset(&self) -> bool {
        self.name == UNSET
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn mutable(self) -> Type {
        Type::wrap(MUTABLE, self)
    }

    pub fn reference(self) -> Type {
        Type::wrap(REFERENCE, self)
    }

    /// Unwrap one layer of `name`, or return `self` unchanged.
    pub fn strip(&self, name: &str) -> &Type {
        if self.is(name) && self.args.len() == 1 {
            &self.args[0]
        } else {
            self
        }
    }

    /// The bare payload with `reference` and `mutable` wrappers removed.
    pub fn payload(&self) -> &Type {
        self.strip(REFERENCE).strip(MUTABLE)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_compose_reference_over_mutable() {
        let ty = Type::base(INT).mutable().reference();
        assert_eq!(ty.to_string(), "reference<mutable<int>>");
        assert_eq!(ty.payload(), &Type::base(INT));
    }

    #[test]
    fn strip_is_a_no_op_on_other_names() {
        let ty = Type::base(FLOAT);
        assert_eq!(ty.strip(MUTABLE), &ty);
    }

    #[test]
    fn display_nests_arguments() {
        let ty = Type::with_args(ARRAY, vec![Type::base(INT), Type::base(FLOAT)]);
        assert_eq!(ty.to_string(), "array<int, float>");
    }

    #[test]
    fn equality_is_structural() {
        let a = Type::wrap(UNION, Type::base(INT));
        let b = Type::wrap(UNION, Type::base(INT));
        assert_eq!(a, b);
        assert_ne!(a, Type::wrap(UNION, Type::base(FLOAT)));
    }
}
