//! Runtime values.

use std::fmt;
use std::rc::Rc;

use rill_parser::ast::ty;
use rill_parser::ast::{FnExpr, Type};

use crate::env::{DeclRef, EnvRef};

/// A first-class function value: the declaration node plus a handle to
/// the environment it closed over. Invocation scopes are children of
/// the captured environment, never of the call site.
#[derive(Debug)]
pub struct Closure {
    pub decl: FnExpr,
    pub env: EnvRef,
}

/// The built-in functions installed in the root scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Println,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Println => "println",
        }
    }
}

/// Any runtime value.
///
/// Aggregates have value semantics: assignment and parameter passing
/// copy. Aliasing only happens through explicit reference bindings,
/// represented by the `Ref` handle to another declaration's cell.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Array(Vec<Value>),
    Struct(StructValue),
    Function(Rc<Closure>),
    Builtin(Builtin),
    EnumType(Rc<EnumValue>),
    /// Shared handle to another declaration; reads and writes pass
    /// through to the referenced cell.
    Ref(DeclRef),
    Unit,
}

#[derive(Debug, Clone)]
pub struct StructValue {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub members: Vec<(String, i64)>,
}

/// Dispatch key for the binary-operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Int,
    Float,
    Bool,
    Str,
    Array,
    Struct,
    Function,
    Builtin,
    EnumType,
    Ref,
    Unit,
}

impl Value {
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::Bool(_) => ValueTag::Bool,
            Value::Str(_) => ValueTag::Str,
            Value::Array(_) => ValueTag::Array,
            Value::Struct(_) => ValueTag::Struct,
            Value::Function(_) => ValueTag::Function,
            Value::Builtin(_) => ValueTag::Builtin,
            Value::EnumType(_) => ValueTag::EnumType,
            Value::Ref(_) => ValueTag::Ref,
            Value::Unit => ValueTag::Unit,
        }
    }

    /// Name used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self.tag() {
            ValueTag::Int => "int",
            ValueTag::Float => "float",
            ValueTag::Bool => "bool",
            ValueTag::Str => "string",
            ValueTag::Array => "array",
            ValueTag::Struct => "struct",
            ValueTag::Function => "function",
            ValueTag::Builtin => "function",
            ValueTag::EnumType => "enum",
            ValueTag::Ref => "reference",
            ValueTag::Unit => "unit",
        }
    }

    /// Runtime counterpart of the `is` expression: does the value's
    /// shape fit the named type?
    pub fn is_type(&self, ty_expr: &Type) -> bool {
        if ty_expr.is(ty::UNION) {
            return ty_expr.args.iter().any(|member| self.is_type(member));
        }
        match self {
            Value::Int(_) => ty_expr.is(ty::INT),
            Value::Float(_) => ty_expr.is(ty::FLOAT),
            Value::Bool(_) => ty_expr.is(ty::BOOL),
            Value::Str(_) => ty_expr.is(ty::STRING),
            Value::Array(_) => ty_expr.is(ty::ARRAY),
            Value::Struct(s) => ty_expr.is(ty::STRUCT) || ty_expr.name == s.name,
            Value::Function(_) | Value::Builtin(_) => ty_expr.is(ty::FUNCTION),
            Value::EnumType(e) => ty_expr.is(ty::ENUM) || ty_expr.name == e.name,
            Value::Ref(_) | Value::Unit => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Value::Struct(s) => {
                write!(f, "{} {{ ", s.name)?;
                for (i, (name, value)) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, " }}")
            }
            Value::Function(_) => write!(f, "<fn>"),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name()),
            Value::EnumType(e) => write!(f, "<enum {}>", e.name),
            Value::Ref(_) => write!(f, "<reference>"),
            Value::Unit => write!(f, "()"),
        }
    }
}
