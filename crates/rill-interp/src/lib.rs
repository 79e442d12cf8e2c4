//! Rill tree-walking interpreter.
//!
//! Evaluation walks the AST with parent-chained environments. Control
//! flow (`return`, `break`, `continue`) travels as an ordinary signal in
//! the statement result, never as a panic: loops intercept break and
//! continue, function invocation intercepts return.
//!
//! The interpreter is the last gate: the type checker has already ruled
//! out most faults, so anything that still goes wrong here (operator
//! table miss, undefined identifier, reference misuse) is fatal and
//! aborts evaluation with a diagnostic at the offending node.

pub mod env;
mod interp;
mod ops;
pub mod value;

pub use interp::interpret;
