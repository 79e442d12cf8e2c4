//! Runtime environments.
//!
//! Same shape as the checker's symbol table: a map of shared declaration
//! cells plus a parent pointer. Cells are `Rc<RefCell<...>>` so closure
//! captures keep their defining scope alive, and reference bindings can
//! hand the same cell to an alias in another scope.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

pub type EnvRef = Rc<RefCell<Env>>;
pub type DeclRef = Rc<RefCell<Declaration>>;

/// A runtime binding. Mutability is fixed at creation; only `value`
/// changes afterwards.
#[derive(Debug)]
pub struct Declaration {
    pub name: String,
    pub mutable: bool,
    pub value: Value,
}

#[derive(Debug, Default)]
pub struct Env {
    declarations: FxHashMap<String, DeclRef>,
    parent: Option<EnvRef>,
}

pub fn root_env() -> EnvRef {
    Rc::new(RefCell::new(Env::default()))
}

pub fn child_env(parent: &EnvRef) -> EnvRef {
    Rc::new(RefCell::new(Env {
        parent: Some(Rc::clone(parent)),
        ..Env::default()
    }))
}

pub fn get(env: &EnvRef, name: &str) -> Option<DeclRef> {
    if let Some(decl) = env.borrow().declarations.get(name) {
        return Some(Rc::clone(decl));
    }
    let parent = env.borrow().parent.clone();
    parent.and_then(|p| get(&p, name))
}

/// Install a fresh declaration. Fails if the identifier already exists
/// in this scope.
pub fn declare(env: &EnvRef, decl: Declaration) -> Result<DeclRef, ()> {
    let mut scope = env.borrow_mut();
    if scope.declarations.contains_key(&decl.name) {
        return Err(());
    }
    let name = decl.name.clone();
    let cell = Rc::new(RefCell::new(decl));
    scope.declarations.insert(name, Rc::clone(&cell));
    Ok(cell)
}
