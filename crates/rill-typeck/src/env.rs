//! Scoped symbol table for the checker.
//!
//! Scopes chain to their parent; the root scope additionally owns the
//! type registry populated by `struct`, `interface`, and `enum`
//! statements. Declarations are shared cells so a later pass (function
//! return inference) can refine a type in place.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use rill_parser::ast::Type;

pub(crate) type EnvRef = Rc<RefCell<TypeEnv>>;
pub(crate) type DeclRef = Rc<RefCell<TypeDecl>>;

/// A checked binding. `ty` carries the `mutable<...>` wrapper iff the
/// binding is mutable; `reference` marks reference parameters.
#[derive(Debug)]
pub(crate) struct TypeDecl {
    pub name: String,
    pub mutable: bool,
    pub reference: bool,
    pub ty: Type,
}

#[derive(Debug, Default)]
pub(crate) struct TypeEnv {
    declarations: FxHashMap<String, DeclRef>,
    parent: Option<EnvRef>,
    /// Registered nominal types; only populated on the root scope.
    types: FxHashMap<String, Type>,
}

pub(crate) fn root_env() -> EnvRef {
    Rc::new(RefCell::new(TypeEnv::default()))
}

pub(crate) fn child_env(parent: &EnvRef) -> EnvRef {
    Rc::new(RefCell::new(TypeEnv {
        parent: Some(Rc::clone(parent)),
        ..TypeEnv::default()
    }))
}

/// Walk up to the scope that owns the type registry.
fn root_of(env: &EnvRef) -> EnvRef {
    let parent = env.borrow().parent.clone();
    match parent {
        Some(p) => root_of(&p),
        None => Rc::clone(env),
    }
}

/// Resolve an identifier through the scope chain.
pub(crate) fn get(env: &EnvRef, name: &str) -> Option<DeclRef> {
    if let Some(decl) = env.borrow().declarations.get(name) {
        return Some(Rc::clone(decl));
    }
    let parent = env.borrow().parent.clone();
    parent.and_then(|p| get(&p, name))
}

/// Install a new declaration in this scope. Fails when the identifier
/// already exists here (shadowing an outer scope is fine).
pub(crate) fn declare(env: &EnvRef, decl: TypeDecl) -> Result<DeclRef, ()> {
    let mut scope = env.borrow_mut();
    if scope.declarations.contains_key(&decl.name) {
        return Err(());
    }
    let name = decl.name.clone();
    let cell = Rc::new(RefCell::new(decl));
    scope.declarations.insert(name, Rc::clone(&cell));
    Ok(cell)
}

/// Register a nominal type on the root scope. The registry is
/// append-only; a second registration under the same name fails.
pub(crate) fn register_type(env: &EnvRef, name: &str, ty: Type) -> Result<(), ()> {
    let root = root_of(env);
    let mut scope = root.borrow_mut();
    if scope.types.contains_key(name) {
        return Err(());
    }
    scope.types.insert(name.to_string(), ty);
    Ok(())
}

pub(crate) fn lookup_type(env: &EnvRef, name: &str) -> Option<Type> {
    let root = root_of(env);
    let ty = root.borrow().types.get(name).cloned();
    ty
}
