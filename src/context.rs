use crate::ast::PropertyPath;
use crate::value::Value;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Name that binds the root model in the outermost scope.
pub const MODEL: &str = "model";

type Scope = HashMap<String, Value>;

/// Stack of name bindings used while rendering one template.
///
/// The root scope holds `model` and is never popped. Loop iterations push a
/// scope through [`Context::push`], which hands back a guard that pops it
/// again on every exit path.
#[derive(Debug)]
pub struct Context {
    scopes: Vec<Scope>,
}

impl Context {
    pub fn new(model: Value) -> Self {
        let mut root = Scope::new();
        root.insert(MODEL.to_string(), model);
        Self { scopes: vec![root] }
    }

    /// Enter a new, empty scope. It lives as long as the returned guard.
    pub fn push(&mut self) -> ScopeGuard<'_> {
        self.scopes.push(Scope::new());
        ScopeGuard { context: self }
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// First binding of `name`, searching innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Resolve a dotted path. Any missing binding or unsupported field access
    /// along the way yields `None`.
    pub fn resolve(&self, path: &PropertyPath) -> Option<Value> {
        let mut current = self.lookup(path.head())?.clone();
        for field in path.tail() {
            current = current.get_field(field)?;
        }
        Some(current)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// A pushed scope. Dereferences to the [`Context`] and pops the scope when
/// dropped.
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    context: &'a mut Context,
}

impl ScopeGuard<'_> {
    /// Leave the scope now instead of at end of the enclosing block.
    pub fn pop(self) {}
}

impl Deref for ScopeGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.context
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        // The root scope is pushed by `new`, not by a guard.
        if self.context.scopes.len() > 1 {
            self.context.scopes.pop();
        }
    }
}
