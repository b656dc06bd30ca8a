//! Variable scope and scoped bindings.
//!
//! A resolved tree can be exposed to nested content under a variable name.
//! [`ScopeFrame`] owns that binding: it saves whatever the name held before,
//! installs the new value and puts the previous state back when dropped, so
//! the restore happens on every exit path including early returns and
//! unwinding.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Binding environment used by the rendering layer.
pub trait VariableScope {
    fn get(&self, name: &str) -> Option<Value>;
    fn set(&mut self, name: &str, value: Value);
    fn unset(&mut self, name: &str);
}

/// Variables held in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableMap {
    variables: IndexMap<String, Value>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableScope for VariableMap {
    fn get(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    fn unset(&mut self, name: &str) {
        self.variables.shift_remove(name);
    }
}

/// A single-name binding that is released when the frame is dropped.
pub struct ScopeFrame<'scope> {
    scope: &'scope mut dyn VariableScope,
    name: String,
    previous: Option<Value>,
}

impl<'scope> ScopeFrame<'scope> {
    /// Binds `value` to `name`, remembering the binding it replaces.
    pub fn bind(scope: &'scope mut dyn VariableScope, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        let previous = scope.get(&name);
        debug!(variable = %name, shadowing = previous.is_some(), "binding scoped variable");
        scope.set(&name, value);
        Self { scope, name, previous }
    }

    /// The scope with the binding in place, for nested content.
    pub fn scope_mut(&mut self) -> &mut dyn VariableScope {
        &mut *self.scope
    }
}

impl fmt::Debug for ScopeFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeFrame")
            .field("name", &self.name)
            .field("previous", &self.previous)
            .finish()
    }
}

impl Drop for ScopeFrame<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => self.scope.set(&self.name, value),
            None => self.scope.unset(&self.name),
        }
        debug!(variable = %self.name, "scoped variable restored");
    }
}
