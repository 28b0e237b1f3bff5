//! Evaluation environment
//!
//! Variable and last-value state persisting across evaluations. The
//! environment is an explicitly passed context object owned by the
//! evaluator; nothing here is global.

use indexmap::IndexMap;

use super::value::Value;
use super::error::{ScriptError, ScriptResult};

/// Name that resolves to the last successfully evaluated value
pub const LAST_VALUE_NAME: &str = "_";

/// Persistent evaluation environment
#[derive(Debug, Default)]
pub struct Environment {
    /// Variable bindings, in definition order
    bindings: IndexMap<String, Value>,
    /// Most recent successfully evaluated result
    last: Option<Value>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or overwrite a binding (`var name = ...`)
    pub fn define(
        &mut self,
        name: String,
        value: Value,
    ) {
        self.bindings.insert(name, value);
    }

    /// Assign to an existing binding (`name = ...`)
    pub fn assign(
        &mut self,
        name: &str,
        value: Value,
    ) -> ScriptResult<()> {
        match self.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ScriptError::UndefinedVariable(name.to_string())),
        }
    }

    /// Look up a name; `_` reads the last value
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        if name == LAST_VALUE_NAME {
            return self.last.as_ref();
        }
        self.bindings.get(name)
    }

    /// Record the result of a successful evaluation
    pub fn set_last(
        &mut self,
        value: Value,
    ) {
        self.last = Some(value);
    }

    /// The last-value slot
    pub fn last(&self) -> Option<&Value> {
        self.last.as_ref()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the environment holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop all bindings and the last value
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.last = None;
    }
}
