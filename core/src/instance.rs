//! Attribute instances.
//!
//! An instance is a concrete, immutable value of one kind: the bindings a
//! declaration site (or another kind) configured for that kind's properties.

use crate::{KindId, Value};
use indexmap::IndexMap;

/// A concrete value of one kind, carrying its property bindings in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    kind: KindId,
    values: IndexMap<String, Value>,
}

impl Instance {
    pub fn new(kind: KindId) -> Self {
        Self {
            kind,
            values: IndexMap::new(),
        }
    }

    /// Bind a property value, replacing any earlier binding of the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// The kind this instance is a value of.
    pub fn kind(&self) -> KindId {
        self.kind
    }

    /// Get the value bound to a property.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if a property is bound.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All bindings, in binding order.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}
