//! Kind definition types.

use indexmap::IndexMap;
use std::sync::Arc;
use strata_core::{Instance, KindId, PropertyDecl, Value, ValueType};

/// Property definition within a kind, referring to other kinds by name.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Default value if an instance does not bind one.
    pub default: Option<Value>,
    /// Number of arguments. Anything but zero is an operation, not a property.
    pub arity: usize,
    /// Override target as (owner kind name, property name).
    pub reference: Option<(String, String)>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default: None,
            arity: 0,
            reference: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Mark this property as overriding `owner`'s property `name`.
    /// An empty `name` refers to the owner's property of the same name.
    pub fn references(mut self, owner: impl Into<String>, name: impl Into<String>) -> Self {
        self.reference = Some((owner.into(), name.into()));
        self
    }
}

/// An instance to be attached, referring to its kind by name.
#[derive(Debug, Clone)]
pub struct InstanceDef {
    /// Kind name.
    pub kind_name: String,
    /// Explicit bindings; unbound properties take their defaults.
    pub values: IndexMap<String, Value>,
}

impl InstanceDef {
    pub fn of(kind_name: impl Into<String>) -> Self {
        Self {
            kind_name: kind_name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

/// Resolved kind definition.
#[derive(Debug, Clone)]
pub struct KindDef {
    /// Unique identifier.
    pub id: KindId,
    /// Kind name.
    pub name: String,
    /// Whether this kind may be composed into other kinds.
    pub meta: bool,
    /// Property declarations, in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Instances attached to this kind, in declaration order.
    pub attached: Vec<Arc<Instance>>,
}

impl KindDef {
    /// Get a property declaration by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Check if this kind declares a property.
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Get all property names.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Kinds of the directly attached instances.
    pub fn attached_kinds(&self) -> impl Iterator<Item = KindId> + '_ {
        self.attached.iter().map(|i| i.kind())
    }
}
