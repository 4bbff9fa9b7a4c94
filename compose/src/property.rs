//! Composed properties.

use crate::{Accessor, AccessorFault};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use strata_core::{Instance, KindId, Value, ValueType};

/// A named, typed property owned by one kind.
///
/// Identity is `(owner, name)`. A property may reference the property of a
/// meta-kind that it overrides; the reference is resolved when the owner's
/// descriptor is composed and points into the meta-kind's descriptor.
#[derive(Debug, Clone)]
pub struct Property {
    owner: KindId,
    name: String,
    value_type: ValueType,
    default: Option<Value>,
    reference: Option<Arc<Property>>,
    accessor: Arc<dyn Accessor>,
}

impl Property {
    pub fn new(
        owner: KindId,
        name: impl Into<String>,
        value_type: ValueType,
        default: Option<Value>,
        reference: Option<Arc<Property>>,
        accessor: Arc<dyn Accessor>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            value_type,
            default,
            reference,
            accessor,
        }
    }

    pub fn owner(&self) -> KindId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    /// The meta-property this property overrides.
    pub fn reference(&self) -> Option<&Arc<Property>> {
        self.reference.as_ref()
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Whether this property overrides `owner#name`, directly or through a
    /// chain of references.
    pub fn overrides(&self, owner: KindId, name: &str) -> bool {
        let mut next = self.reference.as_deref();
        while let Some(target) = next {
            if target.owner == owner && target.name == name {
                return true;
            }
            next = target.reference.as_deref();
        }
        false
    }

    /// Whether `instance` is a value of this property's owner.
    pub fn is_compatible_with(&self, instance: &Instance) -> bool {
        instance.kind() == self.owner
    }

    /// Read the value bound to this property in `instance`.
    pub fn try_read_from(&self, instance: &Instance) -> Result<Value, AccessorFault> {
        self.accessor.read(instance)
    }

    /// Read the value bound to this property in `instance`.
    ///
    /// # Panics
    ///
    /// Panics if the accessor faults, i.e. `instance` is not a fully bound
    /// value of this property's owner.
    pub fn read_from(&self, instance: &Instance) -> Value {
        match self.accessor.read(instance) {
            Ok(value) => value,
            Err(fault) => panic!("accessor invocation fault: {fault}"),
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.name.hash(state);
    }
}
