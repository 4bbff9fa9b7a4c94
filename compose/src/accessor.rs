//! Reading property values out of attribute instances.

use std::fmt;
use strata_core::{Instance, KindId, Value};
use thiserror::Error;

/// A failed read. Reaching one means a property was handed an instance it
/// was never meant for; callers treat it as an internal invariant violation.
#[derive(Debug, Error)]
pub enum AccessorFault {
    #[error("cannot read {owner}#{name} from an instance of {actual}")]
    IncompatibleInstance {
        owner: KindId,
        name: String,
        actual: KindId,
    },

    #[error("instance of {owner} has no binding for {name}")]
    Unbound { owner: KindId, name: String },
}

/// Reads the value bound to one named property of instances of one kind.
pub trait Accessor: Send + Sync + fmt::Debug {
    fn read(&self, instance: &Instance) -> Result<Value, AccessorFault>;
}

/// Accessor reading a named binding straight from the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    owner: KindId,
    name: String,
}

impl FieldAccessor {
    pub fn new(owner: KindId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl Accessor for FieldAccessor {
    fn read(&self, instance: &Instance) -> Result<Value, AccessorFault> {
        if instance.kind() != self.owner {
            return Err(AccessorFault::IncompatibleInstance {
                owner: self.owner,
                name: self.name.clone(),
                actual: instance.kind(),
            });
        }
        instance
            .get(&self.name)
            .cloned()
            .ok_or_else(|| AccessorFault::Unbound {
                owner: self.owner,
                name: self.name.clone(),
            })
    }
}
