//! The declaration introspection seam.
//!
//! Strata never discovers declarations by itself. Whatever knows the kinds
//! (an explicit registry, generated code, a host reflection layer) implements
//! [`Introspect`] and hands that to the composition engine.

use crate::{Instance, KindId, Value, ValueType};
use std::sync::Arc;

/// A declared override target: the property `name` of kind `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceDecl {
    /// Kind that owns the referenced property.
    pub owner: KindId,
    /// Referenced property name. Empty means "same name as the declaring property".
    pub name: String,
}

impl ReferenceDecl {
    pub fn new(owner: KindId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

/// A property declaration as reported by introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Number of arguments the declaration takes. Only zero-argument
    /// declarations are properties.
    pub arity: usize,
    /// Declared value type.
    pub value_type: ValueType,
    /// Default value, if the declaration has one.
    pub default: Option<Value>,
    /// Override target, if the declaration carries a reference marker.
    pub reference: Option<ReferenceDecl>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            arity: 0,
            value_type,
            default: None,
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

    pub fn with_reference(mut self, reference: ReferenceDecl) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Supplies everything the composition engine needs to know about kinds.
pub trait Introspect: Send + Sync {
    /// Whether `kind` is a valid attribute kind at all.
    fn is_kind(&self, kind: KindId) -> bool;

    /// Whether `kind` is marked as composable into other kinds.
    fn is_meta_capable(&self, kind: KindId) -> bool;

    /// Instances directly attached to `kind`, in declaration order.
    fn attached(&self, kind: KindId) -> Vec<Arc<Instance>>;

    /// Property declarations of `kind`, in declaration order.
    fn declarations(&self, kind: KindId) -> Vec<PropertyDecl>;

    /// Human-readable name of `kind`, for diagnostics.
    fn kind_name(&self, _kind: KindId) -> Option<String> {
        None
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn is_kind(&self, kind: KindId) -> bool {
        (**self).is_kind(kind)
    }

    fn is_meta_capable(&self, kind: KindId) -> bool {
        (**self).is_meta_capable(kind)
    }

    fn attached(&self, kind: KindId) -> Vec<Arc<Instance>> {
        (**self).attached(kind)
    }

    fn declarations(&self, kind: KindId) -> Vec<PropertyDecl> {
        (**self).declarations(kind)
    }

    fn kind_name(&self, kind: KindId) -> Option<String> {
        (**self).kind_name(kind)
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn is_kind(&self, kind: KindId) -> bool {
        (**self).is_kind(kind)
    }

    fn is_meta_capable(&self, kind: KindId) -> bool {
        (**self).is_meta_capable(kind)
    }

    fn attached(&self, kind: KindId) -> Vec<Arc<Instance>> {
        (**self).attached(kind)
    }

    fn declarations(&self, kind: KindId) -> Vec<PropertyDecl> {
        (**self).declarations(kind)
    }

    fn kind_name(&self, kind: KindId) -> Option<String> {
        (**self).kind_name(kind)
    }
}
