//! The composed view of one kind.

use crate::Property;
use indexmap::IndexMap;
use std::sync::Arc;
use strata_core::{Instance, KindId, Value};

/// Own properties of a kind plus everything it inherits through its
/// meta-kinds. Immutable once constructed.
#[derive(Debug, PartialEq)]
pub struct Descriptor {
    /// The described kind.
    kind: KindId,
    /// Properties declared directly on the kind, in declaration order.
    properties: IndexMap<String, Arc<Property>>,
    /// Descriptor of every meta-kind reachable from the kind, in resolution order.
    meta_descriptors: IndexMap<KindId, Arc<Descriptor>>,
    /// The concrete instance configured for each reachable meta-kind.
    meta_instances: IndexMap<KindId, Arc<Instance>>,
    /// Referenced property name to the local property overriding it.
    references: IndexMap<String, Arc<Property>>,
}

impl Descriptor {
    pub(crate) fn new(
        kind: KindId,
        properties: IndexMap<String, Arc<Property>>,
        meta_descriptors: IndexMap<KindId, Arc<Descriptor>>,
        meta_instances: IndexMap<KindId, Arc<Instance>>,
    ) -> Self {
        let mut references: IndexMap<String, Arc<Property>> = IndexMap::new();
        for property in properties.values() {
            let Some(target) = property.reference() else {
                continue;
            };
            if let Some(kept) = references.get(target.name()) {
                tracing::debug!(
                    kind = %kind,
                    target = target.name(),
                    kept = kept.name(),
                    dropped = property.name(),
                    "referenced property already overridden, keeping the first override"
                );
                continue;
            }
            references.insert(target.name().to_string(), Arc::clone(property));
        }

        Self {
            kind,
            properties,
            meta_descriptors,
            meta_instances,
            references,
        }
    }

    pub fn kind(&self) -> KindId {
        self.kind
    }

    pub fn properties(&self) -> &IndexMap<String, Arc<Property>> {
        &self.properties
    }

    pub fn meta_descriptors(&self) -> &IndexMap<KindId, Arc<Descriptor>> {
        &self.meta_descriptors
    }

    pub fn meta_instances(&self) -> &IndexMap<KindId, Arc<Instance>> {
        &self.meta_instances
    }

    pub fn references(&self) -> &IndexMap<String, Arc<Property>> {
        &self.references
    }

    /// Whether `meta_kind` is reachable from this kind.
    pub fn is_composed_of(&self, meta_kind: KindId) -> bool {
        self.meta_instances.contains_key(&meta_kind)
    }

    /// Look up a property declared directly on this kind.
    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        self.properties.get(name)
    }

    /// Look up a property of one of this kind's meta-kinds.
    pub fn meta_property(&self, meta_kind: KindId, name: &str) -> Option<&Arc<Property>> {
        self.meta_descriptors
            .get(&meta_kind)
            .and_then(|descriptor| descriptor.property(name))
    }

    /// The value configured for `meta_kind#name` as seen from this kind.
    ///
    /// For this kind itself that is the declared default. For a meta-kind it
    /// is the value bound in the instance this kind carries for it, not the
    /// meta-kind's default. Null values are reported as absent.
    pub fn fetch_effective_value(&self, meta_kind: KindId, name: &str) -> Option<Value> {
        if meta_kind == self.kind {
            return self
                .property(name)
                .and_then(|property| property.default_value())
                .filter(|value| !value.is_null())
                .cloned();
        }

        let instance = self.meta_instances.get(&meta_kind)?;
        let property = self.meta_property(meta_kind, name)?;
        non_null(property.read_from(instance))
    }

    /// Resolve `meta_kind#name` for a concrete instance of this kind, honoring overrides.
    ///
    /// Checked in order: a property of this kind overriding the target (read
    /// from `instance`), then the meta-kinds in discovery order, i.e. the
    /// reverse of [`meta_descriptors`](Self::meta_descriptors), where the
    /// first one overriding the target is read from the instance configured
    /// for it, then [`fetch_effective_value`](Self::fetch_effective_value).
    ///
    /// # Panics
    ///
    /// Panics if `instance` is not a value of this kind.
    pub fn resolve_value(
        &self,
        instance: &Instance,
        meta_kind: KindId,
        name: &str,
    ) -> Option<Value> {
        if meta_kind == self.kind {
            return self
                .property(name)
                .and_then(|property| non_null(property.read_from(instance)));
        }

        if let Some(local) = self.overriding(meta_kind, name) {
            return non_null(local.read_from(instance));
        }

        for (kind, descriptor) in self.meta_descriptors.iter().rev() {
            let (Some(property), Some(configured)) = (
                descriptor.overriding(meta_kind, name),
                self.meta_instances.get(kind),
            ) else {
                continue;
            };
            return non_null(property.read_from(configured));
        }

        self.fetch_effective_value(meta_kind, name)
    }

    /// The local property overriding `meta_kind#name`, if any.
    fn overriding(&self, meta_kind: KindId, name: &str) -> Option<&Arc<Property>> {
        self.properties
            .values()
            .find(|property| property.overrides(meta_kind, name))
    }
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}
