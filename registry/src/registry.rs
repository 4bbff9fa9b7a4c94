//! The Registry - immutable kind lookup.

use crate::builder::materialize;
use crate::{InstanceDef, KindDef, RegistryError};
use std::collections::HashMap;
use std::sync::Arc;
use strata_core::{Instance, Introspect, KindId, PropertyDecl};

/// The Registry provides runtime lookup of kind definitions.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Kind definitions by ID.
    kinds: HashMap<KindId, KindDef>,
    /// Kind ID lookup by name.
    kind_names: HashMap<String, KindId>,
}

impl Registry {
    pub(crate) fn new(
        kinds: HashMap<KindId, KindDef>,
        kind_names: HashMap<String, KindId>,
    ) -> Self {
        Self { kinds, kind_names }
    }

    // ==================== Kind Lookups ====================

    /// Get a kind definition by name.
    pub fn kind_by_name(&self, name: &str) -> Option<&KindDef> {
        self.kind_names.get(name).and_then(|id| self.kinds.get(id))
    }

    /// Get a kind definition by ID.
    pub fn kind(&self, id: KindId) -> Option<&KindDef> {
        self.kinds.get(&id)
    }

    /// Get a kind ID by name.
    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.kind_names.get(name).copied()
    }

    /// Get all kind definitions.
    pub fn all_kinds(&self) -> impl Iterator<Item = &KindDef> {
        self.kinds.values()
    }

    /// Get the number of kinds.
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    // ==================== Instances ====================

    /// Create a concrete instance of a registered kind, e.g. the value found
    /// on some declaration site. Unbound properties take their defaults.
    pub fn instance(&self, def: InstanceDef) -> Result<Instance, RegistryError> {
        materialize(&def, &self.kind_names, |id| {
            self.kinds.get(&id).map(|k| k.properties.as_slice())
        })
    }
}

impl Introspect for Registry {
    fn is_kind(&self, kind: KindId) -> bool {
        self.kinds.contains_key(&kind)
    }

    fn is_meta_capable(&self, kind: KindId) -> bool {
        self.kinds.get(&kind).is_some_and(|k| k.meta)
    }

    fn attached(&self, kind: KindId) -> Vec<Arc<Instance>> {
        self.kinds
            .get(&kind)
            .map(|k| k.attached.clone())
            .unwrap_or_default()
    }

    fn declarations(&self, kind: KindId) -> Vec<PropertyDecl> {
        self.kinds
            .get(&kind)
            .map(|k| k.properties.clone())
            .unwrap_or_default()
    }

    fn kind_name(&self, kind: KindId) -> Option<String> {
        self.kinds.get(&kind).map(|k| k.name.clone())
    }
}
