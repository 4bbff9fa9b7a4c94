//! Process-wide memoization of descriptors, one entry per kind.

use crate::Descriptor;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use strata_core::KindId;

/// Concurrent, publish-once table of descriptors keyed by kind.
///
/// Entries are never invalidated: kinds are immutable once introspectable.
/// Two threads may compute the same descriptor concurrently; the first one
/// published is kept and handed back to both.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<FxHashMap<KindId, Arc<Descriptor>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the descriptor published for a kind.
    pub fn get(&self, kind: KindId) -> Option<Arc<Descriptor>> {
        self.entries.read().get(&kind).cloned()
    }

    /// Check if a descriptor was published for a kind.
    pub fn contains(&self, kind: KindId) -> bool {
        self.entries.read().contains_key(&kind)
    }

    /// Publish a fully constructed descriptor and return the one that is
    /// cached for its kind afterwards, which is an earlier one if another
    /// thread won the race.
    pub fn publish(&self, descriptor: Descriptor) -> Arc<Descriptor> {
        let kind = descriptor.kind();
        let mut entries = self.entries.write();
        Arc::clone(
            entries
                .entry(kind)
                .or_insert_with(|| Arc::new(descriptor)),
        )
    }

    /// Number of published descriptors.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
