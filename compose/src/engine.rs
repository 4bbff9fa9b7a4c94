//! The composition engine.
//!
//! Computing a descriptor for kind `K`:
//! 1. Collect the instances attached to `K` whose kind is meta-capable,
//!    depth-first and transitively, expanding every kind at most once.
//! 2. Pick one representative instance per meta-kind (deepest occurrence).
//! 3. Obtain the descriptor of each meta-kind. A meta-kind `K` cannot reach
//!    back is described in full, recursively and memoized. A meta-kind on a
//!    cycle through `K` (a peer) is embedded as a view that leaves its own
//!    peers out.
//! 4. Assemble `K`'s own properties, resolving every reference to a
//!    property of a reachable meta-kind.
//! 5. Publish the finished descriptor.
//!
//! Every step is a function of the introspected graph alone, so the result
//! does not depend on which kinds were described before.

use crate::{ComposeError, ComposeResult, Descriptor, FieldAccessor, Property, ResolutionCache};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;
use std::sync::Arc;
use strata_core::{Instance, Introspect, KindId, PropertyDecl, ReferenceDecl};

/// Declaration names that are identity operations, never properties.
pub const RESERVED_NAMES: &[&str] = &[
    "eq",
    "equals",
    "hash",
    "hash_code",
    "hashCode",
    "fmt",
    "to_string",
    "toString",
    "kind",
    "annotation_type",
    "annotationType",
];

/// One attached instance found during collection.
#[derive(Debug, Clone)]
struct Occurrence {
    instance: Arc<Instance>,
    /// 1 for instances attached to the described kind itself.
    depth: usize,
}

/// Computes and memoizes descriptors over an introspector.
#[derive(Debug)]
pub struct Composer<I> {
    introspect: I,
    cache: ResolutionCache,
}

impl<I: Introspect> Composer<I> {
    pub fn new(introspect: I) -> Self {
        Self {
            introspect,
            cache: ResolutionCache::new(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Get the descriptor of `kind`, computing and caching it on first request.
    pub fn describe(&self, kind: KindId) -> ComposeResult<Arc<Descriptor>> {
        if !self.introspect.is_kind(kind) {
            return Err(ComposeError::NotAnAttributeKind(kind));
        }
        Resolution::new(self).describe(kind)
    }

    /// Like [`describe`](Self::describe), but a kind that is not an attribute
    /// kind is a normal outcome.
    pub fn of_kind(&self, kind: KindId) -> ComposeResult<Option<Arc<Descriptor>>> {
        match self.describe(kind) {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(ComposeError::NotAnAttributeKind(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Depth-first collection of meta-capable instances reachable from `kind`,
    /// returned in unwind order: the most recently discovered first.
    ///
    /// An instance is recorded before its kind is expanded, and its kind's
    /// instances are fully expanded before the next sibling. Every kind is
    /// expanded at most once, which bounds the work by the number of kinds.
    fn collect_meta_instances(&self, kind: KindId) -> Vec<Occurrence> {
        let mut discovered = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(kind);

        let mut stack = vec![(self.introspect.attached(kind).into_iter(), 1usize)];
        loop {
            let next = match stack.last_mut() {
                Some((instances, depth)) => instances.next().map(|instance| (instance, *depth)),
                None => break,
            };
            let Some((instance, depth)) = next else {
                stack.pop();
                continue;
            };

            let meta_kind = instance.kind();
            if !self.introspect.is_meta_capable(meta_kind) {
                continue;
            }
            discovered.push(Occurrence { instance, depth });
            if visited.insert(meta_kind) {
                stack.push((self.introspect.attached(meta_kind).into_iter(), depth + 1));
            }
        }

        discovered.reverse();
        discovered
    }
}

/// State of one top-level `describe` call.
///
/// Everything memoized here is a function of the graph, so entries are
/// shared freely between the kinds described during the call. Only full
/// descriptors reach the cache; peer views and properties live as long as
/// the call.
struct Resolution<'a, I> {
    composer: &'a Composer<I>,
    /// Representative occurrence per reachable meta-kind, in unwind order.
    reach: FxHashMap<KindId, Rc<IndexMap<KindId, Occurrence>>>,
    views: FxHashMap<KindId, Arc<Descriptor>>,
    properties: FxHashMap<(KindId, String), Arc<Property>>,
    /// Properties whose reference is being resolved.
    pending: FxHashSet<(KindId, String)>,
}

impl<'a, I: Introspect> Resolution<'a, I> {
    fn new(composer: &'a Composer<I>) -> Self {
        Self {
            composer,
            reach: FxHashMap::default(),
            views: FxHashMap::default(),
            properties: FxHashMap::default(),
            pending: FxHashSet::default(),
        }
    }

    fn reach(&mut self, kind: KindId) -> Rc<IndexMap<KindId, Occurrence>> {
        if let Some(reach) = self.reach.get(&kind) {
            return Rc::clone(reach);
        }
        let occurrences = self.composer.collect_meta_instances(kind);
        let reach = Rc::new(select_representatives(kind, occurrences));
        self.reach.insert(kind, Rc::clone(&reach));
        reach
    }

    /// Whether `kind` and `meta_kind` reach each other, i.e. share a cycle.
    fn are_peers(&mut self, kind: KindId, meta_kind: KindId) -> bool {
        self.reach(kind).contains_key(&meta_kind) && self.reach(meta_kind).contains_key(&kind)
    }

    /// The full descriptor of `kind`, published on first computation.
    fn describe(&mut self, kind: KindId) -> ComposeResult<Arc<Descriptor>> {
        if let Some(descriptor) = self.composer.cache.get(kind) {
            tracing::trace!(kind = %kind, "descriptor cache hit");
            return Ok(descriptor);
        }

        let descriptor = self.assemble(kind, true)?;
        tracing::debug!(
            kind = %kind,
            properties = descriptor.properties().len(),
            meta_kinds = descriptor.meta_instances().len(),
            "publishing descriptor"
        );
        Ok(self.composer.cache.publish(descriptor))
    }

    /// `kind` as seen from one of its peers: complete except that the
    /// descriptors of its own peers are left out.
    fn view(&mut self, kind: KindId) -> ComposeResult<Arc<Descriptor>> {
        if let Some(view) = self.views.get(&kind) {
            return Ok(Arc::clone(view));
        }
        let view = Arc::new(self.assemble(kind, false)?);
        self.views.insert(kind, Arc::clone(&view));
        Ok(view)
    }

    fn assemble(&mut self, kind: KindId, with_peers: bool) -> ComposeResult<Descriptor> {
        tracing::debug!(
            kind = %kind,
            name = self.composer.introspect.kind_name(kind).as_deref().unwrap_or("?"),
            view = !with_peers,
            "computing descriptor"
        );

        let representatives = self.reach(kind);
        let mut meta_descriptors = IndexMap::with_capacity(representatives.len());
        for &meta_kind in representatives.keys() {
            let descriptor = if !self.are_peers(kind, meta_kind) {
                self.describe(meta_kind)?
            } else if with_peers {
                self.view(meta_kind)?
            } else {
                continue;
            };
            meta_descriptors.insert(meta_kind, descriptor);
        }

        let properties = self.assemble_properties(kind)?;
        let meta_instances = representatives
            .iter()
            .map(|(&meta_kind, occurrence)| (meta_kind, Arc::clone(&occurrence.instance)))
            .collect();
        Ok(Descriptor::new(kind, properties, meta_descriptors, meta_instances))
    }

    fn assemble_properties(
        &mut self,
        kind: KindId,
    ) -> ComposeResult<IndexMap<String, Arc<Property>>> {
        let mut properties = IndexMap::new();
        for decl in self.composer.introspect.declarations(kind) {
            if !is_property(&decl) {
                continue;
            }
            let property = self.property(kind, &decl)?;
            properties.insert(decl.name, property);
        }
        Ok(properties)
    }

    /// The property `owner#name`, or `None` if `owner` declares no such property.
    fn lookup(&mut self, owner: KindId, name: &str) -> ComposeResult<Option<Arc<Property>>> {
        if let Some(descriptor) = self.composer.cache.get(owner) {
            return Ok(descriptor.property(name).cloned());
        }
        let decl = self
            .composer
            .introspect
            .declarations(owner)
            .into_iter()
            .find(|decl| decl.name == name && is_property(decl));
        match decl {
            Some(decl) => self.property(owner, &decl).map(Some),
            None => Ok(None),
        }
    }

    fn property(&mut self, kind: KindId, decl: &PropertyDecl) -> ComposeResult<Arc<Property>> {
        let key = (kind, decl.name.clone());
        if let Some(property) = self.properties.get(&key) {
            return Ok(Arc::clone(property));
        }

        let reference = match &decl.reference {
            Some(reference) => {
                if !self.pending.insert(key.clone()) {
                    return Err(ComposeError::CyclicReference {
                        kind,
                        property: decl.name.clone(),
                    });
                }
                let target = self.resolve_reference(kind, decl, reference);
                self.pending.remove(&key);
                Some(target?)
            }
            None => None,
        };

        let accessor = Arc::new(FieldAccessor::new(kind, decl.name.clone()));
        let property = Arc::new(Property::new(
            kind,
            decl.name.clone(),
            decl.value_type.clone(),
            decl.default.clone(),
            reference,
            accessor,
        ));
        self.properties.insert(key, Arc::clone(&property));
        Ok(property)
    }

    fn resolve_reference(
        &mut self,
        kind: KindId,
        decl: &PropertyDecl,
        reference: &ReferenceDecl,
    ) -> ComposeResult<Arc<Property>> {
        let target_name = if reference.name.is_empty() {
            decl.name.as_str()
        } else {
            reference.name.as_str()
        };

        if !self.reach(kind).contains_key(&reference.owner) {
            return Err(ComposeError::UnreachableReferenceOwner {
                kind,
                owner: reference.owner,
                property: target_name.to_string(),
            });
        }
        let target = self.lookup(reference.owner, target_name)?.ok_or_else(|| {
            ComposeError::UnknownReferencedProperty {
                kind,
                owner: reference.owner,
                property: target_name.to_string(),
            }
        })?;

        if *target.value_type() != decl.value_type {
            return Err(ComposeError::ReferenceTypeMismatch {
                kind,
                property: decl.name.clone(),
                owner: reference.owner,
                target: target_name.to_string(),
                declared: decl.value_type.clone(),
                expected: target.value_type().clone(),
            });
        }
        Ok(target)
    }
}

fn is_property(decl: &PropertyDecl) -> bool {
    decl.arity == 0 && !RESERVED_NAMES.contains(&decl.name.as_str())
}

/// One occurrence per meta-kind, excluding `kind` itself: the deepest one,
/// and among equally deep ones the first in unwind order. Keys keep the
/// unwind order of their first occurrence.
fn select_representatives(
    kind: KindId,
    occurrences: Vec<Occurrence>,
) -> IndexMap<KindId, Occurrence> {
    let mut selected: IndexMap<KindId, Occurrence> = IndexMap::new();
    for occurrence in occurrences {
        let meta_kind = occurrence.instance.kind();
        if meta_kind == kind {
            continue;
        }
        match selected.get_mut(&meta_kind) {
            Some(kept) if occurrence.depth > kept.depth => *kept = occurrence,
            Some(kept) => {
                tracing::debug!(
                    kind = %kind,
                    meta_kind = %meta_kind,
                    kept_depth = kept.depth,
                    dropped_depth = occurrence.depth,
                    "meta-kind reached more than once, keeping the deepest instance"
                );
            }
            None => {
                selected.insert(meta_kind, occurrence);
            }
        }
    }
    selected
}
