//! RegistryBuilder for constructing an immutable Registry.

use crate::{InstanceDef, KindDef, PropertyDef, Registry};
use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use strata_core::{Instance, KindId, PropertyDecl, ReferenceDecl};
use thiserror::Error;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Duplicate kind name: {0}")]
    DuplicateKindName(String),

    #[error("Duplicate property {property} on kind {kind}")]
    DuplicateProperty { kind: String, property: String },

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Unknown property {property} on kind {kind}")]
    UnknownProperty { kind: String, property: String },

    #[error("Type mismatch for {kind}.{property}: expected {expected}, got {actual}")]
    TypeMismatch {
        kind: String,
        property: String,
        expected: String,
        actual: String,
    },

    #[error("No value bound for {kind}.{property} and no default declared")]
    MissingValue { kind: String, property: String },
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

/// A kind whose names are not resolved yet.
#[derive(Debug)]
struct PendingKind {
    id: KindId,
    name: String,
    meta: bool,
    properties: Vec<PropertyDef>,
    attachments: Vec<InstanceDef>,
}

/// Builder for constructing an immutable Registry.
///
/// Kinds refer to each other by name and names are only resolved in
/// [`build`](Self::build), so kinds may attach instances of kinds declared
/// later, including cyclically.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next kind ID to allocate.
    next_kind_id: u32,
    /// Kinds being built, in declaration order.
    kinds: Vec<PendingKind>,
    /// Kind name to ID mapping.
    kind_names: HashMap<String, KindId>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind definition.
    pub fn add_kind(&mut self, name: impl Into<String>) -> KindBuilder<'_> {
        let name = name.into();
        let id = KindId::new(self.next_kind_id);
        self.next_kind_id += 1;

        KindBuilder {
            builder: self,
            id,
            name,
            meta: false,
            properties: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Get the ID assigned to an already added kind.
    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.kind_names.get(name).copied()
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let RegistryBuilder {
            kinds: pending_kinds,
            kind_names,
            ..
        } = self;

        // Resolve property declarations first; instances are checked against them
        let mut declarations: HashMap<KindId, Vec<PropertyDecl>> = HashMap::new();
        for pending in &pending_kinds {
            let mut decls = Vec::with_capacity(pending.properties.len());
            for def in &pending.properties {
                decls.push(resolve_property(&pending.name, def, &kind_names)?);
            }
            declarations.insert(pending.id, decls);
        }

        let mut attached_by_kind = Vec::with_capacity(pending_kinds.len());
        for pending in &pending_kinds {
            let mut attached = Vec::with_capacity(pending.attachments.len());
            for def in &pending.attachments {
                let instance = materialize(def, &kind_names, |id| {
                    declarations.get(&id).map(Vec::as_slice)
                })?;
                attached.push(Arc::new(instance));
            }
            attached_by_kind.push(attached);
        }

        let mut kinds = HashMap::with_capacity(pending_kinds.len());
        for (pending, attached) in pending_kinds.into_iter().zip(attached_by_kind) {
            let properties = declarations.remove(&pending.id).unwrap_or_default();
            kinds.insert(
                pending.id,
                KindDef {
                    id: pending.id,
                    name: pending.name,
                    meta: pending.meta,
                    properties,
                    attached,
                },
            );
        }

        tracing::debug!(kinds = kinds.len(), "kind registry built");
        Ok(Registry::new(kinds, kind_names))
    }
}

fn resolve_property(
    kind_name: &str,
    def: &PropertyDef,
    kind_names: &HashMap<String, KindId>,
) -> Result<PropertyDecl, RegistryError> {
    if let Some(default) = &def.default {
        if !def.value_type.accepts(default) {
            return Err(RegistryError::TypeMismatch {
                kind: kind_name.to_string(),
                property: def.name.clone(),
                expected: def.value_type.to_string(),
                actual: default.type_name().to_string(),
            });
        }
    }

    let reference = match &def.reference {
        Some((owner, name)) => {
            let owner_id = kind_names
                .get(owner)
                .copied()
                .ok_or_else(|| RegistryError::UnknownKind(owner.clone()))?;
            Some(ReferenceDecl::new(owner_id, name.clone()))
        }
        None => None,
    };

    Ok(PropertyDecl {
        name: def.name.clone(),
        arity: def.arity,
        value_type: def.value_type.clone(),
        default: def.default.clone(),
        reference,
    })
}

/// Turn an instance definition into a concrete instance: every zero-argument
/// property ends up bound, either explicitly or to its default.
pub(crate) fn materialize<'a>(
    def: &InstanceDef,
    kind_names: &HashMap<String, KindId>,
    declarations: impl Fn(KindId) -> Option<&'a [PropertyDecl]>,
) -> Result<Instance, RegistryError> {
    let kind = kind_names
        .get(&def.kind_name)
        .copied()
        .ok_or_else(|| RegistryError::UnknownKind(def.kind_name.clone()))?;
    let decls = declarations(kind).unwrap_or_default();

    for name in def.values.keys() {
        if !decls.iter().any(|d| d.arity == 0 && d.name == *name) {
            return Err(RegistryError::UnknownProperty {
                kind: def.kind_name.clone(),
                property: name.clone(),
            });
        }
    }

    let mut instance = Instance::new(kind);
    for decl in decls.iter().filter(|d| d.arity == 0) {
        let value = match def.values.get(&decl.name).or(decl.default.as_ref()) {
            Some(value) => value.clone(),
            None => {
                return Err(RegistryError::MissingValue {
                    kind: def.kind_name.clone(),
                    property: decl.name.clone(),
                })
            }
        };
        if !decl.value_type.accepts(&value) {
            return Err(RegistryError::TypeMismatch {
                kind: def.kind_name.clone(),
                property: decl.name.clone(),
                expected: decl.value_type.to_string(),
                actual: value.type_name().to_string(),
            });
        }
        instance = instance.with(decl.name.clone(), value);
    }

    Ok(instance)
}

/// Builder for a kind definition.
pub struct KindBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: KindId,
    name: String,
    meta: bool,
    properties: Vec<PropertyDef>,
    attachments: Vec<InstanceDef>,
}

impl<'a> KindBuilder<'a> {
    /// Mark as meta-capable: instances of this kind compose into the kinds they are attached to.
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Add a property declaration.
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Attach an instance of another kind.
    pub fn attach(mut self, instance: InstanceDef) -> Self {
        self.attachments.push(instance);
        self
    }

    /// Finish building this kind.
    pub fn done(self) -> Result<KindId, RegistryError> {
        check_name(&self.name)?;
        if self.builder.kind_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateKindName(self.name));
        }

        for (i, property) in self.properties.iter().enumerate() {
            check_name(&property.name)?;
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(RegistryError::DuplicateProperty {
                    kind: self.name,
                    property: property.name.clone(),
                });
            }
        }

        self.builder.kind_names.insert(self.name.clone(), self.id);
        self.builder.kinds.push(PendingKind {
            id: self.id,
            name: self.name,
            meta: self.meta,
            properties: self.properties,
            attachments: self.attachments,
        });

        Ok(self.id)
    }
}
