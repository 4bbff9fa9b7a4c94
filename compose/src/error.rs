//! Error types for descriptor composition.

use strata_core::{KindId, ValueType};
use thiserror::Error;

/// Errors that can occur while composing a descriptor.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The requested kind is not an attribute kind at all.
    #[error("Not an attribute kind: {0}")]
    NotAnAttributeKind(KindId),

    /// A property references a kind that is not (transitively) attached to its declaring kind.
    #[error(
        "Reference to meta-property {owner}#{property} from {kind} is invalid: \
         {kind} is not (transitively) tagged with {owner}"
    )]
    UnreachableReferenceOwner {
        kind: KindId,
        owner: KindId,
        property: String,
    },

    /// The referenced kind is reachable but declares no such property.
    #[error("Reference to meta-property {owner}#{property} from {kind} cannot be resolved")]
    UnknownReferencedProperty {
        kind: KindId,
        owner: KindId,
        property: String,
    },

    /// The overriding property's type differs from the referenced property's type.
    #[error(
        "Property {kind}#{property} overrides {owner}#{target} with type {declared}, expected {expected}"
    )]
    ReferenceTypeMismatch {
        kind: KindId,
        property: String,
        owner: KindId,
        target: String,
        declared: ValueType,
        expected: ValueType,
    },

    /// Following the reference of a property leads back to the property itself.
    #[error("Property {kind}#{property} overrides itself through its reference chain")]
    CyclicReference { kind: KindId, property: String },

    /// A process-wide introspector was already installed.
    #[error("A process-wide introspector is already installed")]
    AlreadyInstalled,

    /// No process-wide introspector has been installed.
    #[error("No process-wide introspector installed")]
    NotInstalled,
}

/// Result type for composition operations.
pub type ComposeResult<T> = Result<T, ComposeError>;
