//! Strata Compose
//!
//! Composition of kind metadata. Given a kind that is tagged with other
//! (meta-capable) kinds, the [`Composer`] computes a [`Descriptor`]: the
//! kind's own properties, every meta-kind reachable through its attached
//! instances, the concrete instance configured for each of them, and the
//! properties that override a property of some meta-kind.
//!
//! Descriptors are computed once per kind and memoized in a
//! [`ResolutionCache`]; [`global`] offers a process-wide composer.

mod accessor;
mod cache;
mod descriptor;
mod engine;
mod error;
pub mod global;
mod property;

pub use accessor::{Accessor, AccessorFault, FieldAccessor};
pub use cache::ResolutionCache;
pub use descriptor::Descriptor;
pub use engine::{Composer, RESERVED_NAMES};
pub use error::{ComposeError, ComposeResult};
pub use property::Property;
