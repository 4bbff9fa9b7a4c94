//! Strata Registry
//!
//! An explicit, immutable catalogue of kinds: their meta-capability, property
//! declarations and attached instances. The registry is immutable after
//! construction via RegistryBuilder and is the stock [`Introspect`] supplier
//! for the composition engine.
//!
//! [`Introspect`]: strata_core::Introspect

mod builder;
mod registry;
mod types;

pub use builder::{KindBuilder, RegistryBuilder, RegistryError};
pub use registry::Registry;
pub use types::*;
