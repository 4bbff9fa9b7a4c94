//! Strata Core Types
//!
//! This crate provides the foundational types shared by the Strata crates:
//! - Kind identity (KindId)
//! - Value types (the Value enum and its declared ValueType)
//! - Attribute instances (Instance)
//! - Property declarations as seen by introspection (PropertyDecl, ReferenceDecl)
//! - The declaration introspection seam (Introspect)

mod id;
mod instance;
mod introspect;
mod value;

pub use id::*;
pub use instance::*;
pub use introspect::*;
pub use value::*;
