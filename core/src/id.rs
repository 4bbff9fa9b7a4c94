//! Identity types for Strata kinds.
//!
//! Kind identifiers are 32-bit values that are:
//! - Unique within the introspector that hands them out
//! - Immutable once assigned
//! - Opaque to external users

use std::fmt;

/// Identifier for a kind (a declarative tag type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub u32);

impl KindId {
    /// Create a new KindId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}
