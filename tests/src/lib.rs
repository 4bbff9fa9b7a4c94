//! Integration test support for Strata.
//!
//! Fixture kind graphs shared by the integration tests under `tests/`.


pub mod prelude {
    pub use crate::fixture::{self, Fixture};
    pub use strata_compose::{ComposeError, Composer, Descriptor};
    pub use strata_core::{Instance, KindId, Value, ValueType};
    pub use strata_registry::{InstanceDef, PropertyDef, RegistryBuilder};
}
