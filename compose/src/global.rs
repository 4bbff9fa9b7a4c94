//! The process-wide composer.
//!
//! One introspector is installed per process; its descriptors are cached
//! for the remaining lifetime of the process.

use crate::{ComposeError, ComposeResult, Composer, Descriptor};
use std::sync::{Arc, OnceLock};
use strata_core::{Introspect, KindId};

static COMPOSER: OnceLock<Composer<Arc<dyn Introspect>>> = OnceLock::new();

/// Install the process-wide introspector. Only the first call succeeds.
pub fn install(introspect: Arc<dyn Introspect>) -> ComposeResult<()> {
    COMPOSER
        .set(Composer::new(introspect))
        .map_err(|_| ComposeError::AlreadyInstalled)?;
    tracing::debug!("process-wide composer installed");
    Ok(())
}

/// The process-wide composer.
pub fn composer() -> ComposeResult<&'static Composer<Arc<dyn Introspect>>> {
    COMPOSER.get().ok_or(ComposeError::NotInstalled)
}

/// Describe `kind` through the process-wide composer.
pub fn describe(kind: KindId) -> ComposeResult<Arc<Descriptor>> {
    composer()?.describe(kind)
}

/// Describe `kind` through the process-wide composer; `None` if it is not an attribute kind.
pub fn of_kind(kind: KindId) -> ComposeResult<Option<Arc<Descriptor>>> {
    composer()?.of_kind(kind)
}
