//! The process-wide composer. Kept in its own test binary: installation is once per process.

use std::sync::Arc;
use strata_compose::global;
use strata_core::Introspect;
use strata_tests::prelude::*;

#[test]
fn test_process_wide_composer() {
    // GIVEN nothing installed
    assert!(matches!(
        global::describe(KindId::new(0)),
        Err(ComposeError::NotInstalled)
    ));

    // WHEN the layered registry is installed
    let fixture = fixture::layered().unwrap();
    let leaf = fixture.id("Leaf");
    let first = fixture.id("First");
    let introspect: Arc<dyn Introspect> = Arc::new(fixture.registry);
    global::install(introspect).unwrap();

    // THEN a second installation is rejected
    let other: Arc<dyn Introspect> = Arc::new(RegistryBuilder::new().build().unwrap());
    assert!(matches!(
        global::install(other),
        Err(ComposeError::AlreadyInstalled)
    ));

    // AND descriptors are memoized process-wide
    let a = global::describe(leaf).unwrap();
    let b = global::describe(leaf).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(a.property("name").unwrap().overrides(first, "name"));
    assert!(global::of_kind(KindId::new(999)).unwrap().is_none());
    assert!(global::composer().unwrap().cache().contains(first));
}
