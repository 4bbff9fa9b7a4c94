//! Concurrent access to one composer.

use std::sync::Arc;
use std::thread;
use strata_tests::prelude::*;

#[test]
fn test_concurrent_describe_observes_one_descriptor() {
    // GIVEN one composer shared by several threads
    let fixture = fixture::layered().unwrap();
    let composer = Composer::new(&fixture.registry);
    let leaf = fixture.id("Leaf");

    // WHEN they all describe Leaf at once
    let descriptors: Vec<Arc<Descriptor>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| composer.describe(leaf).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // THEN every thread got the published descriptor
    let published = composer.cache().get(leaf).unwrap();
    for descriptor in &descriptors {
        assert!(Arc::ptr_eq(descriptor, &published));
    }
    assert_eq!(composer.cache().len(), 6);
}

#[test]
fn test_concurrent_describe_of_a_cycle() {
    let fixture = fixture::cycle().unwrap();
    let composer = Composer::new(&fixture.registry);
    let kinds = [fixture.id("Ping"), fixture.id("Pong"), fixture.id("Match")];

    thread::scope(|scope| {
        for i in 0..9 {
            let kind = kinds[i % kinds.len()];
            let composer = &composer;
            scope.spawn(move || composer.describe(kind).unwrap());
        }
    });

    assert_eq!(composer.cache().len(), 3);
    let ping = composer.describe(fixture.id("Ping")).unwrap();
    assert!(ping.meta_descriptors().contains_key(&fixture.id("Pong")));
}
