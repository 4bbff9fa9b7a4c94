//! Composition of layered, diamond and cyclic kind graphs.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use strata_tests::prelude::*;

mod layered {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meta_kinds_in_resolution_order() {
        let fixture = fixture::layered().unwrap();
        let composer = Composer::new(&fixture.registry);

        let descriptor = composer.describe(fixture.id("Leaf")).unwrap();

        assert_eq!(
            fixture.names(descriptor.meta_descriptors().keys().copied()),
            vec!["Second", "Third", "First", "Fourth", "Fifth"]
        );
        assert_eq!(
            fixture.names(descriptor.meta_instances().keys().copied()),
            vec!["Second", "Third", "First", "Fourth", "Fifth"]
        );
    }

    #[test]
    fn test_meta_descriptors_are_shared_with_the_cache() {
        let fixture = fixture::layered().unwrap();
        let composer = Composer::new(&fixture.registry);

        let leaf = composer.describe(fixture.id("Leaf")).unwrap();
        let fourth = composer.describe(fixture.id("Fourth")).unwrap();

        assert!(Arc::ptr_eq(
            &leaf.meta_descriptors()[&fixture.id("Fourth")],
            &fourth
        ));
        assert_eq!(
            fixture.names(fourth.meta_descriptors().keys().copied()),
            vec!["Second", "Third", "First"]
        );
    }

    #[test]
    fn test_effective_values() {
        // GIVEN Leaf -> Fifth -> Fourth -> (First, Third -> Second)
        let fixture = fixture::layered().unwrap();
        let composer = Composer::new(&fixture.registry);
        let leaf = fixture.id("Leaf");
        let descriptor = composer.describe(leaf).unwrap();

        // WHEN asking Leaf itself: its own default, and Leaf#name has none
        assert_eq!(descriptor.fetch_effective_value(leaf, "name"), None);

        // WHEN asking through First: the instance configured on Fourth is read
        assert_eq!(
            descriptor.fetch_effective_value(fixture.id("First"), "name"),
            Some(Value::from(""))
        );

        // WHEN asking deeper meta-kinds
        assert_eq!(
            descriptor.fetch_effective_value(fixture.id("Second"), "index"),
            Some(Value::Int(0))
        );
        assert_eq!(
            descriptor.fetch_effective_value(fixture.id("Third"), "target"),
            Some(Value::from("PACKAGE"))
        );

        // WHEN asking for unknown names
        assert_eq!(descriptor.fetch_effective_value(fixture.id("Second"), "nope"), None);
    }

    #[test]
    fn test_meta_property_lookup() {
        let fixture = fixture::layered().unwrap();
        let composer = Composer::new(&fixture.registry);
        let descriptor = composer.describe(fixture.id("Leaf")).unwrap();

        let check = descriptor
            .meta_property(fixture.id("Fourth"), "check")
            .unwrap();
        assert_eq!(check.owner(), fixture.id("Fourth"));
        assert_eq!(check.default_value(), Some(&Value::Bool(false)));

        assert!(descriptor.meta_property(fixture.id("Fourth"), "name").is_none());
        assert!(descriptor.meta_property(fixture.id("Leaf"), "name").is_none());
        assert!(descriptor.property("name").is_some());
    }

    #[test]
    fn test_idempotent_across_composers() {
        let fixture = fixture::layered().unwrap();
        let leaf = fixture.id("Leaf");

        let first = Composer::new(&fixture.registry).describe(leaf).unwrap();
        let second = Composer::new(&fixture.registry).describe(leaf).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}

mod diamond {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deeper_instance_wins() {
        // GIVEN Diamond -> Order(10) and Diamond -> Ranked -> Order(1)
        let fixture = fixture::diamond().unwrap();
        let composer = Composer::new(&fixture.registry);
        let order = fixture.id("Order");

        // WHEN describing Diamond
        let descriptor = composer.describe(fixture.id("Diamond")).unwrap();

        // THEN Order appears once, configured by the deeper instance
        assert_eq!(descriptor.meta_instances().len(), 2);
        assert_eq!(
            descriptor.fetch_effective_value(order, "value"),
            Some(Value::Int(1))
        );
    }
}

mod cycle {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cycle_terminates_and_publishes_consistent_views() {
        // GIVEN Match -> Ping <-> Pong
        let fixture = fixture::cycle().unwrap();
        let composer = Composer::new(&fixture.registry);
        let ping = fixture.id("Ping");
        let pong = fixture.id("Pong");

        // WHEN describing Match
        let descriptor = composer.describe(fixture.id("Match")).unwrap();

        // THEN every kind of the cycle is described exactly once
        assert_eq!(composer.cache().len(), 3);
        let ping_descriptor = composer.describe(ping).unwrap();
        let pong_descriptor = composer.describe(pong).unwrap();
        assert_eq!(
            fixture.names(ping_descriptor.meta_descriptors().keys().copied()),
            vec!["Pong"]
        );
        assert_eq!(
            fixture.names(pong_descriptor.meta_descriptors().keys().copied()),
            vec!["Ping"]
        );

        // AND the deepest Ping instance (the one on Pong) configures Match
        assert_eq!(
            descriptor.fetch_effective_value(ping, "serve"),
            Some(Value::Bool(false))
        );
        assert_eq!(
            descriptor.fetch_effective_value(pong, "score"),
            Some(Value::Int(0))
        );
    }

    #[test]
    fn test_cycle_independent_of_history() {
        // GIVEN one composer that saw the whole cycle first, and a fresh one
        let fixture = fixture::cycle().unwrap();
        let ping = fixture.id("Ping");
        let composer = Composer::new(&fixture.registry);
        composer.describe(fixture.id("Match")).unwrap();
        composer.describe(fixture.id("Pong")).unwrap();

        // WHEN both describe Ping
        let later = composer.describe(ping).unwrap();
        let fresh = Composer::new(&fixture.registry).describe(ping).unwrap();

        // THEN the descriptors are equal
        assert_eq!(*fresh, *later);
    }

    #[test]
    fn test_kind_never_composes_itself() {
        let fixture = fixture::cycle().unwrap();
        let composer = Composer::new(&fixture.registry);
        let ping = fixture.id("Ping");

        let descriptor = composer.describe(ping).unwrap();

        assert!(!descriptor.is_composed_of(ping));
        assert!(descriptor.is_composed_of(fixture.id("Pong")));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_leaves_unrelated_entries_intact() {
        // GIVEN a registry with a valid kind and a kind with a dangling reference
        let mut builder = RegistryBuilder::new();
        builder
            .add_kind("Named")
            .meta()
            .property(PropertyDef::new("name", ValueType::String).with_default(""))
            .done()
            .unwrap();
        builder
            .add_kind("Good")
            .attach(InstanceDef::of("Named"))
            .done()
            .unwrap();
        builder
            .add_kind("Bad")
            .property(PropertyDef::new("name", ValueType::String).references("Named", "name"))
            .done()
            .unwrap();
        let fixture = Fixture::build(builder).unwrap();
        let composer = Composer::new(&fixture.registry);
        let good = composer.describe(fixture.id("Good")).unwrap();

        // WHEN the broken kind is described
        let result = composer.describe(fixture.id("Bad"));

        // THEN it fails, and the earlier descriptor is still served
        assert!(matches!(
            result,
            Err(ComposeError::UnreachableReferenceOwner { .. })
        ));
        assert!(Arc::ptr_eq(
            &good,
            &composer.describe(fixture.id("Good")).unwrap()
        ));
        assert!(!composer.cache().contains(fixture.id("Bad")));
    }

    #[test]
    fn test_error_messages() {
        let error = ComposeError::UnknownReferencedProperty {
            kind: KindId::new(5),
            owner: KindId::new(1),
            property: "name".into(),
        };
        assert_eq!(
            error.to_string(),
            "Reference to meta-property k1#name from k5 cannot be resolved"
        );
        assert_eq!(
            ComposeError::NotAnAttributeKind(KindId::new(2)).to_string(),
            "Not an attribute kind: k2"
        );
    }
}
