//! Property tests for name uniqueness inside a `PropertySet`.

use proptest::prelude::*;
use weave_property::prelude::*;

fn arb_kind() -> impl Strategy<Value = PropertyKind> {
    prop::sample::select(PropertyKind::ALL.to_vec())
}

fn arb_set() -> impl Strategy<Value = PropertySet> {
    prop::collection::btree_map("[a-z]{1,6}", arb_kind(), 1..10).prop_map(|entries| {
        let mut set = PropertySet::new();
        for (name, kind) in entries {
            set.add(DefaultPropertyFactory.create_property(&name, kind))
                .unwrap();
        }
        set
    })
}

proptest! {
    #[test]
    fn duplicate_of_any_kind_leaves_set_unchanged(
        set in arb_set(),
        pick in any::<prop::sample::Index>(),
        kind in arb_kind(),
    ) {
        let names: Vec<String> = set.names().map(str::to_owned).collect();
        let taken = pick.get(&names);
        let mut edited = set.clone();

        let err = edited
            .add(DefaultPropertyFactory.create_property(taken, kind))
            .unwrap_err();

        prop_assert_eq!(err.code(), "PROP_DUPLICATE_NAME");
        prop_assert_eq!(edited, set);
    }

    #[test]
    fn fresh_name_is_appended(set in arb_set(), kind in arb_kind()) {
        let mut edited = set.clone();
        edited.add(DefaultPropertyFactory.create_property("Fresh", kind)).unwrap();

        prop_assert_eq!(edited.len(), set.len() + 1);
        prop_assert_eq!(edited.names().last(), Some("Fresh"));
        prop_assert_eq!(edited.get("Fresh").unwrap().kind(), kind);
    }

    #[test]
    fn tokens_rebuild_an_equal_set(set in arb_set()) {
        let mut rebuilt = PropertySet::new();
        rebuilt.de_tokenize(&set.tokenize(false), &DefaultPropertyFactory).unwrap();
        prop_assert_eq!(rebuilt, set);
    }
}
