//! Property tests: any behaviour survives a store serialize/deserialize cycle.

use proptest::prelude::*;
use serde_json::{Value, json};
use weave_canvas::prelude::*;

/// Multiples of 1/8 stay exact through JSON in both integer and float form.
fn arb_number() -> impl Strategy<Value = f64> {
    (-8000i32..8000).prop_map(|n| f64::from(n) / 8.0)
}

fn arb_number_value() -> impl Strategy<Value = PropertyValue> {
    (
        prop::array::uniform3(arb_number()),
        any::<bool>(),
        proptest::option::of(1u32..6),
        proptest::option::of(arb_number()),
    )
        .prop_map(|(mut n, bounded, decimals, interval)| {
            n.sort_by(f64::total_cmp);
            PropertyValue::Number {
                value: n[1],
                min: bounded.then_some(n[0]),
                max: bounded.then_some(n[2]),
                decimals,
                interval,
            }
        })
}

fn arb_resource_ref() -> impl Strategy<Value = ResourceRef> {
    ("[a-z0-9-]{1,8}", proptest::option::of("[A-Za-z ]{1,10}")).prop_map(|(id, name)| {
        let reference = ResourceRef::new(id);
        match name {
            Some(name) => reference.with_name(name),
            None => reference,
        }
    })
}

fn arb_object() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        ("[a-z]{1,6}", "\\PC{0,12}")
            .prop_map(|(k, v)| Value::Object(std::iter::once((k, Value::String(v))).collect())),
        prop::collection::vec(-50i64..50, 0..4).prop_map(|v| json!(v)),
    ]
}

/// One value of every property kind.
fn arb_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        arb_number_value(),
        "\\PC{0,16}".prop_map(|value| PropertyValue::Text { value }),
        any::<bool>().prop_map(|value| PropertyValue::Bool { value }),
        (0u32..=0x00FF_FFFF, 0u8..=8).prop_map(|(color, eighths)| PropertyValue::Color {
            value: Color::new(color, f64::from(eighths) / 8.0),
        }),
        (prop::collection::vec("[a-z]{1,6}", 1..4), any::<prop::sample::Index>()).prop_map(
            |(choices, pick)| PropertyValue::Enum {
                value: pick.get(&choices).clone(),
                choices,
            }
        ),
        (
            proptest::option::of(arb_resource_ref()),
            proptest::option::of("[a-z]{1,8}")
        )
            .prop_map(|(value, class_name)| PropertyValue::Resource { value, class_name }),
        (
            prop::collection::vec(arb_resource_ref(), 0..4),
            proptest::option::of("[a-z]{1,8}")
        )
            .prop_map(|(value, class_name)| PropertyValue::ResourceList { value, class_name }),
        arb_object().prop_map(|value| PropertyValue::Object { value }),
    ]
}

fn arb_property_parts() -> impl Strategy<Value = (PropertyValue, Option<String>)> {
    (arb_value(), proptest::option::of("[A-Z][a-z]{0,6}"))
}

fn build_property(name: &str, value: PropertyValue, category: Option<String>) -> Property {
    let property = Property::new(name, value);
    match category {
        Some(category) => property.with_category(category),
        None => property,
    }
}

fn arb_behaviour() -> impl Strategy<Value = Behaviour> {
    (
        "[A-Za-z ]{0,12}",
        "[A-Z][a-z]{0,5}(\\.[A-Z][a-z]{0,5})?",
        prop::collection::btree_map(
            "[a-z]{1,6}",
            (
                prop::sample::select(PortalDirection::ALL.to_vec()),
                any::<bool>(),
                arb_property_parts(),
            ),
            0..8,
        ),
        prop::collection::btree_map("[A-Z]{1,4}", arb_property_parts(), 0..4),
    )
        .prop_map(|(alias, behaviour_type, portals, properties)| {
            let mut behaviour = Behaviour::new(alias, behaviour_type);
            for (name, (direction, custom, (value, category))) in portals {
                behaviour
                    .add_portal(direction, build_property(&name, value, category))
                    .custom = custom;
            }
            for (name, (value, category)) in properties {
                behaviour
                    .properties_mut()
                    .add(build_property(&name, value, category))
                    .unwrap();
            }
            behaviour
        })
}

fn portal_shape(behaviour: &Behaviour) -> Vec<(PortalDirection, bool, Property)> {
    behaviour
        .portals()
        .iter()
        .map(|p| (p.direction(), p.custom, p.property.clone()))
        .collect()
}

fn reload(behaviour: Behaviour) -> (Behaviour, Vec<Value>) {
    let mut store = Store::new();
    store.add_item(CanvasItem::behaviour(behaviour));
    let tokens = store.serialize().unwrap();

    let mut loaded = Store::new();
    let report = loaded.deserialize_batch(&tokens);
    assert!(report.is_clean(), "{:?}", report.failures);
    let reloaded = loaded
        .item(report.items[0])
        .unwrap()
        .as_behaviour()
        .unwrap()
        .clone();
    (reloaded, tokens)
}

proptest! {
    #[test]
    fn behaviour_keeps_alias_and_portals(behaviour in arb_behaviour()) {
        let (reloaded, _) = reload(behaviour.clone());

        prop_assert_eq!(&reloaded.alias, &behaviour.alias);
        prop_assert_eq!(&reloaded.behaviour_type, &behaviour.behaviour_type);
        prop_assert_eq!(portal_shape(&reloaded), portal_shape(&behaviour));
        prop_assert_eq!(
            reloaded.properties().iter().cloned().collect::<Vec<_>>(),
            behaviour.properties().iter().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn reserialization_is_stable(behaviour in arb_behaviour()) {
        let (reloaded, first) = reload(behaviour);
        let (_, second) = reload(reloaded);
        prop_assert_eq!(second, first);
    }

    #[test]
    fn boundary_keeps_one_internal_portal(
        direction in prop::sample::select(PortalDirection::ALL.to_vec()),
        (value, category) in arb_property_parts(),
    ) {
        let property = build_property("exposed", value, category);
        let mut store = Store::new();
        store.add_item(CanvasItem::boundary(BehaviourPortal::new(direction, property.clone())));
        let tokens = store.serialize().unwrap();

        let mut loaded = Store::new();
        let report = loaded.deserialize_batch(&tokens);
        prop_assert!(report.is_clean());
        let boundary = loaded.item(report.items[0]).unwrap().as_boundary().unwrap();
        prop_assert_eq!(boundary.behaviour().portals().len(), 1);
        prop_assert_eq!(boundary.internal_portal().unwrap().direction(), direction.complement());
        prop_assert_eq!(boundary.property().unwrap(), &property);
    }
}
