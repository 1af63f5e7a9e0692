use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use weave_core::ItemKey;
use weave_property::prelude::*;

fn populated() -> PropertySet {
    let mut set = PropertySet::owned_by(ItemKey::v4());
    set.add(Property::number("A", 1.0).with_range(0.0, 10.0)).unwrap();
    set.add(Property::color("tint", Color::new(0x336699, 0.5))).unwrap();
    set.add(Property::enumeration("easing", "linear", ["linear", "ease"]))
        .unwrap();
    set.add(Property::resource("mesh", Some(ResourceRef::new("m-1"))))
        .unwrap();
    set
}

// ---------------------------------------------------------------------------
// 1. Name uniqueness
// ---------------------------------------------------------------------------

#[rstest]
#[case::number(Property::number("A", 5.0))]
#[case::text(Property::text("tint", "red"))]
#[case::bool(Property::boolean("easing", false))]
#[case::resource_list(Property::resource_list("mesh", vec![]))]
fn duplicate_name_of_any_kind_is_rejected(#[case] duplicate: Property) {
    let mut set = populated();
    let before = set.clone();

    let err = set.add(duplicate).unwrap_err();

    assert_eq!(err.code(), "PROP_DUPLICATE_NAME");
    assert_eq!(set, before);
}

#[test]
fn names_keep_insertion_order() {
    let set = populated();
    assert_eq!(
        set.names().collect::<Vec<_>>(),
        vec!["A", "tint", "easing", "mesh"]
    );
}

// ---------------------------------------------------------------------------
// 2. Token contract
// ---------------------------------------------------------------------------

#[test]
fn color_token_value_is_color_alpha_pair() {
    let tokens = populated().tokenize(false);
    assert_eq!(
        tokens["tint"],
        json!({
            "name": "tint",
            "kind": "color",
            "value": { "color": 0x336699, "alpha": 0.5 },
        })
    );
}

#[test]
fn enum_token_lists_choices() {
    let tokens = populated().tokenize(false);
    assert_eq!(tokens["easing"]["choices"], json!(["linear", "ease"]));
}

#[test]
fn full_tokens_rebuild_an_equal_set() {
    let original = populated();
    let mut rebuilt = PropertySet::owned_by(original.owner().unwrap());
    rebuilt
        .de_tokenize(&original.tokenize(false), &DefaultPropertyFactory)
        .unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn slim_tokens_hold_only_values() {
    let slim = populated().tokenize(true);
    assert_eq!(slim["A"], json!(1));
    assert_eq!(slim["easing"], json!("linear"));
    assert_eq!(slim["mesh"], json!({ "id": "m-1" }));
}

// ---------------------------------------------------------------------------
// 3. Edits
// ---------------------------------------------------------------------------

#[test]
fn edits_clamp_to_bounds() {
    let mut set = populated();
    set.update_value("A", &json!(11)).unwrap();
    assert_eq!(set.get("A").unwrap().raw(), json!(10));
}

#[test]
fn edits_of_cloned_set_do_not_leak() {
    let original = populated();
    let mut copy = original.clone();
    copy.update_value("easing", &json!("ease")).unwrap();

    assert_eq!(original.get("easing").unwrap().raw(), json!("linear"));
    assert_eq!(copy.get("easing").unwrap().raw(), json!("ease"));
}
