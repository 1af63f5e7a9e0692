//! Wire shapes for items and graphs.
//!
//! Every item token is a JSON object discriminated by `type`. Field names
//! are camelCase to stay compatible with existing graph files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::portal::PortalDirection;

/// Header fields shared by every item token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemHeader {
    /// Positional id, unique within one serialized batch.
    pub id: i64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One portal as stored inside a behaviour token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalToken {
    pub name: String,
    #[serde(rename = "type")]
    pub direction: PortalDirection,
    #[serde(default)]
    pub custom: bool,
    /// Full property token.
    pub property: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviourToken {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub behaviour_type: String,
    #[serde(default)]
    pub portals: Vec<PortalToken>,
    /// Node-level property tokens keyed by name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Value>,
}

/// A behaviour that exposes one property across a graph boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourPortalToken {
    #[serde(flatten)]
    pub behaviour: BehaviourToken,
    pub portal: PortalToken,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutToken {
    #[serde(flatten)]
    pub behaviour: BehaviourToken,
    /// Id of the aliased behaviour in the same batch. `null` when the
    /// original was not part of the serialized subset.
    #[serde(default)]
    pub original_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentToken {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkToken {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(default)]
    pub start_behaviour: Option<i64>,
    #[serde(default)]
    pub start_portal: String,
    #[serde(default)]
    pub end_behaviour: Option<i64>,
    #[serde(default)]
    pub end_portal: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Any serialized canvas item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemToken {
    Behaviour(BehaviourToken),
    Portal(BehaviourPortalToken),
    Shortcut(ShortcutToken),
    Comment(CommentToken),
    Link(LinkToken),
}

impl ItemToken {
    /// Every accepted value of the `type` discriminant.
    pub const TYPES: [&'static str; 5] = ["behaviour", "portal", "shortcut", "comment", "link"];

    #[must_use]
    pub fn header(&self) -> &ItemHeader {
        match self {
            Self::Behaviour(t) => &t.header,
            Self::Portal(t) => &t.behaviour.header,
            Self::Shortcut(t) => &t.behaviour.header,
            Self::Comment(t) => &t.header,
            Self::Link(t) => &t.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut ItemHeader {
        match self {
            Self::Behaviour(t) => &mut t.header,
            Self::Portal(t) => &mut t.behaviour.header,
            Self::Shortcut(t) => &mut t.behaviour.header,
            Self::Comment(t) => &mut t.header,
            Self::Link(t) => &mut t.header,
        }
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.header().id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Behaviour(_) => "behaviour",
            Self::Portal(_) => "portal",
            Self::Shortcut(_) => "shortcut",
            Self::Comment(_) => "comment",
            Self::Link(_) => "link",
        }
    }
}

/// A whole graph: its items plus graph-level properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphToken {
    /// Item tokens kept as raw JSON so one bad item cannot reject the file.
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn behaviour_token_shape() {
        let token = ItemToken::Behaviour(BehaviourToken {
            header: ItemHeader {
                id: 1,
                left: 10.0,
                top: 20.0,
                selected: false,
            },
            alias: "Add".into(),
            behaviour_type: "Math.Add".into(),
            portals: vec![],
            properties: IndexMap::new(),
        });
        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            json!({
                "type": "behaviour",
                "id": 1,
                "left": 10.0,
                "top": 20.0,
                "alias": "Add",
                "behaviourType": "Math.Add",
                "portals": [],
            })
        );
    }

    #[test]
    fn shortcut_parses_nested_flatten() {
        let token: ItemToken = serde_json::from_value(json!({
            "type": "shortcut",
            "id": 4,
            "left": 1,
            "top": 2,
            "selected": true,
            "alias": "Add",
            "behaviourType": "Math.Add",
            "originalId": 2,
        }))
        .unwrap();

        let ItemToken::Shortcut(shortcut) = &token else {
            panic!("expected shortcut, got {token:?}");
        };
        assert_eq!(shortcut.original_id, Some(2));
        assert_eq!(token.header().left, 1.0);
        assert!(token.header().selected);
        assert_eq!(token.type_name(), "shortcut");
    }

    #[test]
    fn link_token_uses_camel_case_endpoints() {
        let token: ItemToken = serde_json::from_value(json!({
            "type": "link",
            "id": 3,
            "startBehaviour": 1,
            "startPortal": "Result",
            "endBehaviour": 2,
            "endPortal": "A",
        }))
        .unwrap();
        let ItemToken::Link(link) = token else {
            panic!("expected link");
        };
        assert_eq!(link.start_behaviour, Some(1));
        assert_eq!(link.end_portal, "A");
        assert_eq!(link.width, 0.0);
    }

    #[test]
    fn unknown_type_does_not_parse() {
        let result = serde_json::from_value::<ItemToken>(json!({ "type": "script", "id": 1 }));
        assert!(result.is_err());
        assert!(!ItemToken::TYPES.contains(&"script"));
    }

    #[test]
    fn graph_token_defaults() {
        let graph: GraphToken = serde_json::from_value(json!({})).unwrap();
        assert!(graph.items.is_empty());
        assert!(graph.properties.is_empty());
    }
}
