use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a property, determining its value shape and token fields.
///
/// The set is closed: every match over a kind is exhaustive, and the factory
/// must know how to build a default value for each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Number,
    Text,
    Bool,
    Color,
    Enum,
    Resource,
    ResourceList,
    Object,
}

impl PropertyKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Number,
        Self::Text,
        Self::Bool,
        Self::Color,
        Self::Enum,
        Self::Resource,
        Self::ResourceList,
        Self::Object,
    ];

    /// String identifier used as the `kind` discriminant in tokens.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Color => "color",
            Self::Enum => "enum",
            Self::Resource => "resource",
            Self::ResourceList => "resource_list",
            Self::Object => "object",
        }
    }

    /// Parse the `kind` discriminant of a token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Whether the value refers to project resources resolved through a
    /// [`ResourceLookup`](crate::resource::ResourceLookup).
    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource | Self::ResourceList)
    }

    /// Whether the value is numeric and honours bounds.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number)
    }

    /// The JSON value type the raw value takes in slim tokens.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text | Self::Enum => "string",
            Self::Bool => "boolean",
            Self::Color => "object",
            Self::Resource => "any",
            Self::ResourceList => "array",
            Self::Object => "any",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips_through_serde() {
        for kind in PropertyKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()), "for {kind:?}");

            let back: PropertyKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
        }
    }

    #[test]
    fn parse_matches_as_str() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PropertyKind::parse("vector3"), None);
    }

    #[test]
    fn resource_classification() {
        assert!(PropertyKind::Resource.is_resource());
        assert!(PropertyKind::ResourceList.is_resource());
        assert!(!PropertyKind::Number.is_resource());
        assert!(!PropertyKind::Object.is_resource());
    }

    #[test]
    fn only_number_is_numeric() {
        let numeric: Vec<_> = PropertyKind::ALL
            .into_iter()
            .filter(PropertyKind::is_numeric)
            .collect();
        assert_eq!(numeric, vec![PropertyKind::Number]);
    }

    #[test]
    fn display_uses_token_name() {
        assert_eq!(PropertyKind::ResourceList.to_string(), "resource_list");
    }
}
