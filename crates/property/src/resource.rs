//! References from property values to project resources.
//!
//! A resource property stores only an identifier. The live resource is
//! looked up on demand through a [`ResourceLookup`] supplied by the host,
//! so a graph can be deserialized before its project resources are loaded.

use serde::{Deserialize, Serialize};

/// A reference to a project resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Project-scoped resource identifier.
    pub id: String,

    /// Last known display name, kept so broken references still render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResourceRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolve this reference through the host's lookup.
    ///
    /// Returns `None` when the resource no longer exists.
    #[must_use]
    pub fn resolve(&self, lookup: &dyn ResourceLookup) -> Option<ResourceInfo> {
        lookup.resolve(&self.id)
    }
}

/// What the host knows about a live resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    pub id: String,
    pub name: String,
    /// Resource class, e.g. `"texture"` or `"script"`.
    pub class_name: String,
}

/// Resolves resource identifiers to live project resources.
pub trait ResourceLookup {
    fn resolve(&self, id: &str) -> Option<ResourceInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapLookup(HashMap<String, ResourceInfo>);

    impl ResourceLookup for MapLookup {
        fn resolve(&self, id: &str) -> Option<ResourceInfo> {
            self.0.get(id).cloned()
        }
    }

    fn lookup() -> MapLookup {
        let info = ResourceInfo {
            id: "tex-1".into(),
            name: "grass".into(),
            class_name: "texture".into(),
        };
        MapLookup(HashMap::from([(info.id.clone(), info)]))
    }

    #[test]
    fn resolve_known_resource() {
        let info = ResourceRef::new("tex-1").resolve(&lookup()).unwrap();
        assert_eq!(info.name, "grass");
        assert_eq!(info.class_name, "texture");
    }

    #[test]
    fn resolve_missing_resource_is_none() {
        assert!(ResourceRef::new("gone").resolve(&lookup()).is_none());
    }

    #[test]
    fn name_is_omitted_when_unset() {
        let json = serde_json::to_value(ResourceRef::new("a")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "a" }));

        let json = serde_json::to_value(ResourceRef::new("a").with_name("Alpha")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "a", "name": "Alpha" }));
    }
}
