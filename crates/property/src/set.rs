use indexmap::IndexMap;
use serde_json::Value;
use weave_core::ItemKey;

use crate::error::PropertyError;
use crate::factory::PropertyFactory;
use crate::kind::PropertyKind;
use crate::property::Property;

/// Notification produced when a value inside a set changes.
///
/// The set does not hold its owner; it hands back the owner handle so the
/// caller can route the edit (typically to invalidate a canvas item).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEdit {
    pub owner: Option<ItemKey>,
    pub name: String,
    pub previous: Value,
}

/// An ordered collection of properties with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    properties: Vec<Property>,
    owner: Option<ItemKey>,
}

impl PropertySet {
    /// Create an empty set without an owner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set owned by `owner`.
    #[must_use]
    pub fn owned_by(owner: ItemKey) -> Self {
        Self {
            properties: Vec::new(),
            owner: Some(owner),
        }
    }

    /// The non-owning handle edits are routed to.
    #[must_use]
    pub fn owner(&self) -> Option<ItemKey> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<ItemKey>) {
        self.owner = owner;
    }

    /// Append a property.
    ///
    /// Fails with [`PropertyError::DuplicateName`] if the name is taken; the
    /// set is left untouched in that case.
    pub fn add(&mut self, property: Property) -> Result<&mut Property, PropertyError> {
        if self.contains(property.name()) {
            return Err(PropertyError::DuplicateName {
                name: property.name().to_owned(),
            });
        }
        self.properties.push(property);
        let last = self.properties.len() - 1;
        Ok(&mut self.properties[last])
    }

    /// Add a property (builder-style, consuming).
    pub fn with(mut self, property: Property) -> Result<Self, PropertyError> {
        self.add(property)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name() == name)
    }

    /// Remove and return a property. `None` if the name is unknown.
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        let idx = self.properties.iter().position(|p| p.name() == name)?;
        Some(self.properties.remove(idx))
    }

    /// Replace the raw value of the named property.
    ///
    /// Returns `Ok(None)` if no property has that name. A value that does
    /// not fit the property's kind is an error and leaves the value as it was.
    pub fn update_value(
        &mut self,
        name: &str,
        raw: &Value,
    ) -> Result<Option<PropertyEdit>, PropertyError> {
        let owner = self.owner;
        let Some(property) = self.get_mut(name) else {
            return Ok(None);
        };
        let previous = property.set_raw(raw)?;
        Ok(Some(PropertyEdit {
            owner,
            name: name.to_owned(),
            previous,
        }))
    }

    /// Export every property keyed by name, in set order.
    #[must_use]
    pub fn tokenize(&self, slim: bool) -> IndexMap<String, Value> {
        self.properties
            .iter()
            .map(|p| (p.name().to_owned(), p.tokenize(slim)))
            .collect()
    }

    /// Replace the contents with properties rebuilt from full tokens.
    ///
    /// Map keys are the property names. On error the previous contents are
    /// kept.
    pub fn de_tokenize(
        &mut self,
        tokens: &IndexMap<String, Value>,
        factory: &dyn PropertyFactory,
    ) -> Result<(), PropertyError> {
        let mut rebuilt = Vec::with_capacity(tokens.len());
        for (name, token) in tokens {
            let kind = token
                .get("kind")
                .and_then(Value::as_str)
                .and_then(PropertyKind::parse)
                .ok_or_else(|| PropertyError::MalformedToken {
                    name: name.clone(),
                    reason: "missing or unknown `kind`".into(),
                })?;
            let mut property = factory.create_property(name, kind);
            property.de_tokenize(token)?;
            rebuilt.push(property);
        }
        self.properties = rebuilt;
        Ok(())
    }

    /// Drop every property.
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over property names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(Property::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties.iter_mut()
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
