use serde_json::Value;

use crate::error::PropertyError;
use crate::kind::PropertyKind;
use crate::property::Property;
use crate::value::PropertyValue;

/// Builds empty properties of a given kind.
///
/// Detokenization goes through a factory so hosts can register richer
/// defaults (or reject kinds they do not support) before the token is
/// applied.
pub trait PropertyFactory {
    /// Create a property of `kind` named `name`, holding a default value.
    fn create_property(&self, name: &str, kind: PropertyKind) -> Property;

    /// Rebuild a property from a full token.
    ///
    /// Reads `name` and `kind`, asks [`create_property`](Self::create_property)
    /// for a blank instance and loads the token into it.
    fn detokenize(&self, token: &Value) -> Result<Property, PropertyError> {
        let name = token
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PropertyError::MalformedToken {
                name: String::new(),
                reason: "missing `name`".into(),
            })?;
        let kind_str = token
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| PropertyError::MalformedToken {
                name: name.to_owned(),
                reason: "missing `kind`".into(),
            })?;
        let kind = PropertyKind::parse(kind_str).ok_or_else(|| PropertyError::MalformedToken {
            name: name.to_owned(),
            reason: format!("unknown kind `{kind_str}`"),
        })?;

        let mut property = self.create_property(name, kind);
        property.de_tokenize(token)?;
        Ok(property)
    }
}

/// Factory producing [`PropertyValue::default_for`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyFactory;

impl PropertyFactory for DefaultPropertyFactory {
    fn create_property(&self, name: &str, kind: PropertyKind) -> Property {
        Property::new(name, PropertyValue::default_for(kind))
    }
}
