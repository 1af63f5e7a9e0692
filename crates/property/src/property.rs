use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PropertyError;
use crate::kind::PropertyKind;
use crate::resource::ResourceRef;
use crate::value::{Color, PropertyValue};

/// A named, typed value cell.
///
/// The full token is this struct serialized as-is: `name`, optional
/// `category` and `options`, then the flattened [`PropertyValue`] which adds
/// `kind`, `value` and any kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    name: String,

    /// Optional grouping used by property editors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Opaque editor data carried through tokenization untouched.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,

    #[serde(flatten)]
    pub value: PropertyValue,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            category: None,
            options: Value::Null,
            value,
        }
    }

    /// An unbounded number property.
    #[must_use]
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::new(
            name,
            PropertyValue::Number {
                value,
                min: None,
                max: None,
                decimals: None,
                interval: None,
            },
        )
    }

    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyValue::Text {
                value: value.into(),
            },
        )
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, PropertyValue::Bool { value })
    }

    #[must_use]
    pub fn color(name: impl Into<String>, value: Color) -> Self {
        Self::new(name, PropertyValue::Color { value })
    }

    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, value: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            PropertyValue::Enum {
                value: value.into(),
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    #[must_use]
    pub fn resource(name: impl Into<String>, value: Option<ResourceRef>) -> Self {
        Self::new(
            name,
            PropertyValue::Resource {
                value,
                class_name: None,
            },
        )
    }

    #[must_use]
    pub fn resource_list(name: impl Into<String>, value: Vec<ResourceRef>) -> Self {
        Self::new(
            name,
            PropertyValue::ResourceList {
                value,
                class_name: None,
            },
        )
    }

    #[must_use]
    pub fn object(name: impl Into<String>, value: Value) -> Self {
        Self::new(name, PropertyValue::Object { value })
    }

    /// Set numeric bounds. No-op for non-number properties.
    #[must_use]
    pub fn with_range(mut self, lower: f64, upper: f64) -> Self {
        if let PropertyValue::Number { min, max, .. } = &mut self.value {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    /// Set kept decimal places. No-op for non-number properties.
    #[must_use]
    pub fn with_decimals(mut self, places: u32) -> Self {
        if let PropertyValue::Number { decimals, .. } = &mut self.value {
            *decimals = Some(places);
        }
        self
    }

    /// Set the spinner step. No-op for non-number properties.
    #[must_use]
    pub fn with_interval(mut self, step: f64) -> Self {
        if let PropertyValue::Number { interval, .. } = &mut self.value {
            *interval = Some(step);
        }
        self
    }

    /// Restrict resource properties to one resource class.
    #[must_use]
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        if let PropertyValue::Resource { class_name, .. }
        | PropertyValue::ResourceList { class_name, .. } = &mut self.value
        {
            *class_name = Some(class.into());
        }
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    /// The bare value (the slim token).
    #[must_use]
    pub fn raw(&self) -> Value {
        self.value.raw()
    }

    /// Export this property.
    ///
    /// A slim token is just the raw value. A full token carries the whole
    /// descriptor so the property can be rebuilt without schema knowledge.
    #[must_use]
    pub fn tokenize(&self, slim: bool) -> Value {
        if slim {
            return self.raw();
        }
        // Plain data with string keys only; conversion into a `Value` cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Load a full token into this property.
    ///
    /// The token must declare the same `kind`. Category, options and the
    /// value (with its kind-specific fields) are replaced; the name is kept,
    /// since it is the property's identity inside its set.
    pub fn de_tokenize(&mut self, token: &Value) -> Result<(), PropertyError> {
        let found = token
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| PropertyError::MalformedToken {
                name: self.name.clone(),
                reason: "missing `kind`".into(),
            })?;
        if found != self.kind().as_str() {
            return Err(PropertyError::KindMismatch {
                name: self.name.clone(),
                expected: self.kind(),
                found: found.to_owned(),
            });
        }

        let parsed = Self::deserialize(token).map_err(|e| PropertyError::MalformedToken {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.category = parsed.category;
        self.options = parsed.options;
        self.value = parsed.value;
        Ok(())
    }

    /// Replace the raw value, returning the previous one.
    ///
    /// Descriptor fields are kept; numbers are clamped to their bounds.
    pub fn set_raw(&mut self, raw: &Value) -> Result<Value, PropertyError> {
        let previous = self.raw();
        self.value
            .apply_raw(raw)
            .map_err(|reason| PropertyError::InvalidValue {
                name: self.name.clone(),
                reason,
            })?;
        Ok(previous)
    }
}
