use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::kind::PropertyKind;
use crate::resource::ResourceRef;

/// Decimal places beyond what an `f64` can represent are ignored.
pub const MAX_DECIMALS: u32 = 15;

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// An RGB color plus opacity, as stored in color properties.
///
/// Deserialization goes through [`Color::new`], so out-of-range input is
/// masked and clamped like any other construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorFields")]
pub struct Color {
    /// Packed `0xRRGGBB`.
    pub color: u32,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub fn new(color: u32, alpha: f64) -> Self {
        Self {
            color: color & 0x00FF_FFFF,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Parse `#rrggbb` or `rrggbb`. Alpha is set to `1.0`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .map(|color| Self::new(color, 1.0))
    }

    /// Format as `#rrggbb`, ignoring alpha.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0xFFFFFF, 1.0)
    }
}

#[derive(Deserialize)]
struct ColorFields {
    color: u32,
    alpha: f64,
}

impl From<ColorFields> for Color {
    fn from(fields: ColorFields) -> Self {
        Self::new(fields.color, fields.alpha)
    }
}

/// Whole numbers are written as JSON integers, everything else as floats.
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn write_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

fn write_optional_number<S: Serializer>(n: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match n {
        Some(n) => write_number(n, serializer),
        None => serializer.serialize_none(),
    }
}

/// The kind-specific payload of a property.
///
/// Serialized with a `kind` tag so that a full property token carries enough
/// information to rebuild the right variant without external schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyValue {
    Number {
        #[serde(serialize_with = "write_number")]
        value: f64,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "write_optional_number"
        )]
        min: Option<f64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "write_optional_number"
        )]
        max: Option<f64>,
        /// Decimal places kept when the value is edited, up to
        /// [`MAX_DECIMALS`].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimals: Option<u32>,
        /// Step used by UI spinners.
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "write_optional_number"
        )]
        interval: Option<f64>,
    },
    Text {
        #[serde(default)]
        value: String,
    },
    Bool {
        #[serde(default)]
        value: bool,
    },
    Color {
        #[serde(default)]
        value: Color,
    },
    Enum {
        #[serde(default)]
        value: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
    Resource {
        #[serde(default)]
        value: Option<ResourceRef>,
        #[serde(
            default,
            rename = "className",
            skip_serializing_if = "Option::is_none"
        )]
        class_name: Option<String>,
    },
    ResourceList {
        #[serde(default)]
        value: Vec<ResourceRef>,
        #[serde(
            default,
            rename = "className",
            skip_serializing_if = "Option::is_none"
        )]
        class_name: Option<String>,
    },
    Object {
        #[serde(default)]
        value: Value,
    },
}

impl PropertyValue {
    /// A fresh value of the given kind, as the default factory builds it.
    #[must_use]
    pub fn default_for(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Number => Self::Number {
                value: 0.0,
                min: None,
                max: None,
                decimals: None,
                interval: None,
            },
            PropertyKind::Text => Self::Text {
                value: String::new(),
            },
            PropertyKind::Bool => Self::Bool { value: false },
            PropertyKind::Color => Self::Color {
                value: Color::default(),
            },
            PropertyKind::Enum => Self::Enum {
                value: String::new(),
                choices: Vec::new(),
            },
            PropertyKind::Resource => Self::Resource {
                value: None,
                class_name: None,
            },
            PropertyKind::ResourceList => Self::ResourceList {
                value: Vec::new(),
                class_name: None,
            },
            PropertyKind::Object => Self::Object { value: Value::Null },
        }
    }

    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Number { .. } => PropertyKind::Number,
            Self::Text { .. } => PropertyKind::Text,
            Self::Bool { .. } => PropertyKind::Bool,
            Self::Color { .. } => PropertyKind::Color,
            Self::Enum { .. } => PropertyKind::Enum,
            Self::Resource { .. } => PropertyKind::Resource,
            Self::ResourceList { .. } => PropertyKind::ResourceList,
            Self::Object { .. } => PropertyKind::Object,
        }
    }

    /// The bare value, without descriptor fields. This is the slim token.
    #[must_use]
    pub fn raw(&self) -> Value {
        match self {
            Self::Number { value, .. } => number_to_json(*value),
            Self::Text { value } | Self::Enum { value, .. } => Value::from(value.as_str()),
            Self::Bool { value } => Value::Bool(*value),
            Self::Color { value } => serde_json::json!({
                "color": value.color,
                "alpha": value.alpha,
            }),
            Self::Resource { value, .. } => match value {
                Some(reference) => serde_json::to_value(reference).unwrap_or(Value::Null),
                None => Value::Null,
            },
            Self::ResourceList { value, .. } => Value::Array(
                value
                    .iter()
                    .filter_map(|r| serde_json::to_value(r).ok())
                    .collect(),
            ),
            Self::Object { value } => value.clone(),
        }
    }

    /// Replace the bare value, keeping descriptor fields (bounds, choices,
    /// class names) intact.
    ///
    /// Numbers are clamped into `[min, max]` and rounded to `decimals`.
    pub(crate) fn apply_raw(&mut self, raw: &Value) -> Result<(), String> {
        match self {
            Self::Number {
                value,
                min,
                max,
                decimals,
                ..
            } => {
                let mut next = raw
                    .as_f64()
                    .ok_or_else(|| format!("expected a number, got {raw}"))?;
                if let Some(min) = *min {
                    next = next.max(min);
                }
                if let Some(max) = *max {
                    next = next.min(max);
                }
                if let Some(places) = *decimals {
                    let scale = 10f64.powi(places.min(MAX_DECIMALS) as i32);
                    let rounded = (next * scale).round() / scale;
                    if rounded.is_finite() {
                        next = rounded;
                    }
                }
                *value = next;
            }
            Self::Text { value } => {
                *value = raw
                    .as_str()
                    .ok_or_else(|| format!("expected a string, got {raw}"))?
                    .to_owned();
            }
            Self::Bool { value } => {
                *value = raw
                    .as_bool()
                    .ok_or_else(|| format!("expected a boolean, got {raw}"))?;
            }
            Self::Color { value } => {
                *value = Color::deserialize(raw)
                    .map_err(|e| format!("expected {{color, alpha}}: {e}"))?;
            }
            Self::Enum { value, choices } => {
                let next = raw
                    .as_str()
                    .ok_or_else(|| format!("expected a string, got {raw}"))?;
                if !choices.is_empty() && !choices.iter().any(|c| c == next) {
                    return Err(format!("`{next}` is not one of {choices:?}"));
                }
                *value = next.to_owned();
            }
            Self::Resource { value, .. } => {
                *value = Option::<ResourceRef>::deserialize(raw)
                    .map_err(|e| format!("expected a resource reference: {e}"))?;
            }
            Self::ResourceList { value, .. } => {
                *value = Vec::<ResourceRef>::deserialize(raw)
                    .map_err(|e| format!("expected a list of resource references: {e}"))?;
            }
            Self::Object { value } => {
                *value = raw.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bounded(value: f64) -> PropertyValue {
        PropertyValue::Number {
            value,
            min: Some(0.0),
            max: Some(10.0),
            decimals: Some(1),
            interval: None,
        }
    }

    #[test]
    fn default_for_matches_kind() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyValue::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn color_hex_round_trip() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c.color, 0xFF8800);
        assert_eq!(c.to_hex(), "#ff8800");
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn color_new_clamps_alpha() {
        assert_eq!(Color::new(0x123456, 3.0).alpha, 1.0);
        assert_eq!(Color::new(0x123456, -1.0).alpha, 0.0);
    }

    #[test]
    fn number_apply_raw_clamps_and_rounds() {
        let mut v = bounded(1.0);
        v.apply_raw(&json!(42)).unwrap();
        assert_eq!(v.raw(), json!(10));

        v.apply_raw(&json!(-3)).unwrap();
        assert_eq!(v.raw(), json!(0));

        v.apply_raw(&json!(2.46)).unwrap();
        assert_eq!(v.raw(), json!(2.5));
    }

    #[test]
    fn apply_raw_rejects_wrong_shape() {
        let mut v = bounded(1.0);
        assert!(v.apply_raw(&json!("ten")).is_err());
        assert_eq!(v.raw(), json!(1));

        let mut b = PropertyValue::default_for(PropertyKind::Bool);
        assert!(b.apply_raw(&json!(1)).is_err());
    }

    #[test]
    fn enum_apply_raw_checks_choices() {
        let mut v = PropertyValue::Enum {
            value: "linear".into(),
            choices: vec!["linear".into(), "ease".into()],
        };
        v.apply_raw(&json!("ease")).unwrap();
        assert_eq!(v.raw(), json!("ease"));
        assert!(v.apply_raw(&json!("bounce")).is_err());
        assert_eq!(v.raw(), json!("ease"));
    }

    #[test]
    fn resource_raw_is_reference_or_null() {
        let mut v = PropertyValue::default_for(PropertyKind::Resource);
        assert_eq!(v.raw(), Value::Null);
        v.apply_raw(&json!({ "id": "tex-1" })).unwrap();
        assert_eq!(v.raw(), json!({ "id": "tex-1" }));
    }

    #[test]
    fn number_token_omits_unset_bounds() {
        let json = serde_json::to_value(PropertyValue::default_for(PropertyKind::Number)).unwrap();
        assert_eq!(json, json!({ "kind": "number", "value": 0 }));
    }

    #[test]
    fn whole_numbers_are_written_as_integers() {
        let json = serde_json::to_value(PropertyValue::Number {
            value: 1.0,
            min: Some(0.0),
            max: Some(10.0),
            decimals: None,
            interval: Some(0.5),
        })
        .unwrap();
        assert_eq!(
            json,
            json!({ "kind": "number", "value": 1, "min": 0, "max": 10, "interval": 0.5 })
        );
        assert_eq!(number_to_json(-2.0), json!(-2));
        assert_eq!(number_to_json(2.25), json!(2.25));
        assert_eq!(number_to_json(1e300), json!(1e300));
    }

    #[test]
    fn huge_decimals_keep_value_finite() {
        let mut v = PropertyValue::Number {
            value: 1.0,
            min: None,
            max: None,
            decimals: Some(400),
            interval: None,
        };
        v.apply_raw(&json!(2.125)).unwrap();
        assert_eq!(v.raw(), json!(2.125));

        v.apply_raw(&json!(1e300)).unwrap();
        assert_eq!(v.raw(), json!(1e300));
    }

    #[test]
    fn wrapping_decimals_do_not_round_to_tens() {
        let mut v = PropertyValue::Number {
            value: 0.0,
            min: None,
            max: None,
            decimals: Some(u32::MAX),
            interval: None,
        };
        v.apply_raw(&json!(17.5)).unwrap();
        assert_eq!(v.raw(), json!(17.5));
    }

    #[test]
    fn color_from_token_is_masked_and_clamped() {
        let mut v = PropertyValue::default_for(PropertyKind::Color);
        v.apply_raw(&json!({ "color": 0xFFFF_FFFFu32, "alpha": 5.0 })).unwrap();
        assert_eq!(v.raw(), json!({ "color": 0x00FF_FFFF, "alpha": 1.0 }));

        let color: Color = serde_json::from_value(json!({ "color": 0x0012_3456, "alpha": -2.0 })).unwrap();
        assert_eq!(color, Color::new(0x12_3456, 0.0));
    }
}
