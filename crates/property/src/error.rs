use crate::kind::PropertyKind;

/// Error type for property operations.
///
/// Lookups by name never produce an error: a missing name is reported as
/// `None` by the accessor. The variants here are authoring mistakes or
/// malformed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// A property with the given name already exists in the set.
    #[error("property already exists: `{name}`")]
    DuplicateName { name: String },

    /// A token of one kind was applied to a property of another.
    #[error("kind mismatch for `{name}`: expected {expected}, got {found}")]
    KindMismatch {
        name: String,
        expected: PropertyKind,
        found: String,
    },

    /// A raw value does not fit the property's kind or constraints.
    #[error("invalid value for `{name}`: {reason}")]
    InvalidValue { name: String, reason: String },

    /// A token could not be parsed at all.
    #[error("malformed property token `{name}`: {reason}")]
    MalformedToken { name: String, reason: String },
}

impl PropertyError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "PROP_DUPLICATE_NAME",
            Self::KindMismatch { .. } => "PROP_KIND_MISMATCH",
            Self::InvalidValue { .. } => "PROP_INVALID_VALUE",
            Self::MalformedToken { .. } => "PROP_MALFORMED_TOKEN",
        }
    }

    /// The property name the error is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::DuplicateName { name }
            | Self::KindMismatch { name, .. }
            | Self::InvalidValue { name, .. }
            | Self::MalformedToken { name, .. } => name,
        }
    }
}
