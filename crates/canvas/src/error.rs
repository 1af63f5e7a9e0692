//! Canvas-specific error types.

use weave_core::ItemKey;
use weave_property::error::PropertyError;

use crate::portal::PortalDirection;

/// Errors raised while building, editing or (de)serializing a canvas.
///
/// Lookups that simply miss (`Store::item`, `Behaviour::get_portal`) return
/// `None` instead. A shortcut whose original is missing is not an error
/// either: it degrades in place and logs a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The token's `type` discriminant is absent or not a known item type.
    #[error("unknown item type `{item_type}` ({})", id_label(.id))]
    UnknownItemType {
        /// Original id of the token, when it had one.
        id: Option<i64>,
        /// The discriminant as found in the token.
        item_type: String,
    },

    /// The token has a known type but does not parse.
    #[error("malformed item token ({}): {reason}", id_label(.id))]
    MalformedToken {
        /// Original id of the token, when it had one.
        id: Option<i64>,
        /// Parser message.
        reason: String,
    },

    /// A token of one item type was applied to an item of another.
    #[error("cannot load a `{found}` token into a `{expected}` item")]
    TokenMismatch {
        /// Type of the receiving item.
        expected: &'static str,
        /// Type declared by the token.
        found: &'static str,
    },

    /// No item with this key exists in the store.
    #[error("unknown item: {0}")]
    UnknownItem(ItemKey),

    /// The item exists but is not a behaviour.
    #[error("item {0} is not a behaviour")]
    NotABehaviour(ItemKey),

    /// A behaviour has no portal with the given name.
    #[error("behaviour `{behaviour}` has no portal `{portal}`")]
    UnknownPortal {
        /// Alias of the behaviour that was searched.
        behaviour: String,
        /// Requested portal name.
        portal: String,
    },

    /// A link endpoint references an original id outside the batch.
    #[error("link {id} references {} which is not part of the batch", endpoint_label(.missing))]
    DanglingLink {
        /// Original id of the link.
        id: i64,
        /// The endpoint's original id, if the token named one.
        missing: Option<i64>,
    },

    /// A link would start at an input/parameter or end at an output/product.
    #[error("portal `{portal}` is {direction} and cannot be a link {end}")]
    InvalidLinkDirection {
        /// Portal name.
        portal: String,
        /// Its direction.
        direction: PortalDirection,
        /// `"start"` or `"end"`.
        end: &'static str,
    },

    /// Portals of a boundary node are fixed: it always carries exactly one.
    #[error("boundary item {0} has a fixed internal portal")]
    FixedPortal(ItemKey),

    /// Both link endpoints are on the same behaviour.
    #[error("cannot link behaviour {0} to itself")]
    SelfLink(ItemKey),

    /// Property failure while (de)tokenizing portals or node properties.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// JSON conversion failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CanvasError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownItemType { .. } => "CANVAS_UNKNOWN_ITEM_TYPE",
            Self::MalformedToken { .. } => "CANVAS_MALFORMED_TOKEN",
            Self::TokenMismatch { .. } => "CANVAS_TOKEN_MISMATCH",
            Self::UnknownItem(_) => "CANVAS_UNKNOWN_ITEM",
            Self::NotABehaviour(_) => "CANVAS_NOT_A_BEHAVIOUR",
            Self::UnknownPortal { .. } => "CANVAS_UNKNOWN_PORTAL",
            Self::DanglingLink { .. } => "CANVAS_DANGLING_LINK",
            Self::InvalidLinkDirection { .. } => "CANVAS_INVALID_LINK_DIRECTION",
            Self::FixedPortal(_) => "CANVAS_FIXED_PORTAL",
            Self::SelfLink(_) => "CANVAS_SELF_LINK",
            Self::Property(_) => "CANVAS_PROPERTY",
            Self::Json(_) => "CANVAS_JSON",
        }
    }
}

fn id_label(id: &Option<i64>) -> String {
    id.map_or_else(|| "no id".to_owned(), |id| format!("id {id}"))
}

fn endpoint_label(id: &Option<i64>) -> String {
    id.map_or_else(|| "an unnamed item".to_owned(), |id| format!("item {id}"))
}
