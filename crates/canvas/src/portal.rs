use std::fmt;

use serde::{Deserialize, Serialize};
use weave_core::ItemKey;
use weave_property::property::Property;

use crate::token::PortalToken;

/// Which way data flows through a portal.
///
/// Inputs and parameters receive links; outputs and products emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalDirection {
    Input,
    Output,
    Parameter,
    Product,
}

impl PortalDirection {
    pub const ALL: [Self; 4] = [Self::Input, Self::Output, Self::Parameter, Self::Product];

    /// The direction seen from the other side of a boundary.
    ///
    /// `input <-> output`, `parameter <-> product`. Applying it twice yields
    /// the original direction.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
            Self::Parameter => Self::Product,
            Self::Product => Self::Parameter,
        }
    }

    /// Whether a link may start here.
    #[must_use]
    pub fn is_source(self) -> bool {
        matches!(self, Self::Output | Self::Product)
    }

    /// Whether a link may end here.
    #[must_use]
    pub fn is_target(self) -> bool {
        matches!(self, Self::Input | Self::Parameter)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Parameter => "parameter",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for PortalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed connection point on a behaviour.
///
/// Wraps exactly one [`Property`]; the portal's name is the property's name.
/// The owner and link lists are plain keys, so a portal never keeps its
/// behaviour or its links alive.
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    direction: PortalDirection,
    pub property: Property,
    /// Added by the user rather than by the behaviour template.
    pub custom: bool,
    owner: Option<ItemKey>,
    links: Vec<ItemKey>,
}

impl Portal {
    #[must_use]
    pub fn new(direction: PortalDirection, property: Property) -> Self {
        Self {
            direction,
            property,
            custom: false,
            owner: None,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    #[must_use]
    pub fn direction(&self) -> PortalDirection {
        self.direction
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.property.name()
    }

    /// The behaviour this portal belongs to, once added to one.
    #[must_use]
    pub fn owner(&self) -> Option<ItemKey> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ItemKey>) {
        self.owner = owner;
    }

    /// Links currently attached to this portal.
    #[must_use]
    pub fn links(&self) -> &[ItemKey] {
        &self.links
    }

    /// A portal with at least one attached link renders as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.links.is_empty()
    }

    pub(crate) fn attach_link(&mut self, link: ItemKey) {
        if !self.links.contains(&link) {
            self.links.push(link);
        }
    }

    pub(crate) fn detach_link(&mut self, link: ItemKey) -> bool {
        let before = self.links.len();
        self.links.retain(|k| *k != link);
        before != self.links.len()
    }

    /// Release the owner handle and forget attached links.
    pub fn dispose(&mut self) {
        self.owner = None;
        self.links.clear();
    }

    #[must_use]
    pub fn to_token(&self) -> PortalToken {
        PortalToken {
            name: self.name().to_owned(),
            direction: self.direction,
            custom: self.custom,
            property: self.property.tokenize(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(PortalDirection::Input, PortalDirection::Output)]
    #[case(PortalDirection::Output, PortalDirection::Input)]
    #[case(PortalDirection::Parameter, PortalDirection::Product)]
    #[case(PortalDirection::Product, PortalDirection::Parameter)]
    fn complement_pairs(#[case] direction: PortalDirection, #[case] expected: PortalDirection) {
        assert_eq!(direction.complement(), expected);
        assert_eq!(direction.complement().complement(), direction);
    }

    #[test]
    fn sources_and_targets_partition_directions() {
        for direction in PortalDirection::ALL {
            assert_ne!(direction.is_source(), direction.is_target(), "{direction}");
            assert_eq!(direction.complement().is_source(), direction.is_target());
        }
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PortalDirection::Parameter).unwrap(),
            json!("parameter")
        );
    }

    #[test]
    fn links_are_unique_and_drive_active_state() {
        let mut portal = Portal::new(PortalDirection::Output, Property::number("out", 0.0));
        let link = ItemKey::v4();
        assert!(!portal.is_active());

        portal.attach_link(link);
        portal.attach_link(link);
        assert_eq!(portal.links(), &[link]);
        assert!(portal.is_active());

        assert!(portal.detach_link(link));
        assert!(!portal.detach_link(link));
        assert!(!portal.is_active());
    }

    #[test]
    fn dispose_clears_handles() {
        let mut portal = Portal::new(PortalDirection::Input, Property::boolean("on", true));
        portal.set_owner(Some(ItemKey::v4()));
        portal.attach_link(ItemKey::v4());
        portal.dispose();
        assert!(portal.owner().is_none());
        assert!(portal.links().is_empty());
    }

    #[test]
    fn token_embeds_full_property() {
        let portal = Portal::new(
            PortalDirection::Parameter,
            Property::number("A", 1.0).with_range(0.0, 10.0),
        )
        .with_custom(true);
        assert_eq!(
            serde_json::to_value(portal.to_token()).unwrap(),
            json!({
                "name": "A",
                "type": "parameter",
                "custom": true,
                "property": { "name": "A", "kind": "number", "value": 1, "min": 0, "max": 10 },
            })
        );
    }
}
