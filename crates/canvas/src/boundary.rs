use serde_json::Value;
use weave_property::factory::PropertyFactory;
use weave_property::property::Property;
use weave_property::set::PropertySet;

use crate::behaviour::Behaviour;
use crate::error::CanvasError;
use crate::portal::{Portal, PortalDirection};
use crate::token::{BehaviourPortalToken, ItemHeader, PortalToken};

/// Behaviour type given to boundary nodes.
pub const BEHAVIOUR_PORTAL_TYPE: &str = "Portal";

/// A node that exposes one property across the graph boundary.
///
/// A boundary of direction `D` carries exactly one internal portal of
/// direction `D.complement()`: an exposed input feeds the graph through an
/// output inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviourPortal {
    behaviour: Behaviour,
    portal_type: PortalDirection,
}

impl BehaviourPortal {
    /// Placeholder filled by [`load_token`](Self::load_token). It has no
    /// internal portal until then.
    pub(crate) fn unloaded() -> Self {
        Self {
            behaviour: Behaviour::new("", BEHAVIOUR_PORTAL_TYPE),
            portal_type: PortalDirection::Input,
        }
    }

    #[must_use]
    pub fn new(portal_type: PortalDirection, property: Property) -> Self {
        let mut behaviour = Behaviour::new(property.name(), BEHAVIOUR_PORTAL_TYPE);
        behaviour.add_portal(portal_type.complement(), property);
        Self {
            behaviour,
            portal_type,
        }
    }

    #[must_use]
    pub fn portal_type(&self) -> PortalDirection {
        self.portal_type
    }

    #[must_use]
    pub fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }

    pub(crate) fn behaviour_mut(&mut self) -> &mut Behaviour {
        &mut self.behaviour
    }

    /// Rename the node. The exposed property keeps its name.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.behaviour.alias = alias.into();
    }

    /// Node-level properties. The internal portal is not reachable here.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        self.behaviour.properties_mut()
    }

    /// Set the exposed property's value, returning the previous one.
    /// `Ok(None)` only for an unloaded boundary.
    pub fn update_value(&mut self, raw: &Value) -> Result<Option<Value>, CanvasError> {
        let Some(portal) = self.behaviour.portals_mut().next() else {
            return Ok(None);
        };
        Ok(Some(portal.property.set_raw(raw)?))
    }

    /// The single portal inside the graph.
    #[must_use]
    pub fn internal_portal(&self) -> Option<&Portal> {
        self.behaviour.portals().first()
    }

    /// The exposed property.
    #[must_use]
    pub fn property(&self) -> Option<&Property> {
        self.internal_portal().map(|p| &p.property)
    }

    #[must_use]
    pub fn to_token(&self, header: ItemHeader) -> BehaviourPortalToken {
        let portal = match self.property() {
            Some(property) => PortalToken {
                name: property.name().to_owned(),
                direction: self.portal_type,
                custom: true,
                property: property.tokenize(false),
            },
            None => PortalToken {
                name: self.behaviour.alias.clone(),
                direction: self.portal_type,
                custom: true,
                property: Value::Null,
            },
        };
        BehaviourPortalToken {
            behaviour: self.behaviour.to_token(header),
            portal,
        }
    }

    /// Rebuild from a token.
    ///
    /// The exposed property comes from the `portal` field and the internal
    /// portal is re-derived from it, whatever the `portals` list says.
    pub fn load_token(
        &mut self,
        token: &BehaviourPortalToken,
        factory: &dyn PropertyFactory,
    ) -> Result<(), CanvasError> {
        let property = factory.detokenize(&token.portal.property)?;
        let portal_type = token.portal.direction;

        let mut rebuilt = token.behaviour.clone();
        rebuilt.portals.clear();
        self.behaviour.load_token(&rebuilt, factory)?;
        self.behaviour.add_portal(portal_type.complement(), property);
        self.portal_type = portal_type;
        Ok(())
    }
}
