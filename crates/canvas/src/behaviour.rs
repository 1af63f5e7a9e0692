use serde_json::Value;
use weave_core::ItemKey;
use weave_property::factory::PropertyFactory;
use weave_property::property::Property;
use weave_property::set::{PropertyEdit, PropertySet};

use crate::error::CanvasError;
use crate::portal::{Portal, PortalDirection};
use crate::token::{BehaviourToken, ItemHeader};

/// A node on the canvas.
///
/// Portals live in a single insertion-ordered list; the per-direction views
/// are filters over it, so they always partition the full list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Behaviour {
    pub alias: String,
    pub behaviour_type: String,
    portals: Vec<Portal>,
    properties: PropertySet,
    owner: Option<ItemKey>,
}

impl Behaviour {
    #[must_use]
    pub fn new(alias: impl Into<String>, behaviour_type: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            behaviour_type: behaviour_type.into(),
            ..Self::default()
        }
    }

    /// Builder-style [`add_portal`](Self::add_portal).
    #[must_use]
    pub fn with_portal(mut self, direction: PortalDirection, property: Property) -> Self {
        self.add_portal(direction, property);
        self
    }

    /// Builder-style node property registration.
    pub fn with_property(mut self, property: Property) -> Result<Self, CanvasError> {
        self.properties.add(property)?;
        Ok(self)
    }

    /// The canvas item this behaviour is bound to.
    #[must_use]
    pub fn owner(&self) -> Option<ItemKey> {
        self.owner
    }

    /// Point the portals and the property set at `owner`.
    pub(crate) fn bind(&mut self, owner: ItemKey) {
        self.owner = Some(owner);
        self.properties.set_owner(Some(owner));
        for portal in &mut self.portals {
            portal.set_owner(Some(owner));
        }
    }

    /// Append a portal of `direction` wrapping `property`.
    pub fn add_portal(&mut self, direction: PortalDirection, property: Property) -> &mut Portal {
        self.push_portal(Portal::new(direction, property))
    }

    fn push_portal(&mut self, mut portal: Portal) -> &mut Portal {
        portal.set_owner(self.owner);
        self.portals.push(portal);
        let last = self.portals.len() - 1;
        &mut self.portals[last]
    }

    /// Remove the first portal named `name`, disposing it.
    ///
    /// The returned portal still lists the links that were attached, so the
    /// caller can remove them.
    pub fn remove_portal(&mut self, name: &str) -> Option<(Portal, Vec<ItemKey>)> {
        let idx = self.portals.iter().position(|p| p.name() == name)?;
        let mut portal = self.portals.remove(idx);
        let links = portal.links().to_vec();
        portal.dispose();
        Some((portal, links))
    }

    /// First portal named `name`, across all directions.
    #[must_use]
    pub fn get_portal(&self, name: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.name() == name)
    }

    pub fn get_portal_mut(&mut self, name: &str) -> Option<&mut Portal> {
        self.portals.iter_mut().find(|p| p.name() == name)
    }

    /// Every portal, in insertion order.
    #[must_use]
    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn portals_mut(&mut self) -> impl Iterator<Item = &mut Portal> {
        self.portals.iter_mut()
    }

    pub fn portals_in(&self, direction: PortalDirection) -> impl Iterator<Item = &Portal> {
        self.portals
            .iter()
            .filter(move |p| p.direction() == direction)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Portal> {
        self.portals_in(PortalDirection::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Portal> {
        self.portals_in(PortalDirection::Output)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Portal> {
        self.portals_in(PortalDirection::Parameter)
    }

    pub fn products(&self) -> impl Iterator<Item = &Portal> {
        self.portals_in(PortalDirection::Product)
    }

    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Update a node property; `Ok(None)` when the name is unknown.
    pub fn update_property(
        &mut self,
        name: &str,
        raw: &Value,
    ) -> Result<Option<PropertyEdit>, CanvasError> {
        Ok(self.properties.update_value(name, raw)?)
    }

    /// Update the value carried by a portal; `Ok(None)` when no portal has
    /// that name. Returns the previous value.
    pub fn update_portal_value(
        &mut self,
        name: &str,
        raw: &Value,
    ) -> Result<Option<Value>, CanvasError> {
        let Some(portal) = self.get_portal_mut(name) else {
            return Ok(None);
        };
        Ok(Some(portal.property.set_raw(raw)?))
    }

    #[must_use]
    pub fn to_token(&self, header: ItemHeader) -> BehaviourToken {
        BehaviourToken {
            header,
            alias: self.alias.clone(),
            behaviour_type: self.behaviour_type.clone(),
            portals: self.portals.iter().map(Portal::to_token).collect(),
            properties: self.properties.tokenize(false),
        }
    }

    /// Replace portals and node properties with the token's.
    ///
    /// Portal properties are rebuilt through `factory`. Nothing changes if
    /// any portal or property fails to load.
    pub fn load_token(
        &mut self,
        token: &BehaviourToken,
        factory: &dyn PropertyFactory,
    ) -> Result<(), CanvasError> {
        let mut portals = Vec::with_capacity(token.portals.len());
        for portal in &token.portals {
            let property = factory.detokenize(&portal.property)?;
            portals.push(Portal::new(portal.direction, property).with_custom(portal.custom));
        }
        let mut properties = PropertySet::new();
        properties.de_tokenize(&token.properties, factory)?;

        self.dispose_portals();
        self.alias.clone_from(&token.alias);
        self.behaviour_type.clone_from(&token.behaviour_type);
        for portal in portals {
            self.push_portal(portal);
        }
        properties.set_owner(self.owner);
        self.properties = properties;
        Ok(())
    }

    fn dispose_portals(&mut self) {
        for mut portal in self.portals.drain(..) {
            portal.dispose();
        }
    }

    /// Dispose every portal and release the owner handle.
    pub fn dispose(&mut self) {
        self.dispose_portals();
        self.owner = None;
        self.properties.set_owner(None);
    }
}
