use std::collections::HashMap;

use weave_core::{ItemKey, StoreId};
use weave_property::factory::PropertyFactory;

use crate::behaviour::Behaviour;
use crate::boundary::BehaviourPortal;
use crate::comment::Comment;
use crate::error::CanvasError;
use crate::link::Link;
use crate::resolve::{LinkContext, LinkTarget};
use crate::shortcut::BehaviourShortcut;
use crate::token::{ItemHeader, ItemToken};

/// State shared by everything placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBase {
    key: ItemKey,
    id: i64,
    left: f64,
    top: f64,
    selected: bool,
    store: Option<StoreId>,
    invalidated: bool,
    disposed: bool,
}

impl ItemBase {
    fn new() -> Self {
        Self {
            key: ItemKey::v4(),
            id: 0,
            left: 0.0,
            top: 0.0,
            selected: false,
            store: None,
            invalidated: false,
            disposed: false,
        }
    }

    fn header(&self) -> ItemHeader {
        ItemHeader {
            id: self.id,
            left: self.left,
            top: self.top,
            selected: self.selected,
        }
    }

    fn apply_header(&mut self, header: &ItemHeader) {
        self.id = header.id;
        self.left = header.left;
        self.top = header.top;
        self.selected = header.selected;
    }
}

/// What kind of item this is, with its type-specific state.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Behaviour(Behaviour),
    Portal(BehaviourPortal),
    Shortcut(BehaviourShortcut),
    Comment(Comment),
    Link(Link),
}

impl ItemKind {
    /// The token discriminant for this kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Behaviour(_) => "behaviour",
            Self::Portal(_) => "portal",
            Self::Shortcut(_) => "shortcut",
            Self::Comment(_) => "comment",
            Self::Link(_) => "link",
        }
    }

    fn blank(token: &ItemToken) -> Self {
        match token {
            ItemToken::Behaviour(_) => Self::Behaviour(Behaviour::default()),
            ItemToken::Portal(_) => Self::Portal(BehaviourPortal::unloaded()),
            ItemToken::Shortcut(_) => Self::Shortcut(BehaviourShortcut::default()),
            ItemToken::Comment(_) => Self::Comment(Comment::default()),
            ItemToken::Link(_) => Self::Link(Link::default()),
        }
    }
}

/// Maps item keys to the positional ids of the batch being serialized.
///
/// Items outside the batch have no id, which is how partial copies drop
/// references to items that were not copied.
#[derive(Debug, Clone, Default)]
pub struct SerializeContext {
    ids: HashMap<ItemKey, i64>,
}

impl SerializeContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, key: ItemKey, id: i64) {
        self.ids.insert(key, id);
    }

    #[must_use]
    pub fn id_of(&self, key: ItemKey) -> Option<i64> {
        self.ids.get(&key).copied()
    }
}

/// Anything that can be placed on the canvas.
///
/// Identity is the [`ItemKey`], fixed at construction. The integer id is only
/// meaningful inside one serialized batch.
#[derive(Debug, PartialEq)]
pub struct CanvasItem {
    base: ItemBase,
    kind: ItemKind,
}

impl CanvasItem {
    #[must_use]
    pub fn new(kind: ItemKind) -> Self {
        let mut item = Self {
            base: ItemBase::new(),
            kind,
        };
        let key = item.base.key;
        if let Some(behaviour) = item.behaviour_mut() {
            behaviour.bind(key);
        }
        item
    }

    #[must_use]
    pub fn behaviour(behaviour: Behaviour) -> Self {
        Self::new(ItemKind::Behaviour(behaviour))
    }

    #[must_use]
    pub fn comment(comment: Comment) -> Self {
        Self::new(ItemKind::Comment(comment))
    }

    #[must_use]
    pub fn boundary(portal: BehaviourPortal) -> Self {
        Self::new(ItemKind::Portal(portal))
    }

    /// Position builder.
    #[must_use]
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.base.left = left;
        self.base.top = top;
        self
    }

    /// Construct the item a token describes and load the token into it.
    pub fn from_token(
        token: &ItemToken,
        factory: &dyn PropertyFactory,
    ) -> Result<Self, CanvasError> {
        let mut item = Self::new(ItemKind::blank(token));
        item.deserialize(token, factory)?;
        Ok(item)
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.base.key
    }

    /// Id from the last serialization or load.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.base.id
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.base.left
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.base.top
    }

    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.base.left, self.base.top)
    }

    pub fn move_to(&mut self, left: f64, top: f64) {
        self.base.left = left;
        self.base.top = top;
        self.invalidate();
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.base.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        if self.base.selected != selected {
            self.base.selected = selected;
            self.invalidate();
        }
    }

    /// The store holding this item, if any.
    #[must_use]
    pub fn store(&self) -> Option<StoreId> {
        self.base.store
    }

    pub(crate) fn set_store(&mut self, store: Option<StoreId>) {
        self.base.store = store;
    }

    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ItemKind {
        self.invalidate();
        &mut self.kind
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The behaviour behind this item: plain, boundary or shortcut.
    #[must_use]
    pub fn as_behaviour(&self) -> Option<&Behaviour> {
        match &self.kind {
            ItemKind::Behaviour(b) => Some(b),
            ItemKind::Portal(p) => Some(p.behaviour()),
            ItemKind::Shortcut(s) => Some(s.behaviour()),
            ItemKind::Comment(_) | ItemKind::Link(_) => None,
        }
    }

    fn behaviour_mut(&mut self) -> Option<&mut Behaviour> {
        match &mut self.kind {
            ItemKind::Behaviour(b) => Some(b),
            ItemKind::Portal(p) => Some(p.behaviour_mut()),
            ItemKind::Shortcut(s) => Some(s.behaviour_mut()),
            ItemKind::Comment(_) | ItemKind::Link(_) => None,
        }
    }

    /// Mutable access to a plain or shortcut behaviour; marks the item
    /// invalidated.
    ///
    /// Boundary items are excluded since their portal list is fixed; edit
    /// them through [`as_boundary_mut`](Self::as_boundary_mut).
    pub fn as_behaviour_mut(&mut self) -> Option<&mut Behaviour> {
        if matches!(self.kind, ItemKind::Portal(_)) {
            return None;
        }
        self.invalidate();
        self.behaviour_mut()
    }

    #[must_use]
    pub fn as_boundary(&self) -> Option<&BehaviourPortal> {
        match &self.kind {
            ItemKind::Portal(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to a boundary item; marks the item invalidated.
    pub fn as_boundary_mut(&mut self) -> Option<&mut BehaviourPortal> {
        match &mut self.kind {
            ItemKind::Portal(p) => {
                self.base.invalidated = true;
                Some(p)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_link(&self) -> Option<&Link> {
        match &self.kind {
            ItemKind::Link(link) => Some(link),
            _ => None,
        }
    }

    pub(crate) fn as_link_mut(&mut self) -> Option<&mut Link> {
        match &mut self.kind {
            ItemKind::Link(link) => Some(link),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_shortcut(&self) -> Option<&BehaviourShortcut> {
        match &self.kind {
            ItemKind::Shortcut(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable shortcut access; marks the item invalidated.
    pub(crate) fn as_shortcut_mut(&mut self) -> Option<&mut BehaviourShortcut> {
        match &mut self.kind {
            ItemKind::Shortcut(s) => {
                self.base.invalidated = true;
                Some(s)
            }
            _ => None,
        }
    }

    /// Register `link` on this behaviour's portal `portal`.
    pub(crate) fn attach_link(&mut self, portal: &str, link: ItemKey) -> bool {
        let Some(portal) = self.behaviour_mut().and_then(|b| b.get_portal_mut(portal)) else {
            return false;
        };
        portal.attach_link(link);
        self.invalidate();
        true
    }

    /// Forget `link` on every portal of this behaviour.
    pub(crate) fn detach_link(&mut self, link: ItemKey) {
        let mut changed = false;
        if let Some(behaviour) = self.behaviour_mut() {
            for portal in behaviour.portals_mut() {
                changed |= portal.detach_link(link);
            }
        }
        if changed {
            self.invalidate();
        }
    }

    /// Flag the item as changed. The owning store picks the flag up and
    /// notifies its subscribers.
    pub fn invalidate(&mut self) {
        self.base.invalidated = true;
    }

    /// Read and reset the invalidation flag.
    pub(crate) fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.base.invalidated)
    }

    /// Assign `id` and export the item.
    pub fn serialize(&mut self, id: i64, ctx: &SerializeContext) -> ItemToken {
        self.base.id = id;
        let header = self.base.header();
        match &self.kind {
            ItemKind::Behaviour(b) => ItemToken::Behaviour(b.to_token(header)),
            ItemKind::Portal(p) => ItemToken::Portal(p.to_token(header)),
            ItemKind::Shortcut(s) => {
                let original = s.original().and_then(|k| ctx.id_of(k));
                ItemToken::Shortcut(s.to_token(header, original))
            }
            ItemKind::Comment(c) => ItemToken::Comment(c.to_token(header)),
            ItemKind::Link(l) => ItemToken::Link(l.to_token(header, |k| ctx.id_of(k))),
        }
    }

    /// Load a token of the same item type.
    pub fn deserialize(
        &mut self,
        token: &ItemToken,
        factory: &dyn PropertyFactory,
    ) -> Result<(), CanvasError> {
        match (&mut self.kind, token) {
            (ItemKind::Behaviour(b), ItemToken::Behaviour(t)) => b.load_token(t, factory)?,
            (ItemKind::Portal(p), ItemToken::Portal(t)) => p.load_token(t, factory)?,
            (ItemKind::Shortcut(s), ItemToken::Shortcut(t)) => s.load_token(t, factory)?,
            (ItemKind::Comment(c), ItemToken::Comment(t)) => c.load_token(t),
            (ItemKind::Link(l), ItemToken::Link(t)) => l.load_token(t),
            (kind, token) => {
                return Err(CanvasError::TokenMismatch {
                    expected: kind.type_name(),
                    found: token.type_name(),
                });
            }
        }
        self.base.apply_header(token.header());
        let key = self.base.key;
        if let Some(behaviour) = self.behaviour_mut() {
            behaviour.bind(key);
        }
        self.invalidate();
        Ok(())
    }

    /// Resolve cross-item references once the whole batch exists.
    ///
    /// Only links and shortcuts have references; everything else is a no-op.
    pub fn link(&mut self, original_id: i64, ctx: &LinkContext<'_>) -> Result<(), CanvasError> {
        match &mut self.kind {
            ItemKind::Link(link) => link.resolve(original_id, ctx),
            ItemKind::Shortcut(shortcut) => {
                shortcut.resolve(original_id, ctx);
                Ok(())
            }
            ItemKind::Behaviour(_) | ItemKind::Portal(_) | ItemKind::Comment(_) => Ok(()),
        }
    }

    /// What the linking phase may know about this item.
    #[must_use]
    pub fn link_target(&self) -> LinkTarget {
        let behaviour = self.as_behaviour();
        LinkTarget {
            type_name: self.type_name(),
            alias: behaviour.map(|b| b.alias.clone()),
            portals: behaviour
                .map(|b| {
                    b.portals()
                        .iter()
                        .map(|p| (p.name().to_owned(), p.direction()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Release everything the item holds. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.base.disposed {
            return;
        }
        match &mut self.kind {
            ItemKind::Behaviour(b) => b.dispose(),
            ItemKind::Portal(p) => p.behaviour_mut().dispose(),
            ItemKind::Shortcut(s) => s.dispose(),
            ItemKind::Comment(_) => {}
            ItemKind::Link(l) => l.dispose(),
        }
        self.base.store = None;
        self.base.selected = false;
        self.base.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.base.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use weave_property::factory::DefaultPropertyFactory;
    use weave_property::property::Property;

    use crate::portal::PortalDirection;

    #[test]
    fn new_behaviour_item_binds_owner() {
        let item = CanvasItem::behaviour(
            Behaviour::new("Add", "Math.Add")
                .with_portal(PortalDirection::Parameter, Property::number("A", 1.0)),
        );
        let behaviour = item.as_behaviour().unwrap();
        assert_eq!(behaviour.portals()[0].owner(), Some(item.key()));
        assert_eq!(behaviour.properties().owner(), Some(item.key()));
    }

    #[test]
    fn serialize_assigns_id_and_header() {
        let mut item = CanvasItem::comment(Comment::new("todo").with_size(10.0, 5.0)).at(3.0, 4.0);
        let token = item.serialize(9, &SerializeContext::new());

        assert_eq!(item.id(), 9);
        assert_eq!(
            serde_json::to_value(token).unwrap(),
            json!({
                "type": "comment",
                "id": 9,
                "left": 3.0,
                "top": 4.0,
                "label": "todo",
                "width": 10.0,
                "height": 5.0,
            })
        );
    }

    #[test]
    fn from_token_builds_matching_kind() {
        let token: ItemToken = serde_json::from_value(json!({
            "type": "behaviour",
            "id": 2,
            "left": 5,
            "top": 6,
            "alias": "Add",
            "behaviourType": "Math.Add",
            "portals": [{
                "name": "A",
                "type": "parameter",
                "custom": false,
                "property": { "name": "A", "kind": "number", "value": 1.0 },
            }],
        }))
        .unwrap();

        let item = CanvasItem::from_token(&token, &DefaultPropertyFactory).unwrap();
        assert_eq!(item.type_name(), "behaviour");
        assert_eq!(item.id(), 2);
        assert_eq!(item.position(), (5.0, 6.0));
        let behaviour = item.as_behaviour().unwrap();
        assert_eq!(behaviour.get_portal("A").unwrap().owner(), Some(item.key()));
    }

    #[test]
    fn deserialize_rejects_other_type() {
        let mut item = CanvasItem::comment(Comment::new("x"));
        let token = CanvasItem::behaviour(Behaviour::new("B", "T"))
            .serialize(1, &SerializeContext::new());
        let err = item.deserialize(&token, &DefaultPropertyFactory).unwrap_err();
        assert!(matches!(
            err,
            CanvasError::TokenMismatch {
                expected: "comment",
                found: "behaviour"
            }
        ));
    }

    #[test]
    fn link_is_noop_for_plain_items() {
        let mut item = CanvasItem::behaviour(Behaviour::new("B", "T"));
        let map = crate::resolve::LinkMap::default();
        let config = crate::config::CanvasConfig::default();
        let logger = crate::diagnostics::MemoryLogger::new();
        let ctx = LinkContext {
            map: &map,
            logger: &logger,
            config: &config,
        };
        item.link(1, &ctx).unwrap();
        assert!(logger.is_empty());
    }

    #[test]
    fn invalidation_flag_is_taken_once() {
        let mut item = CanvasItem::comment(Comment::new("x"));
        item.move_to(1.0, 2.0);
        assert!(item.take_invalidated());
        assert!(!item.take_invalidated());
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut item = CanvasItem::behaviour(
            Behaviour::new("B", "T").with_portal(PortalDirection::Input, Property::number("x", 0.0)),
        );
        item.dispose();
        item.dispose();
        assert!(item.is_disposed());
        assert!(item.as_behaviour().unwrap().portals().is_empty());
    }
}
