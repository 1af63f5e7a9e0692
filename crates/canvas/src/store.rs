//! The workspace that owns canvas items.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde_json::Value;
use weave_core::{ItemKey, StoreId};
use weave_property::factory::{DefaultPropertyFactory, PropertyFactory};
use weave_property::set::PropertySet;

use crate::config::CanvasConfig;
use crate::diagnostics::{Logger, Severity, TracingLogger};
use crate::error::CanvasError;
use crate::item::{CanvasItem, ItemKind, SerializeContext};
use crate::link::{Endpoint, Link, check_direction};
use crate::portal::{Portal, PortalDirection};
use crate::resolve::{ItemFailure, resolve_batch};
use crate::shortcut::BehaviourShortcut;
use crate::signal::{ChangeSignal, StoreChange, SubscriptionId};
use crate::token::{GraphToken, ItemToken};

/// Outcome of loading a token batch into a store.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Keys of the added items, in token order.
    pub items: Vec<ItemKey>,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// Original ids of the tokens that could not be loaded.
    #[must_use]
    pub fn failed_ids(&self) -> Vec<Option<i64>> {
        self.failures.iter().map(|f| f.id).collect()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns an ordered list of canvas items (back to front) and the selection.
///
/// Every selected item is in the item list; selection order is the order in
/// which items were selected.
pub struct Store {
    id: StoreId,
    items: Vec<CanvasItem>,
    selection: Vec<ItemKey>,
    properties: PropertySet,
    config: CanvasConfig,
    factory: Arc<dyn PropertyFactory>,
    logger: Arc<dyn Logger>,
    signal: ChangeSignal,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("items", &self.items.len())
            .field("selection", &self.selection)
            .field("config", &self.config)
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: StoreId::v4(),
            items: Vec::new(),
            selection: Vec::new(),
            properties: PropertySet::new(),
            config: CanvasConfig::default(),
            factory: Arc::new(DefaultPropertyFactory),
            logger: Arc::new(TracingLogger),
            signal: ChangeSignal::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CanvasConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn PropertyFactory>) -> Self {
        self.factory = factory;
        self
    }

    #[must_use]
    pub fn id(&self) -> StoreId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items back to front.
    pub fn items(&self) -> impl Iterator<Item = &CanvasItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn contains(&self, key: ItemKey) -> bool {
        self.items.iter().any(|i| i.key() == key)
    }

    #[must_use]
    pub fn item(&self, key: ItemKey) -> Option<&CanvasItem> {
        self.items.iter().find(|i| i.key() == key)
    }

    /// Item carrying `id` from the last load or serialization.
    #[must_use]
    pub fn item_by_id(&self, id: i64) -> Option<&CanvasItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Mutable access to an item. Subscribers are notified when the guard
    /// drops if the item was invalidated meanwhile.
    pub fn item_mut(&mut self, key: ItemKey) -> Option<ItemMut<'_>> {
        let Self { items, signal, .. } = self;
        let item = items.iter_mut().find(|i| i.key() == key)?;
        Some(ItemMut { item, signal })
    }

    fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|i| i.key() == key)
    }

    /// Append `item`. Adding an item whose key is already present is a no-op.
    pub fn add_item(&mut self, mut item: CanvasItem) -> ItemKey {
        let key = item.key();
        if self.contains(key) {
            return key;
        }
        item.set_store(Some(self.id));
        if item.is_selected() && !self.selection.contains(&key) {
            self.selection.push(key);
        }
        item.invalidate();
        self.items.push(item);
        self.notify();
        key
    }

    /// Remove, dispose and return the item.
    ///
    /// Removing a behaviour also removes the links attached to it when
    /// `cascade_link_removal` is set, and degrades the shortcuts that alias
    /// it. Subscribers are notified even when the key is unknown.
    pub fn remove_item(&mut self, key: ItemKey) -> Option<CanvasItem> {
        let removed = self.take_item(key);
        if removed.as_ref().is_some_and(|item| item.as_behaviour().is_some()) {
            self.break_shortcuts_to(key);
        }
        if let Some(item) = &removed
            && item.as_behaviour().is_some()
            && self.config.cascade_link_removal
        {
            let attached: Vec<ItemKey> = self
                .items
                .iter()
                .filter(|i| i.as_link().is_some_and(|l| l.touches(key)))
                .map(CanvasItem::key)
                .collect();
            tracing::debug!(item = %key, links = attached.len(), "cascading link removal");
            for link in attached {
                self.take_item(link);
            }
        }
        self.notify();
        removed
    }

    /// Degrade every shortcut whose original is `original`.
    fn break_shortcuts_to(&mut self, original: ItemKey) {
        let label = &self.config.broken_shortcut_label;
        for item in &mut self.items {
            if item.as_shortcut().and_then(BehaviourShortcut::original) != Some(original) {
                continue;
            }
            let key = item.key();
            if let Some(shortcut) = item.as_shortcut_mut() {
                shortcut.mark_broken(label);
            }
            self.logger.log_message(
                &format!("shortcut {key} lost its original {original}"),
                "canvas",
                Severity::Warning,
            );
        }
    }

    /// Unlink the item from the store without notifying.
    fn take_item(&mut self, key: ItemKey) -> Option<CanvasItem> {
        let idx = self.index_of(key)?;
        let mut item = self.items.remove(idx);
        self.selection.retain(|k| *k != key);
        if let Some(link) = item.as_link() {
            let ends: Vec<Endpoint> = link.start().into_iter().chain(link.end()).cloned().collect();
            for end in ends {
                if let Some(i) = self.index_of(end.behaviour) {
                    self.items[i].detach_link(key);
                }
            }
        }
        item.dispose();
        Some(item)
    }

    /// Dispose every item and empty the selection.
    pub fn clear(&mut self) {
        for mut item in self.items.drain(..) {
            item.dispose();
        }
        self.selection.clear();
        self.notify();
    }

    /// Move an item and refit the links attached to it.
    pub fn move_item(&mut self, key: ItemKey, left: f64, top: f64) -> bool {
        let Some(idx) = self.index_of(key) else {
            return false;
        };
        self.items[idx].move_to(left, top);
        let links: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.as_link().is_some_and(|l| l.touches(key)))
            .map(|(i, _)| i)
            .collect();
        for link in links {
            self.refit_link(link);
        }
        self.notify();
        true
    }

    fn refit_link(&mut self, idx: usize) {
        let Some((start, end)) = self.items[idx]
            .as_link()
            .and_then(|l| Some((l.start()?.behaviour, l.end()?.behaviour)))
        else {
            return;
        };
        let (Some(a), Some(b)) = (self.item(start), self.item(end)) else {
            return;
        };
        let (a, b) = (a.position(), b.position());
        let item = &mut self.items[idx];
        let Some(link) = item.as_link_mut() else {
            return;
        };
        let rect = link.update_bounds(a, b);
        item.move_to(rect.left, rect.top);
    }

    // ---------------------------------------------------------------------
    // Graph building
    // ---------------------------------------------------------------------

    fn portal_direction(&self, behaviour: ItemKey, portal: &str) -> Result<PortalDirection, CanvasError> {
        let item = self.item(behaviour).ok_or(CanvasError::UnknownItem(behaviour))?;
        let b = item.as_behaviour().ok_or(CanvasError::NotABehaviour(behaviour))?;
        b.get_portal(portal)
            .map(Portal::direction)
            .ok_or_else(|| CanvasError::UnknownPortal {
                behaviour: b.alias.clone(),
                portal: portal.to_owned(),
            })
    }

    /// Link an output or product portal to an input or parameter portal on
    /// another behaviour.
    pub fn connect(
        &mut self,
        start: ItemKey,
        start_portal: &str,
        end: ItemKey,
        end_portal: &str,
    ) -> Result<ItemKey, CanvasError> {
        if start == end {
            return Err(CanvasError::SelfLink(start));
        }
        check_direction(start_portal, self.portal_direction(start, start_portal)?, "start")?;
        check_direction(end_portal, self.portal_direction(end, end_portal)?, "end")?;

        let mut link = Link::new(
            Endpoint::new(start, start_portal),
            Endpoint::new(end, end_portal),
        );
        let from = self.item(start).map(CanvasItem::position).unwrap_or_default();
        let to = self.item(end).map(CanvasItem::position).unwrap_or_default();
        let rect = link.update_bounds(from, to);
        let item = CanvasItem::new(ItemKind::Link(link)).at(rect.left, rect.top);
        let key = item.key();

        for (behaviour, portal) in [(start, start_portal), (end, end_portal)] {
            if let Some(i) = self.index_of(behaviour) {
                self.items[i].attach_link(portal, key);
            }
        }
        tracing::debug!(link = %key, start_portal, end_portal, "connected");
        Ok(self.add_item(item))
    }

    /// Place a shortcut to `original` next to it.
    ///
    /// A shortcut to a shortcut aliases the same original.
    pub fn add_shortcut(&mut self, original: ItemKey) -> Result<ItemKey, CanvasError> {
        let item = self.item(original).ok_or(CanvasError::UnknownItem(original))?;
        let target = match item.kind() {
            ItemKind::Shortcut(s) => s.original().ok_or(CanvasError::NotABehaviour(original))?,
            ItemKind::Behaviour(_) | ItemKind::Portal(_) => original,
            ItemKind::Comment(_) | ItemKind::Link(_) => {
                return Err(CanvasError::NotABehaviour(original));
            }
        };
        let source = self.item(target).ok_or(CanvasError::UnknownItem(target))?;
        let behaviour = source
            .as_behaviour()
            .ok_or(CanvasError::NotABehaviour(target))?;
        let offset = self.config.paste_offset;
        let (left, top) = item.position();
        let shortcut = CanvasItem::new(ItemKind::Shortcut(BehaviourShortcut::from_original(
            behaviour, target,
        )))
        .at(left + offset, top + offset);
        Ok(self.add_item(shortcut))
    }

    /// Remove a portal from a behaviour, together with its links when
    /// `cascade_link_removal` is set.
    ///
    /// Boundary items keep their single internal portal and are rejected
    /// with [`CanvasError::FixedPortal`].
    pub fn remove_portal(&mut self, behaviour: ItemKey, portal: &str) -> Result<Option<Portal>, CanvasError> {
        let idx = self.index_of(behaviour).ok_or(CanvasError::UnknownItem(behaviour))?;
        if self.items[idx].as_boundary().is_some() {
            return Err(CanvasError::FixedPortal(behaviour));
        }
        let removed = self.items[idx]
            .as_behaviour_mut()
            .ok_or(CanvasError::NotABehaviour(behaviour))?
            .remove_portal(portal);
        let Some((portal, links)) = removed else {
            self.notify();
            return Ok(None);
        };
        if self.config.cascade_link_removal {
            for link in links {
                self.take_item(link);
            }
        }
        self.notify();
        Ok(Some(portal))
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Selected keys, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ItemKey] {
        &self.selection
    }

    /// Apply a click on `node` (or on empty canvas when `None`).
    ///
    /// Non-additive clicks replace the selection. Additive clicks flip the
    /// node when `toggle` is set, then bring the selection list in line with
    /// the node's flag.
    pub fn on_node_selected(&mut self, node: Option<ItemKey>, additive: bool, toggle: bool) {
        if !additive {
            for key in std::mem::take(&mut self.selection) {
                if let Some(i) = self.index_of(key) {
                    self.items[i].set_selected(false);
                }
            }
            if let Some(i) = node.and_then(|k| self.index_of(k)) {
                self.items[i].set_selected(true);
                self.selection.push(self.items[i].key());
            }
        } else if let Some(i) = node.and_then(|k| self.index_of(k)) {
            let item = &mut self.items[i];
            if toggle {
                item.set_selected(!item.is_selected());
            }
            let key = item.key();
            if item.is_selected() {
                if !self.selection.contains(&key) {
                    self.selection.push(key);
                }
            } else {
                self.selection.retain(|k| *k != key);
            }
        }
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.selection.clear();
        for item in &mut self.items {
            item.set_selected(true);
            self.selection.push(item.key());
        }
        self.notify();
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Serialize every item. Ids are positional: 1, 2, 3, ...
    pub fn serialize(&mut self) -> Result<Vec<Value>, CanvasError> {
        let keys: HashSet<ItemKey> = self.items.iter().map(CanvasItem::key).collect();
        to_values(self.serialize_subset(&keys))
    }

    /// Serialize the selected items plus links whose both ends are selected.
    ///
    /// References to items outside that subset are written as `null`; on
    /// load they turn into broken shortcuts or dropped links.
    pub fn serialize_selection(&mut self) -> Result<Vec<Value>, CanvasError> {
        to_values(self.selection_tokens())
    }

    fn selection_tokens(&mut self) -> Vec<ItemToken> {
        let mut keys: HashSet<ItemKey> = self.selection.iter().copied().collect();
        let implied: Vec<ItemKey> = self
            .items
            .iter()
            .filter(|i| {
                i.as_link().is_some_and(|l| {
                    l.start().is_some_and(|e| keys.contains(&e.behaviour))
                        && l.end().is_some_and(|e| keys.contains(&e.behaviour))
                })
            })
            .map(CanvasItem::key)
            .collect();
        keys.extend(implied);
        self.serialize_subset(&keys)
    }

    fn serialize_subset(&mut self, keys: &HashSet<ItemKey>) -> Vec<ItemToken> {
        let mut ctx = SerializeContext::new();
        let mut next = 0;
        for item in self.items.iter().filter(|i| keys.contains(&i.key())) {
            next += 1;
            ctx.assign(item.key(), next);
        }
        let mut tokens = Vec::with_capacity(keys.len());
        for item in self.items.iter_mut().filter(|i| keys.contains(&i.key())) {
            let id = ctx.id_of(item.key()).unwrap_or_default();
            tokens.push(item.serialize(id, &ctx));
        }
        tokens
    }

    /// Load a token batch and append the resulting items.
    ///
    /// Items that fail are reported and skipped; the rest are added.
    pub fn deserialize_batch(&mut self, tokens: &[Value]) -> BatchReport {
        let batch = resolve_batch(tokens, self.factory.as_ref(), self.logger.as_ref(), &self.config);
        for failure in &batch.failures {
            tracing::debug!(id = ?failure.id, code = failure.error.code(), error = %failure.error, "item skipped");
        }
        let mut report = BatchReport {
            items: Vec::with_capacity(batch.items.len()),
            failures: batch.failures,
        };
        for mut item in batch.items {
            item.set_store(Some(self.id));
            let key = item.key();
            if item.is_selected() && !self.selection.contains(&key) {
                self.selection.push(key);
            }
            self.items.push(item);
            report.items.push(key);
        }
        self.notify();
        report
    }

    /// Paste a copy of the selection, offset by `paste_offset`, and select
    /// the pasted items instead.
    pub fn duplicate_selection(&mut self) -> Result<BatchReport, CanvasError> {
        let offset = self.config.paste_offset;
        let mut tokens = self.selection_tokens();
        for token in &mut tokens {
            let header = token.header_mut();
            header.left += offset;
            header.top += offset;
            header.selected = true;
        }
        let tokens = to_values(tokens)?;
        self.on_node_selected(None, false, false);
        Ok(self.deserialize_batch(&tokens))
    }

    /// Export items and graph-level properties.
    pub fn to_graph_token(&mut self) -> Result<GraphToken, CanvasError> {
        Ok(GraphToken {
            items: self.serialize()?,
            properties: self.properties.tokenize(false),
        })
    }

    /// Replace the whole store content with a graph token.
    ///
    /// Graph properties are loaded first; if they fail nothing changes.
    pub fn load_graph_token(&mut self, graph: &GraphToken) -> Result<BatchReport, CanvasError> {
        let mut properties = PropertySet::new();
        properties.de_tokenize(&graph.properties, self.factory.as_ref())?;
        self.clear();
        self.properties = properties;
        Ok(self.deserialize_batch(&graph.items))
    }

    /// Graph-level properties.
    #[must_use]
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    // ---------------------------------------------------------------------
    // Change notification
    // ---------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        self.signal.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.signal.unsubscribe(id)
    }

    /// Number of notifications sent so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.signal.revision()
    }

    fn notify(&mut self) {
        for item in &mut self.items {
            item.take_invalidated();
        }
        self.signal.emit();
    }
}

fn to_values(tokens: Vec<ItemToken>) -> Result<Vec<Value>, CanvasError> {
    tokens
        .into_iter()
        .map(|t| serde_json::to_value(t).map_err(CanvasError::from))
        .collect()
}

/// Mutable handle to a stored item.
pub struct ItemMut<'a> {
    item: &'a mut CanvasItem,
    signal: &'a mut ChangeSignal,
}

impl Deref for ItemMut<'_> {
    type Target = CanvasItem;

    fn deref(&self) -> &CanvasItem {
        self.item
    }
}

impl DerefMut for ItemMut<'_> {
    fn deref_mut(&mut self) -> &mut CanvasItem {
        self.item
    }
}

impl Drop for ItemMut<'_> {
    fn drop(&mut self) {
        if self.item.take_invalidated() {
            self.signal.emit();
        }
    }
}
