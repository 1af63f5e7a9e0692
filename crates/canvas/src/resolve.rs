//! Two-phase reconstruction of a token batch.
//!
//! Phase one builds every item from its token without looking at any other
//! item. Phase two hands each item the full [`LinkMap`] so links and
//! shortcuts can turn original ids into live item keys. Cross-references
//! therefore never depend on token order.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Deserialize as _;
use serde_json::Value;
use weave_core::ItemKey;
use weave_property::factory::PropertyFactory;

use crate::config::CanvasConfig;
use crate::diagnostics::Logger;
use crate::error::CanvasError;
use crate::item::CanvasItem;
use crate::portal::PortalDirection;
use crate::token::ItemToken;

/// What linking may read about an instantiated item.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTarget {
    pub type_name: &'static str,
    /// Behaviour alias; `None` for comments and links.
    pub alias: Option<String>,
    /// Portal names and directions, in order.
    pub portals: Vec<(String, PortalDirection)>,
}

impl LinkTarget {
    /// Direction of the first portal named `name`.
    #[must_use]
    pub fn portal(&self, name: &str) -> Option<PortalDirection> {
        self.portals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, direction)| *direction)
    }

    /// Only plain and boundary behaviours can be the original of a shortcut.
    #[must_use]
    pub fn can_be_aliased(&self) -> bool {
        matches!(self.type_name, "behaviour" | "portal")
    }
}

#[derive(Debug, Clone)]
pub struct LinkEntry<'a> {
    pub key: ItemKey,
    pub token: &'a ItemToken,
    pub target: LinkTarget,
}

/// Original id to instantiated item, for one batch.
#[derive(Debug, Default)]
pub struct LinkMap<'a> {
    entries: HashMap<i64, LinkEntry<'a>>,
}

impl<'a> LinkMap<'a> {
    /// Register an item. When the id is already taken the first entry wins
    /// and `false` is returned.
    pub fn insert(&mut self, original_id: i64, entry: LinkEntry<'a>) -> bool {
        match self.entries.entry(original_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, original_id: i64) -> Option<&LinkEntry<'a>> {
        self.entries.get(&original_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything an item's `link` call may consult.
#[derive(Clone, Copy)]
pub struct LinkContext<'a> {
    pub map: &'a LinkMap<'a>,
    pub logger: &'a dyn Logger,
    pub config: &'a CanvasConfig,
}

/// One item of a batch that could not be loaded.
#[derive(Debug)]
pub struct ItemFailure {
    /// Original id, when the token carried one.
    pub id: Option<i64>,
    pub error: CanvasError,
}

/// Items that survived both phases, in token order, plus the failures.
#[derive(Debug, Default)]
pub struct ResolvedBatch {
    pub items: Vec<CanvasItem>,
    pub failures: Vec<ItemFailure>,
}

/// Parse one raw token, telling unknown discriminants apart from other
/// parse errors.
pub fn parse_token(raw: &Value) -> Result<ItemToken, CanvasError> {
    let id = raw.get("id").and_then(Value::as_i64);
    let item_type = raw.get("type").and_then(Value::as_str).unwrap_or_default();
    if !ItemToken::TYPES.contains(&item_type) {
        return Err(CanvasError::UnknownItemType {
            id,
            item_type: item_type.to_owned(),
        });
    }
    ItemToken::deserialize(raw).map_err(|e| CanvasError::MalformedToken {
        id,
        reason: e.to_string(),
    })
}

/// Phase one: parse and construct every item independently.
pub fn instantiate(
    raw: &[Value],
    factory: &dyn PropertyFactory,
) -> (Vec<(ItemToken, CanvasItem)>, Vec<ItemFailure>) {
    let mut built = Vec::with_capacity(raw.len());
    let mut failures = Vec::new();
    for value in raw {
        let result = parse_token(value).and_then(|token| {
            let item = CanvasItem::from_token(&token, factory)?;
            Ok((token, item))
        });
        match result {
            Ok(pair) => built.push(pair),
            Err(error) => failures.push(ItemFailure {
                id: value.get("id").and_then(Value::as_i64),
                error,
            }),
        }
    }
    (built, failures)
}

/// Phase two: resolve references, drop items that cannot be linked and
/// register surviving links on their endpoint portals.
pub fn link_batch(
    built: Vec<(ItemToken, CanvasItem)>,
    logger: &dyn Logger,
    config: &CanvasConfig,
) -> ResolvedBatch {
    let (tokens, mut items): (Vec<ItemToken>, Vec<CanvasItem>) = built.into_iter().unzip();

    let mut map = LinkMap::default();
    for (token, item) in tokens.iter().zip(&items) {
        let entry = LinkEntry {
            key: item.key(),
            token,
            target: item.link_target(),
        };
        if !map.insert(token.id(), entry) {
            tracing::debug!(id = token.id(), "duplicate original id ignored by link map");
        }
    }

    let ctx = LinkContext {
        map: &map,
        logger,
        config,
    };
    let mut failures = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for (token, mut item) in tokens.iter().zip(items.drain(..)) {
        match item.link(token.id(), &ctx) {
            Ok(()) => kept.push(item),
            Err(error) => {
                item.dispose();
                failures.push(ItemFailure {
                    id: Some(token.id()),
                    error,
                });
            }
        }
    }

    wire_links(&mut kept);
    ResolvedBatch {
        items: kept,
        failures,
    }
}

/// Run both phases over a raw token batch.
pub fn resolve_batch(
    raw: &[Value],
    factory: &dyn PropertyFactory,
    logger: &dyn Logger,
    config: &CanvasConfig,
) -> ResolvedBatch {
    let (built, mut failures) = instantiate(raw, factory);
    let mut batch = link_batch(built, logger, config);
    failures.append(&mut batch.failures);
    batch.failures = failures;
    tracing::debug!(
        tokens = raw.len(),
        items = batch.items.len(),
        failures = batch.failures.len(),
        "batch resolved"
    );
    batch
}

fn wire_links(items: &mut [CanvasItem]) {
    let index: HashMap<ItemKey, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.key(), i))
        .collect();
    let endpoints: Vec<_> = items
        .iter()
        .filter_map(|item| {
            let link = item.as_link()?;
            Some((item.key(), link.start()?.clone(), link.end()?.clone()))
        })
        .collect();
    for (link, start, end) in endpoints {
        for endpoint in [start, end] {
            if let Some(&i) = index.get(&endpoint.behaviour) {
                items[i].attach_link(&endpoint.portal, link);
            }
        }
    }
}
