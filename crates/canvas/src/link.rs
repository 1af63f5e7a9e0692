use weave_core::ItemKey;

use crate::error::CanvasError;
use crate::portal::PortalDirection;
use crate::resolve::{LinkContext, LinkEntry};
use crate::token::{ItemHeader, LinkToken};

/// One end of a link: a behaviour plus the name of one of its portals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub behaviour: ItemKey,
    pub portal: String,
}

impl Endpoint {
    #[must_use]
    pub fn new(behaviour: ItemKey, portal: impl Into<String>) -> Self {
        Self {
            behaviour,
            portal: portal.into(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Smallest box containing both points.
    #[must_use]
    pub fn spanning(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }
}

/// Endpoints as read from a token, before the linking phase.
#[derive(Debug, Clone, PartialEq)]
struct PendingEndpoints {
    start: Option<i64>,
    start_portal: String,
    end: Option<i64>,
    end_portal: String,
}

/// A directed connection from an output or product portal to an input or
/// parameter portal on another behaviour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    start: Option<Endpoint>,
    end: Option<Endpoint>,
    pub width: f64,
    pub height: f64,
    pending: Option<PendingEndpoints>,
}

impl Link {
    #[must_use]
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn start(&self) -> Option<&Endpoint> {
        self.start.as_ref()
    }

    #[must_use]
    pub fn end(&self) -> Option<&Endpoint> {
        self.end.as_ref()
    }

    /// Whether either endpoint is on `behaviour`.
    #[must_use]
    pub fn touches(&self, behaviour: ItemKey) -> bool {
        self.start.iter().chain(&self.end).any(|e| e.behaviour == behaviour)
    }

    /// Whether this link attaches to portal `portal` of `behaviour`.
    #[must_use]
    pub fn attaches_to(&self, behaviour: ItemKey, portal: &str) -> bool {
        self.start
            .iter()
            .chain(&self.end)
            .any(|e| e.behaviour == behaviour && e.portal == portal)
    }

    /// Recompute the size from endpoint positions and return the new box.
    pub fn update_bounds(&mut self, start: (f64, f64), end: (f64, f64)) -> Rect {
        let rect = Rect::spanning(start, end);
        self.width = rect.width;
        self.height = rect.height;
        rect
    }

    #[must_use]
    pub fn to_token(
        &self,
        header: ItemHeader,
        id_of: impl Fn(ItemKey) -> Option<i64>,
    ) -> LinkToken {
        let id = |e: &Option<Endpoint>| e.as_ref().and_then(|e| id_of(e.behaviour));
        let portal = |e: &Option<Endpoint>| e.as_ref().map(|e| e.portal.clone()).unwrap_or_default();
        LinkToken {
            header,
            start_behaviour: id(&self.start),
            start_portal: portal(&self.start),
            end_behaviour: id(&self.end),
            end_portal: portal(&self.end),
            width: self.width,
            height: self.height,
        }
    }

    /// Keep the token's endpoint ids for the linking phase.
    pub fn load_token(&mut self, token: &LinkToken) {
        self.start = None;
        self.end = None;
        self.width = token.width;
        self.height = token.height;
        self.pending = Some(PendingEndpoints {
            start: token.start_behaviour,
            start_portal: token.start_portal.clone(),
            end: token.end_behaviour,
            end_portal: token.end_portal.clone(),
        });
    }

    /// Resolve pending endpoints through the link map.
    ///
    /// Links built in memory have nothing pending and resolve trivially.
    pub(crate) fn resolve(&mut self, own_id: i64, ctx: &LinkContext<'_>) -> Result<(), CanvasError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let start = Self::resolve_end(own_id, pending.start, &pending.start_portal, "start", ctx)?;
        let end = Self::resolve_end(own_id, pending.end, &pending.end_portal, "end", ctx)?;
        if start.behaviour == end.behaviour {
            return Err(CanvasError::SelfLink(start.behaviour));
        }
        self.start = Some(start);
        self.end = Some(end);
        Ok(())
    }

    fn resolve_end(
        own_id: i64,
        id: Option<i64>,
        portal: &str,
        end: &'static str,
        ctx: &LinkContext<'_>,
    ) -> Result<Endpoint, CanvasError> {
        let entry: &LinkEntry<'_> = id
            .and_then(|id| ctx.map.get(id))
            .ok_or(CanvasError::DanglingLink {
                id: own_id,
                missing: id,
            })?;
        let direction = entry
            .target
            .portal(portal)
            .ok_or_else(|| CanvasError::UnknownPortal {
                behaviour: entry.target.alias.clone().unwrap_or_default(),
                portal: portal.to_owned(),
            })?;
        check_direction(portal, direction, end)?;
        Ok(Endpoint::new(entry.key, portal))
    }

    pub fn dispose(&mut self) {
        self.start = None;
        self.end = None;
        self.pending = None;
    }
}

/// Links run from sources (`output`, `product`) to targets (`input`,
/// `parameter`).
pub(crate) fn check_direction(
    portal: &str,
    direction: PortalDirection,
    end: &'static str,
) -> Result<(), CanvasError> {
    let ok = match end {
        "start" => direction.is_source(),
        _ => direction.is_target(),
    };
    if ok {
        Ok(())
    } else {
        Err(CanvasError::InvalidLinkDirection {
            portal: portal.to_owned(),
            direction,
            end,
        })
    }
}
