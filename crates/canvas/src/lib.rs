//! # Weave Canvas
//!
//! The behaviour graph model: items placed on a canvas, the [`Store`](store::Store)
//! that owns them, and the two-phase protocol that rebuilds a graph from
//! its JSON tokens.
//!
//! ## Items
//!
//! - [`Behaviour`](behaviour::Behaviour): a node with typed portals.
//! - [`BehaviourPortal`](boundary::BehaviourPortal): a node exposing one
//!   property across the graph boundary.
//! - [`BehaviourShortcut`](shortcut::BehaviourShortcut): a second handle for
//!   an existing behaviour.
//! - [`Comment`](comment::Comment): a free text note.
//! - [`Link`](link::Link): a connection from a source portal to a target
//!   portal.
//!
//! ## Loading
//!
//! [`resolve::resolve_batch`] first instantiates every token on its own,
//! then calls [`CanvasItem::link`](item::CanvasItem::link) on each item with
//! the complete [`LinkMap`](resolve::LinkMap). A bad token only costs its own
//! item; a shortcut whose original is missing degrades and logs a warning.
//!
//! ```ignore
//! use weave_canvas::prelude::*;
//!
//! let mut store = Store::new();
//! let report = store.deserialize_batch(&tokens);
//! for failure in &report.failures {
//!     eprintln!("{:?}: {}", failure.id, failure.error);
//! }
//! ```

pub mod behaviour;
pub mod boundary;
pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod item;
pub mod link;
pub mod portal;
pub mod resolve;
pub mod shortcut;
pub mod signal;
pub mod store;
pub mod token;

pub mod prelude {
    pub use crate::behaviour::Behaviour;
    pub use crate::boundary::BehaviourPortal;
    pub use crate::comment::Comment;
    pub use crate::config::CanvasConfig;
    pub use crate::diagnostics::{Diagnostic, Logger, MemoryLogger, Severity, TracingLogger};
    pub use crate::error::CanvasError;
    pub use crate::item::{CanvasItem, ItemKind};
    pub use crate::link::{Endpoint, Link, Rect};
    pub use crate::portal::{Portal, PortalDirection};
    pub use crate::resolve::{ItemFailure, LinkMap};
    pub use crate::shortcut::BehaviourShortcut;
    pub use crate::signal::{StoreChange, SubscriptionId};
    pub use crate::store::{BatchReport, ItemMut, Store};
    pub use crate::token::{GraphToken, ItemToken, PortalToken};

    pub use weave_core::{ItemKey, StoreId};
    pub use weave_property::prelude::*;
}
