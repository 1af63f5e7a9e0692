//! # Weave Core
//!
//! Identifier types shared by every Weave crate.
//!
//! - [`ItemKey`]: stable in-memory identity of a canvas item. Serialization ids
//!   are positional and change on every save; the key does not.
//! - [`StoreId`]: identity of the store that owns a set of canvas items.
//!
//! ```rust
//! use weave_core::{ItemKey, StoreId};
//!
//! let item = ItemKey::v4();
//! let store = StoreId::v4();
//! assert!(!item.is_nil());
//! assert!(!store.is_nil());
//! ```

#![forbid(unsafe_code)]

pub mod id;

pub use id::*;
