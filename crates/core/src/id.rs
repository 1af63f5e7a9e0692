//! Unique identifiers for Weave entities.
//!
//! Both types are [`domain-key`](https://crates.io/crates/domain-key) `Uuid<D>`
//! wrappers, so an [`ItemKey`] can never be passed where a [`StoreId`] is
//! expected. They are `Copy`, hashable and serialize as UUID strings.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

define_uuid!(pub ItemKeyDomain => ItemKey);
define_uuid!(pub StoreIdDomain => StoreId);
