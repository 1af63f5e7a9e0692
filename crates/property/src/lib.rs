//! # Weave Property
//!
//! Named, typed value cells attached to behaviour graph nodes and portals.
//!
//! - [`Property`](property::Property): a name plus a [`PropertyValue`](value::PropertyValue)
//!   from a closed set of kinds, with full and slim tokenization.
//! - [`PropertySet`](set::PropertySet): an ordered, name-unique collection.
//! - [`PropertyFactory`](factory::PropertyFactory): builds blank properties by
//!   kind during detokenization.
//! - [`ResourceRef`](resource::ResourceRef) and
//!   [`ResourceLookup`](resource::ResourceLookup): lazy references to project
//!   resources.

pub mod error;
pub mod factory;
pub mod kind;
pub mod property;
pub mod resource;
pub mod set;
pub mod value;

pub mod prelude {
    pub use crate::error::PropertyError;
    pub use crate::factory::{DefaultPropertyFactory, PropertyFactory};
    pub use crate::kind::PropertyKind;
    pub use crate::property::Property;
    pub use crate::resource::{ResourceInfo, ResourceLookup, ResourceRef};
    pub use crate::set::{PropertyEdit, PropertySet};
    pub use crate::value::{Color, PropertyValue};
}
