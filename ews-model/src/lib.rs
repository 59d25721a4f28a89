//! Schema engine for EWS wire elements.
//!
//! Defines the types every protocol entity is built from:
//! - [`Field`] and [`FieldKind`]: one typed, wire-located attribute and how it validates and marshals
//! - [`Fields`]: an ordered, name-indexed schema whose order is the wire emission order
//! - [`ElementType`]: a static entity type, resolving its schema through a copy-on-write registry
//! - [`Element`]: a schema-bound value object with guarded writes, `clean`, marshal and unmarshal
//! - [`ElementHooks`]: optional per-type validation, hashing and wire-shape overrides
//! - [`HasDelegatedIdentity`]: the id/changekey pair stored on a nested element
//!
//! Concrete entity types live in `ews-properties`.

mod element;
mod error;
mod field;
mod hooks;
pub mod identity;
mod registry;
mod schema;
mod value;

pub use element::{Element, ElementType, IdentitySlot};
pub use error::{ModelError, ModelResult};
pub use field::{Choice, Field, FieldKind, Location, DEFAULT_MAX_LEN};
pub use hooks::{ElementHooks, NoHooks};
pub use identity::{id_from_wire, HasDelegatedIdentity};
pub use schema::Fields;
pub use value::{FieldValue, Hashable};
