//! Schema-driven JSON codec for Gerrit REST entities.
//!
//! Gerrit's REST API represents several collection-valued fields as JSON
//! objects whose member names carry data: `reviewers` maps a reviewer state
//! to a list of accounts, `revisions` maps a commit SHA-1 to revision
//! details. In-memory these are ordered lists of key/value entries, not
//! maps, so a plain serde derive cannot express them. This crate provides:
//!
//! - a small runtime schema language ([`schema::Type`]) describing entity
//!   shapes, including enum name tables and struct field declarations;
//! - a dynamic value tree ([`value::DynValue`]) that decode produces and
//!   encode consumes;
//! - the [`codec::JsonCodec`] dispatcher routing encode/decode by schema;
//! - the [`keyed_list::KeyedListHandler`] plugin translating keyed entry
//!   lists to and from JSON object syntax.

pub mod codec;
pub mod error;
pub mod keyed_list;
pub mod schema;
pub mod value;

pub use codec::{JsonCodec, TypeHandler};
pub use error::CodecError;
pub use keyed_list::KeyedListHandler;
pub use schema::{EnumSchema, FieldSchema, ListMapSchema, StructSchema, Type};
pub use value::{DynValue, Entry, EnumValue, ListMapValue, StructValue};
