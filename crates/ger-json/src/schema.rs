//! Runtime type descriptors.
//!
//! Schemas are built once during startup, wrapped in `Arc`, and shared
//! read-only between the codec and the record views. The enum name table in
//! particular is consulted both by regular enum encode/decode and by the
//! keyed-list key derivation, so there is a single source of truth for
//! symbolic names.

use std::sync::Arc;

use crate::error::CodecError;

/// Type descriptor for a value the codec knows how to encode and decode.
#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Int,
    Float,
    Text,
    Enum(Arc<EnumSchema>),
    Struct(Arc<StructSchema>),
    List(Box<Type>),
    ListMap(Arc<ListMapSchema>),
}

impl Type {
    /// Returns the kind string identifier for this descriptor.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::ListMap(_) => "listmap",
        }
    }
}

/// An enumerated type: a named, ordered table of symbolic names.
///
/// The ordinal of a symbol is its index in the table. The table is immutable
/// after construction, so concurrent lookups need no synchronization.
#[derive(Debug)]
pub struct EnumSchema {
    name: String,
    symbols: Vec<String>,
}

impl EnumSchema {
    pub fn new(name: &str, symbols: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            symbols: symbols.iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbolic name for an ordinal, if the ordinal is in range.
    pub fn name_of(&self, ordinal: u16) -> Option<&str> {
        self.symbols.get(ordinal as usize).map(String::as_str)
    }

    /// Ordinal for a symbolic name, if the name is in the table.
    pub fn ordinal_of(&self, symbol: &str) -> Option<u16> {
        self.symbols.iter().position(|s| s == symbol).map(|i| i as u16)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// One declared field of a struct type.
#[derive(Debug)]
pub struct FieldSchema {
    pub name: String,
    pub ty: Type,
}

impl FieldSchema {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_owned(),
            ty,
        }
    }
}

/// A struct type: a named list of fields in declaration order.
#[derive(Debug)]
pub struct StructSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

impl StructSchema {
    pub fn new(name: &str, fields: Vec<FieldSchema>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// The field at declaration index 0.
    ///
    /// When a struct is used as a keyed-list key, this field carries the
    /// JSON member name; selection is by declaration order, never by name.
    pub fn first_field(&self) -> Option<&FieldSchema> {
        self.fields.first()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// An ordered association of Key to Value, encoded as a JSON object whose
/// member names are derived from the keys.
///
/// Construction validates the key type up front: only text, enum, and struct
/// keys can produce a member name, and a struct key must declare at least
/// one field all the way down its first-field chain. Catching this at
/// registration time keeps per-message decode free of schema defects.
#[derive(Debug)]
pub struct ListMapSchema {
    name: String,
    key: Type,
    value: Type,
}

impl ListMapSchema {
    pub fn new(name: &str, key: Type, value: Type) -> Result<Arc<Self>, CodecError> {
        Self::validate_key(&key)?;
        Ok(Arc::new(Self {
            name: name.to_owned(),
            key,
            value,
        }))
    }

    fn validate_key(key: &Type) -> Result<(), CodecError> {
        match key {
            Type::Text | Type::Enum(_) => Ok(()),
            Type::Struct(schema) => {
                let first = schema
                    .first_field()
                    .ok_or_else(|| CodecError::EmptyKeyStruct(schema.name().to_owned()))?;
                Self::validate_key(&first.ty)
            }
            other => Err(CodecError::UnsupportedKeyKind(other.kind())),
        }
    }

    /// Name under which the handler for this type is registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &Type {
        &self.key
    }

    pub fn value(&self) -> &Type {
        &self.value
    }
}
