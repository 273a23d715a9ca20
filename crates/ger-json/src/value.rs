//! Dynamic value tree.
//!
//! Decode produces these values, encode consumes them. They are transient:
//! built per request, read out by the caller, and dropped. Equality compares
//! schema names rather than schema pointers so that fixtures built in tests
//! compare equal to decoded values.

use std::sync::Arc;

use crate::error::CodecError;
use crate::schema::{EnumSchema, StructSchema};

/// A runtime value tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Enum(EnumValue),
    Struct(StructValue),
    List(Vec<DynValue>),
    ListMap(ListMapValue),
}

impl DynValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::ListMap(_) => "listmap",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DynValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_map(&self) -> Option<&ListMapValue> {
        match self {
            Self::ListMap(m) => Some(m),
            _ => None,
        }
    }
}

/// An enum value: its schema plus the ordinal into the name table.
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub schema: Arc<EnumSchema>,
    pub ordinal: u16,
}

impl EnumValue {
    pub fn new(schema: Arc<EnumSchema>, ordinal: u16) -> Self {
        Self { schema, ordinal }
    }

    /// The symbolic name for this value, if the ordinal is in range.
    pub fn symbol(&self) -> Option<&str> {
        self.schema.name_of(self.ordinal)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.ordinal == other.ordinal
    }
}

/// A struct value: one slot per declared field, in declaration order.
///
/// Slots start unset; decode fills only the members present in the input.
#[derive(Debug, Clone)]
pub struct StructValue {
    schema: Arc<StructSchema>,
    fields: Vec<Option<DynValue>>,
}

impl StructValue {
    pub fn new(schema: Arc<StructSchema>) -> Self {
        let fields = vec![None; schema.fields().len()];
        Self { schema, fields }
    }

    pub fn schema(&self) -> &Arc<StructSchema> {
        &self.schema
    }

    pub fn set(&mut self, name: &str, value: DynValue) -> Result<(), CodecError> {
        let index = self.schema.field_index(name).ok_or_else(|| CodecError::UnknownField {
            struct_name: self.schema.name().to_owned(),
            field: name.to_owned(),
        })?;
        self.fields[index] = Some(value);
        Ok(())
    }

    pub fn set_at(&mut self, index: usize, value: DynValue) {
        self.fields[index] = Some(value);
    }

    pub fn get(&self, name: &str) -> Option<&DynValue> {
        let index = self.schema.field_index(name)?;
        self.fields[index].as_ref()
    }

    pub fn get_at(&self, index: usize) -> Option<&DynValue> {
        self.fields.get(index)?.as_ref()
    }

    /// Populated (name, value) pairs in declaration order.
    pub fn populated(&self) -> impl Iterator<Item = (&str, &DynValue)> {
        self.schema
            .fields()
            .iter()
            .zip(self.fields.iter())
            .filter_map(|(f, v)| v.as_ref().map(|v| (f.name.as_str(), v)))
    }
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.fields == other.fields
    }
}

/// One key/value entry of a keyed list.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: DynValue,
    pub value: DynValue,
}

impl Entry {
    pub fn new(key: DynValue, value: DynValue) -> Self {
        Self { key, value }
    }
}

/// An ordered association of Key to Value.
///
/// Order is insertion order and survives an encode/decode round trip. Keys
/// are not required to be unique; entries are never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMapValue {
    pub entries: Vec<Entry>,
}

impl ListMapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: DynValue, value: DynValue) {
        self.entries.push(Entry::new(key, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}
