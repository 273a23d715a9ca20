//! The codec dispatcher.
//!
//! Routes encode and decode requests to per-kind logic based on the value's
//! declared [`Type`]. Keyed-list types are routed to handler instances
//! registered per concrete (Key, Value) pair; both directions resolve to the
//! same instance so nested association types decode consistently.
//!
//! Encode returns `Option<Value>`: `None` means "absent", and the parent
//! struct or keyed list omits the member entirely instead of emitting a
//! placeholder.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Number, Value};

use crate::error::CodecError;
use crate::schema::Type;
use crate::value::{DynValue, EnumValue, StructValue};

/// A per-type encode/decode plugin.
///
/// Handlers must be stateless: a single instance may serve concurrent
/// encode/decode calls without locking.
pub trait TypeHandler: Send + Sync {
    fn encode(
        &self,
        codec: &JsonCodec,
        value: &DynValue,
        ty: &Type,
    ) -> Result<Option<Value>, CodecError>;

    fn decode(&self, codec: &JsonCodec, input: &Value, ty: &Type) -> Result<DynValue, CodecError>;
}

/// Schema-driven JSON encoder/decoder.
///
/// Holds only the handler registry, populated once at startup; encode and
/// decode are pure computations over in-memory trees.
#[derive(Default)]
pub struct JsonCodec {
    handlers: HashMap<String, Arc<dyn TypeHandler>>,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a named type. Both encode and decode route
    /// through the registered instance.
    pub fn add_type_handler(&mut self, name: &str, handler: Arc<dyn TypeHandler>) {
        self.handlers.insert(name.to_owned(), handler);
    }

    fn handler(&self, name: &str) -> Result<&Arc<dyn TypeHandler>, CodecError> {
        self.handlers
            .get(name)
            .ok_or_else(|| CodecError::UnregisteredHandler(name.to_owned()))
    }

    /// Encodes a value against its declared type.
    ///
    /// `Ok(None)` signals an absent value; the caller omits the field.
    pub fn encode(&self, value: &DynValue, ty: &Type) -> Result<Option<Value>, CodecError> {
        if let DynValue::Null = value {
            return Ok(None);
        }
        match ty {
            Type::Bool => match value {
                DynValue::Bool(b) => Ok(Some(Value::Bool(*b))),
                other => Err(mismatch("bool", other)),
            },
            Type::Int => match value {
                DynValue::Int(n) => Ok(Some(Value::Number(Number::from(*n)))),
                other => Err(mismatch("int", other)),
            },
            Type::Float => match value {
                DynValue::Float(f) => Ok(Some(
                    Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
                )),
                DynValue::Int(n) => Ok(Some(Value::Number(Number::from(*n)))),
                other => Err(mismatch("float", other)),
            },
            Type::Text => match value {
                DynValue::Text(s) => Ok(Some(Value::String(s.clone()))),
                other => Err(mismatch("text", other)),
            },
            Type::Enum(schema) => match value {
                DynValue::Enum(e) => {
                    let symbol =
                        schema
                            .name_of(e.ordinal)
                            .ok_or_else(|| CodecError::UnknownEnumOrdinal {
                                enum_name: schema.name().to_owned(),
                                ordinal: e.ordinal,
                            })?;
                    Ok(Some(Value::String(symbol.to_owned())))
                }
                other => Err(mismatch("enum", other)),
            },
            Type::Struct(schema) => match value {
                DynValue::Struct(s) => {
                    let mut object = Map::new();
                    for (index, field) in schema.fields().iter().enumerate() {
                        if let Some(field_value) = s.get_at(index) {
                            if let Some(encoded) = self.encode(field_value, &field.ty)? {
                                object.insert(field.name.clone(), encoded);
                            }
                        }
                    }
                    Ok(Some(Value::Object(object)))
                }
                other => Err(mismatch("struct", other)),
            },
            Type::List(element) => match value {
                DynValue::List(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(self.encode(item, element)?.unwrap_or(Value::Null));
                    }
                    Ok(Some(Value::Array(out)))
                }
                other => Err(mismatch("list", other)),
            },
            Type::ListMap(schema) => self.handler(schema.name())?.encode(self, value, ty),
        }
    }

    /// Decodes a JSON value against its declared type.
    pub fn decode(&self, input: &Value, ty: &Type) -> Result<DynValue, CodecError> {
        if let Type::ListMap(schema) = ty {
            return self.handler(schema.name())?.decode(self, input, ty);
        }
        if input.is_null() {
            return Ok(DynValue::Null);
        }
        match ty {
            Type::Bool => input
                .as_bool()
                .map(DynValue::Bool)
                .ok_or_else(|| json_mismatch("bool", input)),
            Type::Int => input
                .as_i64()
                .map(DynValue::Int)
                .ok_or_else(|| json_mismatch("int", input)),
            Type::Float => input
                .as_f64()
                .map(DynValue::Float)
                .ok_or_else(|| json_mismatch("float", input)),
            Type::Text => input
                .as_str()
                .map(|s| DynValue::Text(s.to_owned()))
                .ok_or_else(|| json_mismatch("text", input)),
            Type::Enum(schema) => {
                let symbol = input.as_str().ok_or_else(|| json_mismatch("enum", input))?;
                let ordinal =
                    schema
                        .ordinal_of(symbol)
                        .ok_or_else(|| CodecError::UnknownEnumName {
                            enum_name: schema.name().to_owned(),
                            name: symbol.to_owned(),
                        })?;
                Ok(DynValue::Enum(EnumValue::new(Arc::clone(schema), ordinal)))
            }
            Type::Struct(schema) => {
                let object = input
                    .as_object()
                    .ok_or_else(|| json_mismatch("struct", input))?;
                let mut out = StructValue::new(Arc::clone(schema));
                for (index, field) in schema.fields().iter().enumerate() {
                    // Members the schema does not declare are ignored; the
                    // server is free to grow its responses.
                    if let Some(member) = object.get(&field.name) {
                        out.set_at(index, self.decode(member, &field.ty)?);
                    }
                }
                Ok(DynValue::Struct(out))
            }
            Type::List(element) => {
                let items = input
                    .as_array()
                    .ok_or_else(|| json_mismatch("list", input))?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.decode(item, element)?);
                }
                Ok(DynValue::List(out))
            }
            Type::ListMap(_) => unreachable!("handled above"),
        }
    }
}

fn mismatch(expected: &'static str, found: &DynValue) -> CodecError {
    CodecError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

fn json_mismatch(expected: &'static str, found: &Value) -> CodecError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    CodecError::TypeMismatch { expected, found }
}
