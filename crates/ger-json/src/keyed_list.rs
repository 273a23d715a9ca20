//! Keyed-list handler.
//!
//! Translates between an ordered list of key/value entries and JSON's native
//! object-of-named-values form. Encoding derives a member name from each
//! entry's key; decoding reconstructs a key of the declared type from each
//! member name. The value half of every entry goes through the dispatcher
//! against its static type.
//!
//! The handler holds no state, so one instance can be registered for several
//! (Key, Value) pairs and shared across threads.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::{JsonCodec, TypeHandler};
use crate::error::CodecError;
use crate::schema::{ListMapSchema, Type};
use crate::value::{DynValue, ListMapValue, StructValue};

/// The key kinds a keyed list can name its members after.
///
/// Closed set: anything else fails loudly instead of being skipped.
enum KeyKind<'a> {
    Text(&'a str),
    Enum(&'a crate::value::EnumValue),
    Struct(&'a StructValue),
    Unsupported(&'static str),
}

fn classify(key: &DynValue) -> KeyKind<'_> {
    match key {
        DynValue::Text(s) => KeyKind::Text(s),
        DynValue::Enum(e) => KeyKind::Enum(e),
        DynValue::Struct(s) => KeyKind::Struct(s),
        other => KeyKind::Unsupported(other.kind()),
    }
}

/// Derives the JSON member name for a key value.
///
/// Text is used verbatim; enums contribute their symbolic name from the same
/// table the dispatcher uses; structs recurse into the value of their first
/// declared field. The key's value half is never touched.
fn derive_key_name(key: &DynValue) -> Result<String, CodecError> {
    match classify(key) {
        KeyKind::Text(s) => Ok(s.to_owned()),
        KeyKind::Enum(e) => {
            let symbol = e.symbol().ok_or_else(|| CodecError::UnknownEnumOrdinal {
                enum_name: e.schema.name().to_owned(),
                ordinal: e.ordinal,
            })?;
            Ok(symbol.to_owned())
        }
        KeyKind::Struct(s) => {
            s.schema()
                .first_field()
                .ok_or_else(|| CodecError::EmptyKeyStruct(s.schema().name().to_owned()))?;
            let first = s.get_at(0).ok_or(CodecError::EmptyKeyName)?;
            derive_key_name(first)
        }
        KeyKind::Unsupported(kind) => Err(CodecError::UnsupportedKeyKind(kind)),
    }
}

/// Reconstructs a key value of the declared type from a JSON member name.
///
/// The dual of [`derive_key_name`]: struct keys are built fresh with only
/// their first declared field populated, all other fields left unset.
fn reconstruct_key(name: &str, key_type: &Type) -> Result<DynValue, CodecError> {
    match key_type {
        Type::Text => Ok(DynValue::Text(name.to_owned())),
        Type::Enum(schema) => {
            let ordinal = schema
                .ordinal_of(name)
                .ok_or_else(|| CodecError::UnknownEnumName {
                    enum_name: schema.name().to_owned(),
                    name: name.to_owned(),
                })?;
            Ok(DynValue::Enum(crate::value::EnumValue::new(
                Arc::clone(schema),
                ordinal,
            )))
        }
        Type::Struct(schema) => {
            let first = schema
                .first_field()
                .ok_or_else(|| CodecError::EmptyKeyStruct(schema.name().to_owned()))?;
            let mut out = StructValue::new(Arc::clone(schema));
            out.set_at(0, reconstruct_key(name, &first.ty)?);
            Ok(DynValue::Struct(out))
        }
        other => Err(CodecError::UnsupportedKeyKind(other.kind())),
    }
}

/// Dispatcher plugin for "ordered association of Key to Value" types.
pub struct KeyedListHandler;

impl KeyedListHandler {
    /// Registers a shared handler instance for a keyed-list schema.
    pub fn register(codec: &mut JsonCodec, schema: &Arc<ListMapSchema>) {
        codec.add_type_handler(schema.name(), Arc::new(Self));
    }
}

impl TypeHandler for KeyedListHandler {
    fn encode(
        &self,
        codec: &JsonCodec,
        value: &DynValue,
        ty: &Type,
    ) -> Result<Option<Value>, CodecError> {
        let Type::ListMap(schema) = ty else {
            return Err(CodecError::TypeMismatch {
                expected: "listmap",
                found: ty.kind(),
            });
        };
        let map = match value {
            DynValue::ListMap(map) => map,
            DynValue::Null => return Ok(None),
            other => {
                return Err(CodecError::TypeMismatch {
                    expected: "listmap",
                    found: other.kind(),
                })
            }
        };
        // An empty association is absent, not `{}`, mirroring how other
        // optional fields are omitted from their parent object.
        if map.is_empty() {
            return Ok(None);
        }
        let mut object = Map::with_capacity(map.len());
        for entry in map.iter() {
            let name = derive_key_name(&entry.key)?;
            if name.is_empty() {
                return Err(CodecError::EmptyKeyName);
            }
            let encoded = codec
                .encode(&entry.value, schema.value())?
                .unwrap_or(Value::Null);
            // A JSON object cannot hold two members with one name; failing
            // beats silently dropping an entry.
            if object.insert(name.clone(), encoded).is_some() {
                return Err(CodecError::DuplicateKeyName(name));
            }
        }
        Ok(Some(Value::Object(object)))
    }

    fn decode(&self, codec: &JsonCodec, input: &Value, ty: &Type) -> Result<DynValue, CodecError> {
        let Type::ListMap(schema) = ty else {
            return Err(CodecError::TypeMismatch {
                expected: "listmap",
                found: ty.kind(),
            });
        };
        // Anything that is not an object (missing, null, array, scalar)
        // decodes as an empty association.
        let Some(members) = input.as_object() else {
            return Ok(DynValue::ListMap(ListMapValue::new()));
        };
        let mut out = ListMapValue::with_capacity(members.len());
        for (name, member) in members {
            // Keys must round trip; an empty member name could never have
            // been derived from one.
            if name.is_empty() {
                return Err(CodecError::EmptyKeyName);
            }
            let key = reconstruct_key(name, schema.key())?;
            let value = codec.decode(member, schema.value())?;
            out.push(key, value);
        }
        Ok(DynValue::ListMap(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumSchema, FieldSchema, StructSchema};
    use crate::value::EnumValue;

    #[test]
    fn derive_text_key_verbatim() {
        assert_eq!(derive_key_name(&DynValue::Text("refs/heads/master".into())).unwrap(), "refs/heads/master");
    }

    #[test]
    fn derive_enum_key_uses_symbolic_name() {
        let schema = EnumSchema::new("ReviewerState", &["REVIEWER", "CC", "REMOVED"]);
        let key = DynValue::Enum(EnumValue::new(schema, 1));
        assert_eq!(derive_key_name(&key).unwrap(), "CC");
    }

    #[test]
    fn derive_enum_key_out_of_range_fails() {
        let schema = EnumSchema::new("ReviewerState", &["REVIEWER", "CC"]);
        let key = DynValue::Enum(EnumValue::new(schema, 7));
        let err = derive_key_name(&key).unwrap_err();
        assert!(matches!(err, CodecError::UnknownEnumOrdinal { ordinal: 7, .. }));
    }

    #[test]
    fn derive_struct_key_recurses_into_first_declared_field() {
        let schema = StructSchema::new(
            "LabelKey",
            vec![
                FieldSchema::new("label", Type::Text),
                FieldSchema::new("weight", Type::Int),
            ],
        );
        let mut key = StructValue::new(schema);
        key.set("label", DynValue::Text("Code-Review".into())).unwrap();
        key.set("weight", DynValue::Int(2)).unwrap();
        assert_eq!(derive_key_name(&DynValue::Struct(key)).unwrap(), "Code-Review");
    }

    #[test]
    fn derive_struct_key_with_unset_first_field_fails() {
        let schema = StructSchema::new(
            "LabelKey",
            vec![
                FieldSchema::new("label", Type::Text),
                FieldSchema::new("weight", Type::Int),
            ],
        );
        let mut key = StructValue::new(schema);
        key.set("weight", DynValue::Int(2)).unwrap();
        let err = derive_key_name(&DynValue::Struct(key)).unwrap_err();
        assert!(matches!(err, CodecError::EmptyKeyName));
    }

    #[test]
    fn derive_unsupported_key_kind_fails_loudly() {
        let err = derive_key_name(&DynValue::Int(42)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedKeyKind("int")));
        let err = derive_key_name(&DynValue::List(vec![])).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedKeyKind("list")));
    }

    #[test]
    fn reconstruct_text_key_copies_name() {
        let key = reconstruct_key("alpha", &Type::Text).unwrap();
        assert_eq!(key, DynValue::Text("alpha".into()));
    }

    #[test]
    fn reconstruct_enum_key_by_name() {
        let schema = EnumSchema::new("ReviewerState", &["REVIEWER", "CC"]);
        let key = reconstruct_key("CC", &Type::Enum(Arc::clone(&schema))).unwrap();
        assert_eq!(key, DynValue::Enum(EnumValue::new(schema, 1)));
    }

    #[test]
    fn reconstruct_unknown_enum_name_fails() {
        let schema = EnumSchema::new("ReviewerState", &["REVIEWER", "CC"]);
        let err = reconstruct_key("BOGUS", &Type::Enum(schema)).unwrap_err();
        assert!(matches!(err, CodecError::UnknownEnumName { name, .. } if name == "BOGUS"));
    }

    #[test]
    fn reconstruct_struct_key_fills_only_first_field() {
        let schema = StructSchema::new(
            "LabelKey",
            vec![
                FieldSchema::new("label", Type::Text),
                FieldSchema::new("weight", Type::Int),
            ],
        );
        let key = reconstruct_key("Verified", &Type::Struct(schema)).unwrap();
        let s = key.as_struct().unwrap();
        assert_eq!(s.get("label"), Some(&DynValue::Text("Verified".into())));
        assert!(s.get("weight").is_none());
    }

    #[test]
    fn reconstruct_unsupported_declared_kind_fails() {
        let err = reconstruct_key("x", &Type::Int).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedKeyKind("int")));
    }
}
