use thiserror::Error;

/// Errors raised while encoding or decoding values against a schema.
///
/// A failure for any entry or member aborts the whole encode/decode of the
/// field it belongs to; there is no partial-success mode.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The key of a keyed list is neither text, enum, nor struct.
    #[error("unsupported key kind: {0}")]
    UnsupportedKeyKind(&'static str),

    /// A JSON member name did not match any symbolic name of the key enum.
    #[error("unknown name {name:?} for enum {enum_name}")]
    UnknownEnumName { enum_name: String, name: String },

    /// An enum value holds an ordinal outside its name table.
    #[error("ordinal {ordinal} out of range for enum {enum_name}")]
    UnknownEnumOrdinal { enum_name: String, ordinal: u16 },

    /// A struct used as a keyed-list key declares no fields, so there is no
    /// first field to derive the member name from.
    #[error("key struct {0} declares no fields")]
    EmptyKeyStruct(String),

    /// Key derivation produced an empty string, which is not a legal member
    /// name for a keyed list.
    #[error("derived key name is empty")]
    EmptyKeyName,

    /// Two entries of a keyed list derived the same member name; a JSON
    /// object cannot represent both.
    #[error("duplicate key name {0:?} in keyed list")]
    DuplicateKeyName(String),

    /// A keyed-list type was encountered with no handler registered for it.
    #[error("no handler registered for type {0}")]
    UnregisteredHandler(String),

    #[error("struct {struct_name} has no field {field:?}")]
    UnknownField { struct_name: String, field: String },

    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
