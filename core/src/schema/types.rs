use std::fmt;

use crate::schema::hasher::HasherKind;
use crate::utils::enum_name_or_hex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two different labels hash to the same tag in one schema.
    AmbiguousTag { tag: u8, existing: String, rejected: String },

    /// Label is unusable (e.g. empty).
    InvalidLabel { label: String, reason: &'static str },

    /// A schema document lists the same field name twice.
    DuplicateLabel { label: String },

    /// A schema document with no fields.
    EmptyFields,

    /// Unknown hasher id.
    UnknownHasher { raw: u8 },

    /// Unknown hasher name.
    UnknownHasherName(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SchemaError::*;
        match self {
            AmbiguousTag { tag, existing, rejected } =>
                write!(f, "ambiguous tag {}: '{}' collides with registered '{}'", tag, rejected, existing),
            InvalidLabel { label, reason } =>
                write!(f, "invalid label '{}': {}", label, reason),
            DuplicateLabel { label } =>
                write!(f, "duplicate field name: '{}'", label),
            EmptyFields =>
                write!(f, "schema 'fields' list cannot be empty"),
            UnknownHasher { raw } =>
                write!(f, "unknown tag hasher: {}", enum_name_or_hex::<HasherKind>(*raw)),
            UnknownHasherName(name) =>
                write!(f, "unknown tag hasher name: '{}'", name),
        }
    }
}

impl std::error::Error for SchemaError {}
