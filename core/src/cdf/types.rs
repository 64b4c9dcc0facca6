use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::RECORD_LEN;
use crate::utils::fmt_hex;

/// One fixed 3-byte record: `[tag, canonical, delta]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CdfRecord {
    pub tag: u8,
    /// Member 0 of the value's class.
    pub canonical: u8,
    /// `(value - canonical) mod 256`.
    pub delta: u8,
}

impl CdfRecord {
    pub const LEN: usize = RECORD_LEN;

    #[inline]
    pub const fn to_bytes(self) -> [u8; RECORD_LEN] {
        [self.tag, self.canonical, self.delta]
    }

    #[inline]
    pub const fn from_bytes(b: [u8; RECORD_LEN]) -> Self {
        Self { tag: b[0], canonical: b[1], delta: b[2] }
    }

    /// Reconstruct the field value. Needs nothing but the record itself.
    #[inline]
    pub const fn value(self) -> u8 {
        self.canonical.wrapping_add(self.delta)
    }
}

impl fmt::Display for CdfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_hex(&self.to_bytes()))
    }
}

/// A decoded field; the label is borrowed from the schema that resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedField<'s> {
    pub label: &'s str,
    pub value: u8,
}

/// A record dropped under `UnknownTagPolicy::Skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Record position in the stream (not byte offset).
    pub position: usize,
    pub tag: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedStream<'s> {
    pub fields: Vec<DecodedField<'s>>,
    pub skipped: Vec<SkippedRecord>,
}

impl<'s> DecodedStream<'s> {
    pub fn pairs(&self) -> Vec<(&'s str, u8)> {
        self.fields.iter().map(|f| (f.label, f.value)).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// What `decode_stream` does with a tag the schema does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTagPolicy {
    /// Fail the whole decode at the first unknown tag.
    #[default]
    Abort,
    /// Drop the record, note it in `DecodedStream::skipped`, keep going.
    Skip,
}

impl FromStr for UnknownTagPolicy {
    type Err = CdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(UnknownTagPolicy::Abort),
            "skip" => Ok(UnknownTagPolicy::Skip),
            _ => Err(CdfError::Validation(format!("unknown tag policy '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdfError {
    /// Tag absent from the active schema.
    UnknownTag { tag: u8, record: Option<usize> },

    /// Stream length is not a multiple of the record size.
    TruncatedStream { len: usize },

    /// The schema does not resolve the label's tag back to the label.
    UnregisteredLabel { label: String, tag: u8 },

    /// Generic validation failure with context.
    Validation(String),
}

impl fmt::Display for CdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CdfError::*;
        match self {
            UnknownTag { tag, record: Some(record) } =>
                write!(f, "unknown tag {} at record {}", tag, record),
            UnknownTag { tag, record: None } =>
                write!(f, "unknown tag {}", tag),
            TruncatedStream { len } =>
                write!(f, "truncated stream: {} bytes is not a multiple of {}", len, RECORD_LEN),
            UnregisteredLabel { label, tag } =>
                write!(f, "label '{}' (tag {}) is not registered in the schema", label, tag),
            Validation(msg) =>
                write!(f, "cdf validation error: {}", msg),
        }
    }
}

impl std::error::Error for CdfError {}
