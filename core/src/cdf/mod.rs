//! Canonical dictionary field (CDF) codec.
//!
//! Responsibilities:
//! - Rewrite `(label, value)` into `[tag, canonical, delta]` records
//! - Decode records back with a strict or skipping unknown-tag policy
//! - Project a subset of tags out of a record stream
//!
//! Non-responsibilities:
//! - Framing or length prefixes (the stream is a bare concatenation)
//! - Tag collision handling (the schema rejects those at registration)
//! - The class/index transform

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    CdfError,
    CdfRecord,
    DecodedField,
    DecodedStream,
    SkippedRecord,
    UnknownTagPolicy,
};
pub use encode::{
    CdfCodec,
};
pub use decode::{
    decode_field,
    decode_stream,
    project,
    records,
};
