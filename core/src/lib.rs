//! cdp-core
//!
//! Canonical dictionary (CDF) record codec and class/index (CDP) byte
//! transform over an externally supplied resonance partition.
//! No encryption, no framing, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Partition, schema, codec, transform
pub mod resonance;
pub mod schema;
pub mod cdf;
pub mod cdp;

pub mod analysis;
pub mod telemetry;

// Composition layers
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::cdf::{CdfCodec, CdfRecord, DecodedField, UnknownTagPolicy};
    pub use crate::cdp::{forward, inverse, DerivedStreams};
    pub use crate::pipeline::{CancellationToken, ParallelismProfile, Pipeline};
    pub use crate::resonance::{CanonicalDictionary, ResonanceMap};
    pub use crate::schema::{Schema, TagHasher, TagResolver};
    pub use crate::types::CdpError;
}
