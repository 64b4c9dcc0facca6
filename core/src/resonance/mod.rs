//! resonance/mod.rs
//! The validated byte partition and its flat canonical projection.
//!
//! Notes:
//! - The partition is supplied, never computed here; it is validated once at load.
//! - After load every lookup is total over `u8`, so the codec and the transform
//!   carry no partiality checks on the hot path.
//! - `ResonanceMap` and `CanonicalDictionary` are immutable and `Send + Sync`:
//!   construct once, then share by reference or `Arc`.

pub mod types;
pub mod loader;
pub mod map;
pub mod dictionary;

pub use types::*;
pub use loader::*;
pub use map::*;
pub use dictionary::*;
