use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, RECORD_LEN};

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

pub fn fmt_hex(b: &[u8]) -> String {
    format!("0x{}", hex::encode(b))
}

/// Resolve a requested chunk size into one the chunked transform accepts.
///
/// - `None` falls back to `DEFAULT_CHUNK_SIZE`.
/// - Sizes are clamped into `1..=MAX_CHUNK_SIZE`.
/// - `record_aligned` raises the floor to `RECORD_LEN` and rounds down to a
///   whole number of CDF records so a chunk never splits `[tag, canonical, delta]`.
pub fn best_chunk_size(requested: Option<usize>, record_aligned: bool) -> usize {
    let requested = requested.unwrap_or(DEFAULT_CHUNK_SIZE);

    if record_aligned {
        let size = requested.clamp(RECORD_LEN, MAX_CHUNK_SIZE);
        size - size % RECORD_LEN
    } else {
        requested.clamp(1, MAX_CHUNK_SIZE)
    }
}
