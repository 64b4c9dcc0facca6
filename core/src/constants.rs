/// Size of the byte alphabet every partition must cover exactly once.
pub const BYTE_SPACE: usize = 256;

/// A CDF record is always `[tag, canonical, delta]`.
pub const RECORD_LEN: usize = 3;

/// Class ids travel as single bytes in the class stream.
pub const MAX_CLASSES: usize = 256;

/// Defaults when no chunk size is requested (streaming / chunked transform).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KB
/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// Default bound on chunks in flight between the reader and the workers.
pub const DEFAULT_INFLIGHT_CHUNKS: usize = 8;

/// Default zstd level used when profiling derived channels.
pub const DEFAULT_ANALYSIS_LEVEL: i32 = 19;

/// The standard 96-class partition (32 quads, 64 pairs) in the
/// `class_to_byte` / `byte_to_class` document layout.
pub const STANDARD_MAP_JSON: &str = include_str!("../data/resonance_map.json");

/// Stable tag hasher identifiers (mirrored in schema documents and the CLI).
pub mod hasher_ids {
    pub const CRC32: u8  = 0x01;
    pub const BLAKE3: u8 = 0x02;
}
