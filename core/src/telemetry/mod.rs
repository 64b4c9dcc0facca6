//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for the codec pipeline.
//!
//! Notes:
//! - Workers keep their own counters and merge them at the end; no atomics
//!   on the hot path.
//! - Snapshots are plain serde values so the CLI can print them as JSON.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
