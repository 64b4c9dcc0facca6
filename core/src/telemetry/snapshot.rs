//! telemetry/snapshot.rs
//!
//! Immutable telemetry snapshot.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub records_encoded: u64,
    pub records_decoded: u64,
    pub records_skipped: u64,
    pub bytes_forward: u64,
    pub bytes_inverse: u64,
    pub chunks: u64,
    /// Share of forward-transformed positions with index zero.
    pub zero_index_ratio: f64,
    /// Bytes through the transform (either direction) per second.
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let zero_index_ratio = if counters.bytes_forward > 0 {
            counters.zero_indices as f64 / counters.bytes_forward as f64
        } else {
            0.0
        };

        let moved = counters.bytes_forward + counters.bytes_inverse;
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            moved as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            records_encoded: counters.records_encoded,
            records_decoded: counters.records_decoded,
            records_skipped: counters.records_skipped,
            bytes_forward: counters.bytes_forward,
            bytes_inverse: counters.bytes_inverse,
            chunks: counters.chunks,
            zero_index_ratio,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants: ratio in `[0, 1]`, stage sum within elapsed.
    pub fn sanity_check(&self) -> bool {
        (0.0..=1.0).contains(&self.zero_index_ratio)
            && self.total_stage_time() <= self.elapsed
    }
}
