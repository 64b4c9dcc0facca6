//! telemetry/counters.rs
//! Mutable counters collected while encoding, transforming and decoding.
//!
//! Converted into an immutable `TelemetrySnapshot` at pipeline end.
use std::ops::AddAssign;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryCounters {
    pub records_encoded: u64,
    pub records_decoded: u64,
    pub records_skipped: u64,
    pub bytes_forward: u64,
    pub bytes_inverse: u64,
    /// Index-stream positions equal to zero.
    pub zero_indices: u64,
    pub chunks: u64,
}

impl TelemetryCounters {
    pub fn add_encoded(&mut self, records: usize) {
        self.records_encoded += records as u64;
    }

    pub fn add_decoded(&mut self, records: usize, skipped: usize) {
        self.records_decoded += records as u64;
        self.records_skipped += skipped as u64;
    }

    /// Record one forward-transformed chunk.
    ///
    /// - `len`: source bytes in the chunk
    /// - `zero_indices`: positions whose in-class index is zero
    pub fn add_forward(&mut self, len: usize, zero_indices: usize) {
        self.chunks += 1;
        self.bytes_forward += len as u64;
        self.zero_indices += zero_indices as u64;
    }

    pub fn add_inverse(&mut self, len: usize) {
        self.chunks += 1;
        self.bytes_inverse += len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.records_encoded += other.records_encoded;
        self.records_decoded += other.records_decoded;
        self.records_skipped += other.records_skipped;
        self.bytes_forward += other.bytes_forward;
        self.bytes_inverse += other.bytes_inverse;
        self.zero_indices += other.zero_indices;
        self.chunks += other.chunks;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_every_field() {
        let mut a = TelemetryCounters::default();
        a.add_encoded(3);
        a.add_forward(9, 6);

        let mut b = TelemetryCounters::default();
        b.add_decoded(2, 1);
        b.add_inverse(9);

        a += b;
        assert_eq!(a.records_encoded, 3);
        assert_eq!(a.records_decoded, 2);
        assert_eq!(a.records_skipped, 1);
        assert_eq!(a.bytes_forward, 9);
        assert_eq!(a.bytes_inverse, 9);
        assert_eq!(a.zero_indices, 6);
        assert_eq!(a.chunks, 2);
    }
}
