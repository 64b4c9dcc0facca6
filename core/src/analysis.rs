//! analysis.rs
//!
//! Channel statistics: how much of the source's information ends up in the
//! sparse index stream versus the structural class stream.
//!
//! zstd size is a practical stand-in for how cheaply a channel can be
//! stored or protected downstream. Nothing here is part of the codec.

use serde::{Deserialize, Serialize};

use crate::cdp;
use crate::resonance::ResonanceMap;
use crate::types::CdpError;

/// Shannon entropy in bits per byte. `0.0` for empty input.
pub fn shannon_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in bytes {
        counts[b as usize] += 1;
    }
    let n = bytes.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamProfile {
    pub len: usize,
    pub entropy_bits: f64,
    pub distinct_symbols: usize,
    /// Share of zero bytes.
    pub zero_ratio: f64,
    pub zstd_len: usize,
}

impl StreamProfile {
    /// Compressed over raw size; `0.0` for empty input.
    pub fn zstd_ratio(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.zstd_len as f64 / self.len as f64
        }
    }
}

pub fn profile_stream(bytes: &[u8], zstd_level: i32) -> Result<StreamProfile, CdpError> {
    let mut seen = [false; 256];
    let mut zeros = 0usize;
    for &b in bytes {
        seen[b as usize] = true;
        if b == 0 {
            zeros += 1;
        }
    }

    let zstd_len = zstd::bulk::compress(bytes, zstd_level)?.len();

    Ok(StreamProfile {
        len: bytes.len(),
        entropy_bits: shannon_entropy(bytes),
        distinct_symbols: seen.iter().filter(|&&s| s).count(),
        zero_ratio: if bytes.is_empty() { 0.0 } else { zeros as f64 / bytes.len() as f64 },
        zstd_len,
    })
}

/// Source stream next to both derived channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub source: StreamProfile,
    pub class: StreamProfile,
    pub index: StreamProfile,
}

pub fn analyze(bytes: &[u8], map: &ResonanceMap, zstd_level: i32) -> Result<ChannelReport, CdpError> {
    let streams = cdp::forward(bytes, map);
    let report = ChannelReport {
        source: profile_stream(bytes, zstd_level)?,
        class: profile_stream(&streams.class_stream, zstd_level)?,
        index: profile_stream(&streams.index_stream, zstd_level)?,
    };
    log::debug!(
        "analysis: source H={:.3} class H={:.3} index H={:.3} (zero ratio {:.3})",
        report.source.entropy_bits,
        report.class.entropy_bits,
        report.index.entropy_bits,
        report.index.zero_ratio
    );
    Ok(report)
}
