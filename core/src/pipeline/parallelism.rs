use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_INFLIGHT_CHUNKS, MAX_CHUNK_SIZE};
use crate::pipeline::types::PipelineError;
use crate::utils::best_chunk_size;

/// Parallelism configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
    /// Bound on queued chunks per channel.
    pub inflight_chunks: usize,
    pub chunk_size: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::single_threaded()
    }
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self {
            worker_count: 1,
            inflight_chunks: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// One worker per core, leaving one core free. Chunks hold whole CDF
    /// records, so each worker sees `[tag, canonical, delta]` triples intact.
    pub fn dynamic() -> Self {
        let worker_count = num_cpus::get().saturating_sub(1).max(1);
        let profile = Self {
            worker_count,
            inflight_chunks: (worker_count * 2).max(DEFAULT_INFLIGHT_CHUNKS),
            chunk_size: best_chunk_size(None, true),
        };
        log::debug!(
            "[PROFILE] workers={}, inflight_chunks={}, chunk_size={}",
            profile.worker_count,
            profile.inflight_chunks,
            profile.chunk_size
        );
        profile
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_inflight_chunks(mut self, inflight_chunks: usize) -> Self {
        self.inflight_chunks = inflight_chunks;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(PipelineError::InvalidChunkSize { size: self.chunk_size, max: MAX_CHUNK_SIZE });
        }
        if self.worker_count == 0 {
            return Err(PipelineError::InvalidProfile("worker_count must be at least 1".into()));
        }
        if self.inflight_chunks == 0 {
            return Err(PipelineError::InvalidProfile("inflight_chunks must be at least 1".into()));
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared between a caller and a running pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
