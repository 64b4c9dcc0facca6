use std::fmt;

use crate::cdp::TransformError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The run was cancelled after `chunks_done` chunks completed in order.
    Cancelled { chunks_done: u64 },

    /// A chunk failed the inverse transform. Positions are stream-global.
    Transform(TransformError),

    /// Chunk size outside `1..=MAX_CHUNK_SIZE`.
    InvalidChunkSize { size: usize, max: usize },

    /// Zero workers or zero in-flight slots.
    InvalidProfile(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PipelineError::*;
        match self {
            Cancelled { chunks_done } =>
                write!(f, "pipeline cancelled after {} chunks", chunks_done),
            Transform(e) =>
                write!(f, "transform error: {}", e),
            InvalidChunkSize { size, max } =>
                write!(f, "invalid chunk size {} (must be 1..={})", size, max),
            InvalidProfile(msg) =>
                write!(f, "invalid parallelism profile: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Transform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransformError> for PipelineError {
    fn from(e: TransformError) -> Self {
        PipelineError::Transform(e)
    }
}
