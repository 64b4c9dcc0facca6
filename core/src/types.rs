use std::io;
use crate::{
    cdf::CdfError,
    cdp::TransformError,
    pipeline::PipelineError,
    resonance::MapError,
    schema::SchemaError,
};

/// Unified error covering map loading, schema registration, the CDF codec,
/// the CDP transform, and the chunked pipeline.
/// - Ergonomic `From<T>` impls enable `?` across the layers.
/// - Messages aim to be stable and contextual for logs.
#[derive(Debug)]
pub enum CdpError {
    /// I/O error while reading partitions, schemas, or streams.
    Io(io::Error),

    /// Partition or schema document is not valid JSON for its layout.
    Json(serde_json::Error),

    /// The partition does not cover all 256 byte values exactly once.
    Map(MapError),

    /// Schema registration / definition error.
    Schema(SchemaError),

    /// CDF record encode/decode error.
    Cdf(CdfError),

    /// Class/index transform error.
    Transform(TransformError),

    /// Chunked or streaming pipeline error.
    Pipeline(PipelineError),
}

impl std::fmt::Display for CdpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CdpError::Io(e) => write!(f, "I/O error: {}", e),
            CdpError::Json(e) => write!(f, "json error: {}", e),
            CdpError::Map(e) => write!(f, "malformed resonance map: {}", e),
            CdpError::Schema(e) => write!(f, "schema error: {}", e),
            CdpError::Cdf(e) => write!(f, "cdf error: {}", e),
            CdpError::Transform(e) => write!(f, "transform error: {}", e),
            CdpError::Pipeline(e) => write!(f, "pipeline error: {}", e),
        }
    }
}

impl std::error::Error for CdpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CdpError::Io(e) => Some(e),
            CdpError::Json(e) => Some(e),
            CdpError::Map(e) => Some(e),
            CdpError::Schema(e) => Some(e),
            CdpError::Cdf(e) => Some(e),
            CdpError::Transform(e) => Some(e),
            CdpError::Pipeline(e) => Some(e),
        }
    }
}

impl From<io::Error> for CdpError {
    fn from(e: io::Error) -> Self {
        CdpError::Io(e)
    }
}

impl From<serde_json::Error> for CdpError {
    fn from(e: serde_json::Error) -> Self {
        CdpError::Json(e)
    }
}

impl From<MapError> for CdpError {
    fn from(e: MapError) -> Self {
        CdpError::Map(e)
    }
}

impl From<SchemaError> for CdpError {
    fn from(e: SchemaError) -> Self {
        CdpError::Schema(e)
    }
}

impl From<CdfError> for CdpError {
    fn from(e: CdfError) -> Self {
        CdpError::Cdf(e)
    }
}

impl From<TransformError> for CdpError {
    fn from(e: TransformError) -> Self {
        CdpError::Transform(e)
    }
}

impl From<PipelineError> for CdpError {
    fn from(e: PipelineError) -> Self {
        CdpError::Pipeline(e)
    }
}
