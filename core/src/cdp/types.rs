use std::fmt;

/// The two positionally aligned outputs of the forward transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedStreams {
    pub class_stream: Vec<u8>,
    pub index_stream: Vec<u8>,
}

impl DerivedStreams {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            class_stream: Vec::with_capacity(n),
            index_stream: Vec::with_capacity(n),
        }
    }

    /// Source length. Both streams always have it.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.class_stream.len(), self.index_stream.len());
        self.class_stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Share of positions whose in-class index is zero. `0.0` when empty.
    pub fn zero_index_ratio(&self) -> f64 {
        if self.index_stream.is_empty() {
            return 0.0;
        }
        let zeros = self.index_stream.iter().filter(|&&i| i == 0).count();
        zeros as f64 / self.index_stream.len() as f64
    }

    pub fn append(&mut self, other: &mut DerivedStreams) {
        self.class_stream.append(&mut other.class_stream);
        self.index_stream.append(&mut other.index_stream);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Class and index streams differ in length.
    LengthMismatch { class_len: usize, index_len: usize },

    /// Class id the map does not define.
    UnknownClass { position: usize, class_id: u8, class_count: usize },

    /// Index past the end of its class.
    IndexOutOfRange { position: usize, class_id: u8, index: u8, member_count: usize },
}

impl TransformError {
    pub fn position(&self) -> Option<usize> {
        match self {
            TransformError::LengthMismatch { .. } => None,
            TransformError::UnknownClass { position, .. }
            | TransformError::IndexOutOfRange { position, .. } => Some(*position),
        }
    }

    /// Shift a chunk-local position to a stream-global one.
    pub fn offset_by(self, base: usize) -> Self {
        match self {
            TransformError::UnknownClass { position, class_id, class_count } =>
                TransformError::UnknownClass { position: position + base, class_id, class_count },
            TransformError::IndexOutOfRange { position, class_id, index, member_count } =>
                TransformError::IndexOutOfRange { position: position + base, class_id, index, member_count },
            other => other,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TransformError::*;
        match self {
            LengthMismatch { class_len, index_len } =>
                write!(f, "stream length mismatch: class stream {} bytes, index stream {} bytes", class_len, index_len),
            UnknownClass { position, class_id, class_count } =>
                write!(f, "unknown class {} at position {} (map has {} classes)", class_id, position, class_count),
            IndexOutOfRange { position, class_id, index, member_count } =>
                write!(f, "index {} out of range at position {}: class {} has {} members", index, position, class_id, member_count),
        }
    }
}

impl std::error::Error for TransformError {}
