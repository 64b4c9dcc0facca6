//! resonance/loader.rs
//!
//! Partition document layout.
//!
//! Design notes:
//! - `class_to_byte` is authoritative: class id = position, member order = in-class index.
//! - `byte_to_class` is an optional redundant inverse table; when present it must agree.
//! - Members are read as wide integers so an out-of-range value is reported as a
//!   map error instead of an opaque JSON error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::CdpError;

/// One `byte_to_class` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSlot {
    pub class_id: u64,
    pub index: u64,
}

/// Externally supplied partition, exactly as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionData {
    #[serde(alias = "classes")]
    pub class_to_byte: Vec<Vec<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_to_class: Option<BTreeMap<String, ClassSlot>>,
}

impl PartitionData {
    /// Build a document from in-memory classes (no redundant lookup table).
    pub fn from_classes<I, C>(classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = u8>,
    {
        Self {
            class_to_byte: classes
                .into_iter()
                .map(|c| c.into_iter().map(u64::from).collect())
                .collect(),
            byte_to_class: None,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, CdpError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CdpError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Fill in the redundant `byte_to_class` table from `class_to_byte`.
    pub fn with_lookup_table(mut self) -> Self {
        let mut table = BTreeMap::new();
        for (class_id, members) in self.class_to_byte.iter().enumerate() {
            for (index, value) in members.iter().enumerate() {
                table.insert(
                    value.to_string(),
                    ClassSlot { class_id: class_id as u64, index: index as u64 },
                );
            }
        }
        self.byte_to_class = Some(table);
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, CdpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
