//! schema/definition.rs
//!
//! Schema documents.
//!
//! ```json
//! { "name": "vitals_v1", "hasher": "crc32",
//!   "fields": [ { "name": "heart_rate" }, { "name": "spo2" } ] }
//! ```
//!
//! Validation mirrors what the registry cannot see on its own: a non-empty
//! field list and unique, non-empty names. Tag collisions then surface from
//! registration as `AmbiguousTag`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::hasher::HasherKind;
use crate::schema::resolver::Schema;
use crate::schema::types::SchemaError;
use crate::types::CdpError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default = "default_schema_name")]
    pub name: String,
    #[serde(default)]
    pub hasher: HasherKind,
    pub fields: Vec<FieldDefinition>,
}

fn default_schema_name() -> String {
    "untitled".to_owned()
}

impl SchemaDefinition {
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyFields);
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::InvalidLabel {
                    label: field.name.clone(),
                    reason: "field name must not be empty",
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateLabel { label: field.name.clone() });
            }
        }
        Ok(())
    }
}

impl Schema {
    /// Validate a definition and register every field with its declared hasher.
    pub fn from_definition(def: &SchemaDefinition) -> Result<Self, SchemaError> {
        def.validate()?;

        let mut schema = Schema::with_kind(def.name.clone(), def.hasher);
        for field in &def.fields {
            schema.register(&field.name)?;
        }
        log::debug!(
            "schema '{}' loaded: {} fields, hasher {}",
            schema.name(),
            schema.len(),
            def.hasher.name()
        );
        Ok(schema)
    }

    pub fn from_json_str(s: &str) -> Result<Self, CdpError> {
        let def: SchemaDefinition = serde_json::from_str(s)?;
        Ok(Self::from_definition(&def)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CdpError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
