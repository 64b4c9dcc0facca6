//! schema/registry.rs
//! Hasher registry and factory functions.

use crate::schema::hasher::{Blake3TagHasher, Crc32TagHasher, HasherKind, TagHasher};
use crate::schema::types::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherInfo {
    pub kind: HasherKind,
    pub name: &'static str,
}

pub fn resolve(hasher_id: u8) -> Result<HasherInfo, SchemaError> {
    let kind = HasherKind::verify(hasher_id)?;
    Ok(HasherInfo { kind, name: kind.name() })
}

pub fn create_hasher(kind: HasherKind) -> Box<dyn TagHasher> {
    match kind {
        HasherKind::Crc32 => Box::new(Crc32TagHasher),
        HasherKind::Blake3 => Box::new(Blake3TagHasher),
    }
}
