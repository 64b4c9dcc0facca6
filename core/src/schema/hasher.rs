//! schema/hasher.rs
//!
//! Non-cryptographic label → tag hashes.
//!
//! Design notes:
//! - A tag is one byte, so collisions are expected across large schemas;
//!   the resolver rejects them at registration.
//! - Any `Fn(&str) -> u8 + Send + Sync` is a hasher, which keeps fixed
//!   test hashes and caller-owned algorithms one closure away.

use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::hasher_ids;
use crate::schema::types::SchemaError;

pub trait TagHasher: Send + Sync {
    fn tag_of(&self, label: &str) -> u8;
}

impl<F> TagHasher for F
where
    F: Fn(&str) -> u8 + Send + Sync,
{
    fn tag_of(&self, label: &str) -> u8 {
        self(label)
    }
}

/// CRC-32 of the label bytes, folded to one byte by XOR of its four bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32TagHasher;

impl TagHasher for Crc32TagHasher {
    fn tag_of(&self, label: &str) -> u8 {
        crc32fast::hash(label.as_bytes())
            .to_le_bytes()
            .iter()
            .fold(0u8, |acc, b| acc ^ b)
    }
}

/// First byte of the BLAKE3 digest of the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3TagHasher;

impl TagHasher for Blake3TagHasher {
    fn tag_of(&self, label: &str) -> u8 {
        blake3::hash(label.as_bytes()).as_bytes()[0]
    }
}

/// Stable ids for the built-in hashers (schema documents, CLI).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    Crc32  = hasher_ids::CRC32,
    Blake3 = hasher_ids::BLAKE3,
}

impl Default for HasherKind {
    fn default() -> Self {
        HasherKind::Crc32
    }
}

impl HasherKind {
    pub fn verify(raw: u8) -> Result<Self, SchemaError> {
        HasherKind::try_from_primitive(raw).map_err(|_| SchemaError::UnknownHasher { raw })
    }

    pub fn name(self) -> &'static str {
        match self {
            HasherKind::Crc32 => "crc32",
            HasherKind::Blake3 => "blake3",
        }
    }
}

impl FromStr for HasherKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crc32" => Ok(HasherKind::Crc32),
            "blake3" => Ok(HasherKind::Blake3),
            _ => Err(SchemaError::UnknownHasherName(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_hashers_are_deterministic() {
        for label in ["heart_rate", "user_id", "", "ß"] {
            assert_eq!(Crc32TagHasher.tag_of(label), Crc32TagHasher.tag_of(label));
            assert_eq!(Blake3TagHasher.tag_of(label), Blake3TagHasher.tag_of(label));
        }
    }

    #[test]
    fn crc32_fold_matches_manual_xor() {
        let crc = crc32fast::hash(b"heart_rate");
        let [a, b, c, d] = crc.to_le_bytes();
        assert_eq!(Crc32TagHasher.tag_of("heart_rate"), a ^ b ^ c ^ d);
    }

    #[test]
    fn closures_are_hashers() {
        let fixed = |_label: &str| 110u8;
        assert_eq!(fixed.tag_of("heart_rate"), 110);
    }

    #[test]
    fn kind_registry() {
        assert_eq!(HasherKind::verify(0x01).unwrap(), HasherKind::Crc32);
        assert_eq!(HasherKind::verify(0x02).unwrap(), HasherKind::Blake3);
        assert!(matches!(HasherKind::verify(0x7f), Err(SchemaError::UnknownHasher { raw: 0x7f })));
        assert_eq!("BLAKE3".parse::<HasherKind>().unwrap(), HasherKind::Blake3);
        assert!("md5".parse::<HasherKind>().is_err());
    }
}
