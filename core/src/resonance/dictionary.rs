//! resonance/dictionary.rs
//!
//! Flat canonical projection used by the CDF encoder.
//! Two 256-entry tables, built in one pass from a validated map.

use crate::constants::BYTE_SPACE;
use crate::resonance::map::ResonanceMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDictionary {
    canonical: [u8; BYTE_SPACE],
    index: [u8; BYTE_SPACE],
}

impl CanonicalDictionary {
    pub fn new(map: &ResonanceMap) -> Self {
        let mut canonical = [0u8; BYTE_SPACE];
        let mut index = [0u8; BYTE_SPACE];

        for byte in 0..=u8::MAX {
            canonical[byte as usize] = map.canonical_of(byte);
            index[byte as usize] = map.index_of(byte);
        }

        let dict = Self { canonical, index };
        debug_assert!((0..=u8::MAX).all(|b| {
            let c = dict.canonical_of(b);
            dict.canonical_of(c) == c && dict.index_of(c) == 0
        }));
        dict
    }

    /// Member 0 of the byte's class.
    #[inline]
    pub fn canonical_of(&self, byte: u8) -> u8 {
        self.canonical[byte as usize]
    }

    /// Position of the byte within its class.
    #[inline]
    pub fn index_of(&self, byte: u8) -> u8 {
        self.index[byte as usize]
    }

    #[inline]
    pub fn is_canonical(&self, byte: u8) -> bool {
        self.index[byte as usize] == 0
    }
}

impl From<&ResonanceMap> for CanonicalDictionary {
    fn from(map: &ResonanceMap) -> Self {
        Self::new(map)
    }
}
