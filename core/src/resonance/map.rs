//! resonance/map.rs
//!
//! Validated partition of the byte space into ordered classes.
//!
//! Design notes:
//! - Validation happens exactly once, in `load`; nothing can construct an
//!   unvalidated map.
//! - Two flat 256-entry tables answer `class_of` / `index_of` in O(1).
//! - Class ids are single bytes (at most 256 classes, since classes are non-empty).

use std::path::Path;

use crate::constants::{BYTE_SPACE, MAX_CLASSES, STANDARD_MAP_JSON};
use crate::resonance::loader::PartitionData;
use crate::resonance::types::{MapError, ResonanceClass};
use crate::types::CdpError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResonanceMap {
    classes: Vec<Vec<u8>>,
    byte_to_class: [u8; BYTE_SPACE],
    byte_to_index: [u8; BYTE_SPACE],
}

impl ResonanceMap {
    /// Validate a partition document and build the lookup tables.
    ///
    /// # Errors
    /// Any gap, overlap, empty class, or out-of-range member is a `MapError`.
    pub fn load(data: &PartitionData) -> Result<Self, MapError> {
        let class_count = data.class_to_byte.len();
        if class_count == 0 {
            return Err(MapError::NoClasses);
        }
        if class_count > MAX_CLASSES {
            return Err(MapError::TooManyClasses { have: class_count, max: MAX_CLASSES });
        }

        // owner[b] = class that claimed byte b first
        let mut owner: [Option<usize>; BYTE_SPACE] = [None; BYTE_SPACE];
        let mut byte_to_class = [0u8; BYTE_SPACE];
        let mut byte_to_index = [0u8; BYTE_SPACE];
        let mut classes = Vec::with_capacity(class_count);

        for (class_id, raw_members) in data.class_to_byte.iter().enumerate() {
            if raw_members.is_empty() {
                return Err(MapError::EmptyClass { class_id });
            }

            let mut members = Vec::with_capacity(raw_members.len());
            for (index, &value) in raw_members.iter().enumerate() {
                let byte = u8::try_from(value)
                    .map_err(|_| MapError::ValueOutOfRange { class_id, value })?;

                if let Some(first_class) = owner[byte as usize] {
                    return Err(MapError::DuplicateByte { byte, first_class, second_class: class_id });
                }
                owner[byte as usize] = Some(class_id);

                // class_id < 256 and index < 256 are implied by the checks above
                byte_to_class[byte as usize] = class_id as u8;
                byte_to_index[byte as usize] = index as u8;
                members.push(byte);
            }
            classes.push(members);
        }

        if let Some(missing) = owner.iter().position(Option::is_none) {
            return Err(MapError::MissingByte { byte: missing as u8 });
        }

        if let Some(table) = &data.byte_to_class {
            if table.len() != BYTE_SPACE {
                return Err(MapError::Validation(format!(
                    "byte_to_class has {} entries, expected {}",
                    table.len(),
                    BYTE_SPACE
                )));
            }
            for byte in 0..=u8::MAX {
                let slot = table
                    .get(&byte.to_string())
                    .ok_or(MapError::InconsistentLookup { byte })?;
                if slot.class_id != u64::from(byte_to_class[byte as usize])
                    || slot.index != u64::from(byte_to_index[byte as usize])
                {
                    return Err(MapError::InconsistentLookup { byte });
                }
            }
        }

        let map = Self { classes, byte_to_class, byte_to_index };
        log::debug!(
            "resonance map loaded: {} classes, largest class {}",
            map.class_count(),
            map.classes.iter().map(Vec::len).max().unwrap_or(0)
        );
        Ok(map)
    }

    /// Validate in-memory classes (class id = position).
    pub fn from_classes<I, C>(classes: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = u8>,
    {
        Self::load(&PartitionData::from_classes(classes))
    }

    pub fn from_json_str(s: &str) -> Result<Self, CdpError> {
        let data = PartitionData::from_json_str(s)?;
        Ok(Self::load(&data)?)
    }

    /// Read and validate a partition document from disk.
    ///
    /// This is the one blocking operation of the core; call it before
    /// handing the map to parallel workers.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CdpError> {
        let data = PartitionData::from_path(path)?;
        Ok(Self::load(&data)?)
    }

    /// The bundled 96-class partition.
    pub fn standard() -> Result<Self, CdpError> {
        Self::from_json_str(STANDARD_MAP_JSON)
    }

    #[inline]
    pub fn class_of(&self, byte: u8) -> u8 {
        self.byte_to_class[byte as usize]
    }

    #[inline]
    pub fn index_of(&self, byte: u8) -> u8 {
        self.byte_to_index[byte as usize]
    }

    #[inline]
    pub fn canonical_of(&self, byte: u8) -> u8 {
        self.classes[self.class_of(byte) as usize][0]
    }

    /// Ordered members of a class, or `None` for an id the map does not define.
    #[inline]
    pub fn members_of(&self, class_id: u8) -> Option<&[u8]> {
        self.classes.get(class_id as usize).map(Vec::as_slice)
    }

    pub fn class(&self, class_id: u8) -> Option<ResonanceClass<'_>> {
        self.members_of(class_id)
            .map(|members| ResonanceClass { id: class_id, members })
    }

    pub fn classes(&self) -> impl Iterator<Item = ResonanceClass<'_>> + '_ {
        self.classes
            .iter()
            .enumerate()
            .map(|(id, members)| ResonanceClass { id: id as u8, members })
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Back to the on-disk layout, including the redundant lookup table.
    pub fn to_partition_data(&self) -> PartitionData {
        PartitionData::from_classes(self.classes.iter().map(|c| c.iter().copied()))
            .with_lookup_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_pairs() -> Vec<Vec<u8>> {
        (0..128u8).map(|i| vec![2 * i, 2 * i + 1]).collect()
    }

    #[test]
    fn pairs_partition_is_total() {
        let map = ResonanceMap::from_classes(identity_pairs()).unwrap();
        assert_eq!(map.class_count(), 128);
        for b in 0..=u8::MAX {
            assert_eq!(map.class_of(b), b / 2);
            assert_eq!(map.index_of(b), b % 2);
            assert_eq!(map.canonical_of(b), b & !1);
        }
    }

    #[test]
    fn single_class_holds_everything() {
        let map = ResonanceMap::from_classes([0..=u8::MAX]).unwrap();
        assert_eq!(map.class_count(), 1);
        assert_eq!(map.index_of(255), 255);
        assert_eq!(map.canonical_of(200), 0);
    }

    #[test]
    fn unknown_class_id_has_no_members() {
        let map = ResonanceMap::from_classes(identity_pairs()).unwrap();
        assert!(map.members_of(127).is_some());
        assert!(map.members_of(128).is_none());
    }

    #[test]
    fn too_many_classes_rejected() {
        let mut data = PartitionData::from_classes((0..=u8::MAX).map(|b| vec![b]));
        data.class_to_byte.push(vec![0]);
        assert!(matches!(
            ResonanceMap::load(&data),
            Err(MapError::TooManyClasses { have: 257, .. })
        ));
    }

    #[test]
    fn partition_data_round_trips_through_lookup_table() {
        let map = ResonanceMap::from_classes(identity_pairs()).unwrap();
        let again = ResonanceMap::load(&map.to_partition_data()).unwrap();
        assert_eq!(map, again);
    }
}
