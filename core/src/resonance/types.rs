use std::fmt;

/// Borrowed view of one class of the partition.
///
/// `members[0]` is the canonical representative; the position of a byte in
/// `members` is its in-class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResonanceClass<'a> {
    pub id: u8,
    pub members: &'a [u8],
}

impl<'a> ResonanceClass<'a> {
    #[inline]
    pub fn canonical(&self) -> u8 {
        self.members[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.members.contains(&byte)
    }
}

/// Every variant is a MalformedMap condition: the supplied partition does not
/// cover all 256 byte values exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The partition lists no classes at all.
    NoClasses,

    /// More classes than a single-byte class id can address.
    TooManyClasses { have: usize, max: usize },

    /// A class with no members (it would have no canonical representative).
    EmptyClass { class_id: usize },

    /// A member value outside 0..=255.
    ValueOutOfRange { class_id: usize, value: u64 },

    /// The same byte appears twice (same class or two classes).
    DuplicateByte { byte: u8, first_class: usize, second_class: usize },

    /// A byte value that no class contains.
    MissingByte { byte: u8 },

    /// The redundant `byte_to_class` table disagrees with `class_to_byte`.
    InconsistentLookup { byte: u8 },

    /// Generic validation failure with context.
    Validation(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MapError::*;
        match self {
            NoClasses =>
                write!(f, "partition has no classes"),
            TooManyClasses { have, max } =>
                write!(f, "too many classes: {} > {}", have, max),
            EmptyClass { class_id } =>
                write!(f, "class {} is empty", class_id),
            ValueOutOfRange { class_id, value } =>
                write!(f, "class {} lists {} which is not a byte value", class_id, value),
            DuplicateByte { byte, first_class, second_class } =>
                write!(f, "byte {} appears in class {} and again in class {}", byte, first_class, second_class),
            MissingByte { byte } =>
                write!(f, "byte {} is not covered by any class", byte),
            InconsistentLookup { byte } =>
                write!(f, "byte_to_class entry for {} disagrees with class_to_byte", byte),
            Validation(msg) =>
                write!(f, "map validation error: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}
