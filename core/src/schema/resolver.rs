//! schema/resolver.rs
//!
//! The `TagResolver` capability and the stock `Schema` implementation.
//!
//! Design notes:
//! - `hash_to_tag` is pure: it hashes whatever label it is given.
//! - `lookup_label` only answers for registered labels; a tag with no
//!   registration is `None` (the decoder turns that into UnknownTag).
//! - Registration keeps one label per tag. A second, different label on an
//!   occupied tag is rejected and leaves the schema unchanged.

use std::fmt;

use crate::constants::BYTE_SPACE;
use crate::schema::hasher::{HasherKind, TagHasher};
use crate::schema::registry::create_hasher;
use crate::schema::types::SchemaError;

pub trait TagResolver {
    /// Tag byte for a label under this schema's hash.
    fn hash_to_tag(&self, label: &str) -> u8;

    /// Registered label for a tag, if any.
    fn lookup_label(&self, tag: u8) -> Option<&str>;
}

impl<T: TagResolver + ?Sized> TagResolver for &T {
    fn hash_to_tag(&self, label: &str) -> u8 {
        (**self).hash_to_tag(label)
    }

    fn lookup_label(&self, tag: u8) -> Option<&str> {
        (**self).lookup_label(tag)
    }
}

pub struct Schema {
    name: String,
    hasher: Box<dyn TagHasher>,
    slots: Vec<Option<String>>,
    /// Tags in registration order.
    order: Vec<u8>,
}

impl Schema {
    pub fn new<H>(name: impl Into<String>, hasher: H) -> Self
    where
        H: TagHasher + 'static,
    {
        Self::with_boxed_hasher(name, Box::new(hasher))
    }

    pub fn with_kind(name: impl Into<String>, kind: HasherKind) -> Self {
        Self::with_boxed_hasher(name, create_hasher(kind))
    }

    pub fn with_boxed_hasher(name: impl Into<String>, hasher: Box<dyn TagHasher>) -> Self {
        Self {
            name: name.into(),
            hasher,
            slots: vec![None; BYTE_SPACE],
            order: Vec::new(),
        }
    }

    /// Register a label and return its tag.
    ///
    /// # Errors
    /// - `InvalidLabel` for an empty label.
    /// - `AmbiguousTag` when the tag already belongs to a different label.
    pub fn register(&mut self, label: &str) -> Result<u8, SchemaError> {
        if label.is_empty() {
            return Err(SchemaError::InvalidLabel {
                label: label.to_owned(),
                reason: "label must not be empty",
            });
        }

        let tag = self.hasher.tag_of(label);
        if let Some(existing) = &self.slots[tag as usize] {
            if existing == label {
                return Ok(tag);
            }
            return Err(SchemaError::AmbiguousTag {
                tag,
                existing: existing.clone(),
                rejected: label.to_owned(),
            });
        }

        self.slots[tag as usize] = Some(label.to_owned());
        self.order.push(tag);
        log::trace!("schema '{}': registered '{}' as tag {}", self.name, label, tag);
        Ok(tag)
    }

    /// Register several labels; stops at the first failure.
    pub fn register_all<I, S>(&mut self, labels: I) -> Result<Vec<u8>, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.register(label.as_ref()))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.lookup_label(self.hash_to_tag(label)) == Some(label)
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> &[u8] {
        &self.order
    }

    /// Registered `(tag, label)` pairs, in registration order.
    pub fn labels(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.order
            .iter()
            .filter_map(move |&tag| self.lookup_label(tag).map(|label| (tag, label)))
    }
}

impl TagResolver for Schema {
    fn hash_to_tag(&self, label: &str) -> u8 {
        self.hasher.tag_of(label)
    }

    fn lookup_label(&self, tag: u8) -> Option<&str> {
        self.slots[tag as usize].as_deref()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}
