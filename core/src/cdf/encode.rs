//! cdf/encode.rs
//!
//! Field encoder. Only encoding needs the dictionary; decoding is pure
//! arithmetic over the record bytes.

use crate::cdf::decode;
use crate::cdf::types::{CdfError, CdfRecord, DecodedField, DecodedStream, UnknownTagPolicy};
use crate::constants::RECORD_LEN;
use crate::resonance::CanonicalDictionary;
use crate::schema::TagResolver;

#[derive(Debug, Clone, Copy)]
pub struct CdfCodec<'a> {
    dictionary: &'a CanonicalDictionary,
}

impl<'a> CdfCodec<'a> {
    pub fn new(dictionary: &'a CanonicalDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &'a CanonicalDictionary {
        self.dictionary
    }

    /// Encode one `(label, value)` pair.
    ///
    /// # Errors
    /// `UnregisteredLabel` when the resolver would not decode the tag back
    /// to `label` (never registered, or the tag belongs to another label).
    pub fn encode_field<R>(&self, label: &str, value: u8, schema: &R) -> Result<CdfRecord, CdfError>
    where
        R: TagResolver + ?Sized,
    {
        let tag = schema.hash_to_tag(label);
        if schema.lookup_label(tag) != Some(label) {
            return Err(CdfError::UnregisteredLabel { label: label.to_owned(), tag });
        }

        let canonical = self.dictionary.canonical_of(value);
        Ok(CdfRecord {
            tag,
            canonical,
            delta: value.wrapping_sub(canonical),
        })
    }

    /// Encode pairs in input order into a flat record stream.
    pub fn encode_stream<I, L, R>(&self, pairs: I, schema: &R) -> Result<Vec<u8>, CdfError>
    where
        I: IntoIterator<Item = (L, u8)>,
        L: AsRef<str>,
        R: TagResolver + ?Sized,
    {
        let iter = pairs.into_iter();
        let mut out = Vec::with_capacity(iter.size_hint().0 * RECORD_LEN);
        self.encode_stream_into(iter, schema, &mut out)?;
        Ok(out)
    }

    /// Append records to `out`. On error `out` is restored to its prior
    /// length so no partial record set is left behind.
    pub fn encode_stream_into<I, L, R>(
        &self,
        pairs: I,
        schema: &R,
        out: &mut Vec<u8>,
    ) -> Result<usize, CdfError>
    where
        I: IntoIterator<Item = (L, u8)>,
        L: AsRef<str>,
        R: TagResolver + ?Sized,
    {
        let start = out.len();
        let mut count = 0usize;

        for (label, value) in pairs {
            match self.encode_field(label.as_ref(), value, schema) {
                Ok(rec) => {
                    out.extend_from_slice(&rec.to_bytes());
                    count += 1;
                }
                Err(e) => {
                    out.truncate(start);
                    return Err(e);
                }
            }
        }

        Ok(count)
    }

    pub fn decode_field<'s, R>(&self, record: &CdfRecord, schema: &'s R) -> Result<DecodedField<'s>, CdfError>
    where
        R: TagResolver + ?Sized,
    {
        decode::decode_field(record, schema)
    }

    pub fn decode_stream<'s, R>(
        &self,
        bytes: &[u8],
        schema: &'s R,
        policy: UnknownTagPolicy,
    ) -> Result<DecodedStream<'s>, CdfError>
    where
        R: TagResolver + ?Sized,
    {
        decode::decode_stream(bytes, schema, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resonance::ResonanceMap;
    use crate::schema::Schema;

    fn pair_map() -> ResonanceMap {
        // [0,1], [2,3], ... with 255 paired with 254.
        let classes: Vec<Vec<u8>> = (0..128u16).map(|i| vec![(2 * i) as u8, (2 * i + 1) as u8]).collect();
        ResonanceMap::from_classes(classes).unwrap()
    }

    #[test]
    fn canonical_and_delta_recombine() {
        let map = pair_map();
        let dict = CanonicalDictionary::new(&map);
        let codec = CdfCodec::new(&dict);
        let mut schema = Schema::new("t", |_: &str| 7u8);
        schema.register("temp").unwrap();

        let rec = codec.encode_field("temp", 41, &schema).unwrap();
        assert_eq!(rec, CdfRecord { tag: 7, canonical: 40, delta: 1 });
        assert_eq!(rec.value(), 41);
    }

    #[test]
    fn negative_delta_wraps() {
        // Canonical 200 sits above member 3.
        let mut classes: Vec<Vec<u8>> = vec![vec![200, 3]];
        classes.extend((0..=255u8).filter(|b| *b != 200 && *b != 3).map(|b| vec![b]));
        let map = ResonanceMap::from_classes(classes).unwrap();
        let dict = CanonicalDictionary::new(&map);
        let codec = CdfCodec::new(&dict);
        let mut schema = Schema::new("t", |_: &str| 1u8);
        schema.register("x").unwrap();

        let rec = codec.encode_field("x", 3, &schema).unwrap();
        assert_eq!(rec.canonical, 200);
        assert_eq!(rec.delta, 3u8.wrapping_sub(200));
        assert_eq!(rec.value(), 3);
    }

    #[test]
    fn unregistered_label_is_rejected() {
        let map = pair_map();
        let dict = CanonicalDictionary::new(&map);
        let codec = CdfCodec::new(&dict);
        let schema = Schema::new("t", |_: &str| 9u8);

        let err = codec.encode_field("ghost", 1, &schema).unwrap_err();
        assert_eq!(err, CdfError::UnregisteredLabel { label: "ghost".into(), tag: 9 });
    }

    #[test]
    fn failed_stream_leaves_buffer_untouched() {
        let map = pair_map();
        let dict = CanonicalDictionary::new(&map);
        let codec = CdfCodec::new(&dict);
        let mut schema = Schema::new("t", |l: &str| l.len() as u8);
        schema.register("a").unwrap();

        let mut out = vec![0xAA];
        let err = codec.encode_stream_into([("a", 1u8), ("bb", 2)], &schema, &mut out);
        assert!(err.is_err());
        assert_eq!(out, vec![0xAA]);
    }
}
