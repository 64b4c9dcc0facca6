//! cdf/decode.rs
//!
//! Record decoding. Never consults the resonance map: a record's canonical
//! byte is self-describing.

use crate::cdf::types::{CdfError, CdfRecord, DecodedField, DecodedStream, SkippedRecord, UnknownTagPolicy};
use crate::constants::RECORD_LEN;
use crate::schema::TagResolver;

/// View a byte stream as records. Trailing bytes that do not fill a record
/// are not yielded; callers that care check the length first.
pub fn records(bytes: &[u8]) -> impl Iterator<Item = CdfRecord> + '_ {
    bytes
        .chunks_exact(RECORD_LEN)
        .map(|c| CdfRecord::from_bytes([c[0], c[1], c[2]]))
}

pub fn decode_field<'s, R>(record: &CdfRecord, schema: &'s R) -> Result<DecodedField<'s>, CdfError>
where
    R: TagResolver + ?Sized,
{
    let label = schema
        .lookup_label(record.tag)
        .ok_or(CdfError::UnknownTag { tag: record.tag, record: None })?;
    Ok(DecodedField { label, value: record.value() })
}

fn check_len(bytes: &[u8]) -> Result<(), CdfError> {
    if bytes.len() % RECORD_LEN != 0 {
        return Err(CdfError::TruncatedStream { len: bytes.len() });
    }
    Ok(())
}

/// Decode a whole stream in order.
///
/// The length check runs before any record is touched, so a truncated
/// stream never yields partial output.
pub fn decode_stream<'s, R>(
    bytes: &[u8],
    schema: &'s R,
    policy: UnknownTagPolicy,
) -> Result<DecodedStream<'s>, CdfError>
where
    R: TagResolver + ?Sized,
{
    check_len(bytes)?;

    let mut out = DecodedStream {
        fields: Vec::with_capacity(bytes.len() / RECORD_LEN),
        skipped: Vec::new(),
    };

    for (position, rec) in records(bytes).enumerate() {
        match schema.lookup_label(rec.tag) {
            Some(label) => out.fields.push(DecodedField { label, value: rec.value() }),
            None => match policy {
                UnknownTagPolicy::Abort => {
                    return Err(CdfError::UnknownTag { tag: rec.tag, record: Some(position) });
                }
                UnknownTagPolicy::Skip => {
                    log::debug!("cdf: skipping unknown tag {} at record {}", rec.tag, position);
                    out.skipped.push(SkippedRecord { position, tag: rec.tag });
                }
            },
        }
    }

    Ok(out)
}

/// Decode only records whose tag is in `tags`. Everything else is ignored,
/// including tags the schema has never seen.
///
/// # Errors
/// - `TruncatedStream` as for `decode_stream`.
/// - `UnknownTag` when a requested tag is present in the stream but has no
///   label in `schema`.
pub fn project<'s, R>(bytes: &[u8], schema: &'s R, tags: &[u8]) -> Result<Vec<DecodedField<'s>>, CdfError>
where
    R: TagResolver + ?Sized,
{
    check_len(bytes)?;

    let mut wanted = [false; 256];
    for &t in tags {
        wanted[t as usize] = true;
    }

    let mut out = Vec::new();
    for (position, rec) in records(bytes).enumerate() {
        if !wanted[rec.tag as usize] {
            continue;
        }
        let label = schema
            .lookup_label(rec.tag)
            .ok_or(CdfError::UnknownTag { tag: rec.tag, record: Some(position) })?;
        out.push(DecodedField { label, value: rec.value() });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn schema() -> Schema {
        let mut s = Schema::new("t", |l: &str| l.len() as u8);
        s.register("a").unwrap();
        s.register("bb").unwrap();
        s
    }

    #[test]
    fn truncated_before_any_record() {
        let s = schema();
        let err = decode_stream(&[1, 0, 0, 2, 0, 0, 1], &s, UnknownTagPolicy::Skip).unwrap_err();
        assert_eq!(err, CdfError::TruncatedStream { len: 7 });
    }

    #[test]
    fn abort_reports_record_position() {
        let s = schema();
        let err = decode_stream(&[1, 4, 0, 9, 0, 0], &s, UnknownTagPolicy::Abort).unwrap_err();
        assert_eq!(err, CdfError::UnknownTag { tag: 9, record: Some(1) });
    }

    #[test]
    fn skip_keeps_order_and_lists_skips() {
        let s = schema();
        let bytes = [1, 4, 1, 9, 0, 0, 2, 10, 250];
        let out = decode_stream(&bytes, &s, UnknownTagPolicy::Skip).unwrap();
        assert_eq!(out.pairs(), vec![("a", 5), ("bb", 4)]);
        assert_eq!(out.skipped, vec![SkippedRecord { position: 1, tag: 9 }]);
        assert!(!out.is_complete());
    }

    #[test]
    fn projection_ignores_foreign_tags() {
        let s = schema();
        let bytes = [77, 0, 0, 2, 6, 0, 1, 8, 0];
        let out = project(&bytes, &s, &[2]).unwrap();
        assert_eq!(out, vec![DecodedField { label: "bb", value: 6 }]);
    }
}
