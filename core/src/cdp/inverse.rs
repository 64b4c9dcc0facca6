use crate::cdp::types::TransformError;
use crate::resonance::ResonanceMap;

/// Rebuild the source bytes from aligned class and index streams.
///
/// # Errors
/// - `LengthMismatch` if the streams are not the same length.
/// - `UnknownClass` / `IndexOutOfRange` at the first position that does not
///   name a real member.
pub fn inverse(class_stream: &[u8], index_stream: &[u8], map: &ResonanceMap) -> Result<Vec<u8>, TransformError> {
    let mut out = Vec::with_capacity(class_stream.len());
    inverse_into(class_stream, index_stream, map, &mut out)?;
    Ok(out)
}

/// Append reconstructed bytes to `out`. On error `out` is truncated back to
/// its original length.
pub fn inverse_into(
    class_stream: &[u8],
    index_stream: &[u8],
    map: &ResonanceMap,
    out: &mut Vec<u8>,
) -> Result<(), TransformError> {
    if class_stream.len() != index_stream.len() {
        return Err(TransformError::LengthMismatch {
            class_len: class_stream.len(),
            index_len: index_stream.len(),
        });
    }

    let start = out.len();
    out.reserve(class_stream.len());

    for (position, (&class_id, &index)) in class_stream.iter().zip(index_stream).enumerate() {
        let members = match map.members_of(class_id) {
            Some(m) => m,
            None => {
                out.truncate(start);
                return Err(TransformError::UnknownClass {
                    position,
                    class_id,
                    class_count: map.class_count(),
                });
            }
        };
        match members.get(index as usize) {
            Some(&b) => out.push(b),
            None => {
                out.truncate(start);
                return Err(TransformError::IndexOutOfRange {
                    position,
                    class_id,
                    index,
                    member_count: members.len(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> ResonanceMap {
        ResonanceMap::from_classes((0..128u16).map(|i| [(2 * i) as u8, (2 * i + 1) as u8])).unwrap()
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = inverse(&[0, 1], &[0], &pairs()).unwrap_err();
        assert_eq!(err, TransformError::LengthMismatch { class_len: 2, index_len: 1 });
    }

    #[test]
    fn unknown_class_is_not_defaulted() {
        let err = inverse(&[0, 200], &[0, 0], &pairs()).unwrap_err();
        assert_eq!(err, TransformError::UnknownClass { position: 1, class_id: 200, class_count: 128 });
    }

    #[test]
    fn error_restores_output_buffer() {
        let mut out = vec![42];
        let res = inverse_into(&[0, 0], &[1, 5], &pairs(), &mut out);
        assert!(res.is_err());
        assert_eq!(out, vec![42]);
    }

    #[test]
    fn offset_by_shifts_positions() {
        let e = TransformError::IndexOutOfRange { position: 3, class_id: 1, index: 9, member_count: 2 };
        assert_eq!(e.offset_by(100).position(), Some(103));
    }
}
