use crate::cdp::types::DerivedStreams;
use crate::resonance::ResonanceMap;

/// Decompose `bytes` into class ids and in-class indices.
pub fn forward(bytes: &[u8], map: &ResonanceMap) -> DerivedStreams {
    let mut out = DerivedStreams::with_capacity(bytes.len());
    forward_into(bytes, map, &mut out.class_stream, &mut out.index_stream);
    out
}

/// Append the decomposition of `bytes` to two caller-owned buffers.
pub fn forward_into(
    bytes: &[u8],
    map: &ResonanceMap,
    class_out: &mut Vec<u8>,
    index_out: &mut Vec<u8>,
) {
    class_out.reserve(bytes.len());
    index_out.reserve(bytes.len());
    for &b in bytes {
        class_out.push(map.class_of(b));
        index_out.push(map.index_of(b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_streams() {
        let map = ResonanceMap::from_classes([0..=u8::MAX]).unwrap();
        let out = forward(&[], &map);
        assert!(out.is_empty());
        assert_eq!(out.zero_index_ratio(), 0.0);
    }

    #[test]
    fn single_class_map_indexes_by_value() {
        let map = ResonanceMap::from_classes([0..=u8::MAX]).unwrap();
        let out = forward(&[0, 7, 255], &map);
        assert_eq!(out.class_stream, vec![0, 0, 0]);
        assert_eq!(out.index_stream, vec![0, 7, 255]);
    }
}
