// Channel analysis over the standard map.

#[cfg(test)]
mod tests {
    use cdp_core::analysis::{analyze, profile_stream, shannon_entropy};
    use cdp_core::cdf::CdfCodec;
    use cdp_core::resonance::{CanonicalDictionary, ResonanceMap};
    use cdp_core::schema::{HasherKind, Schema};

    #[test]
    fn class_channel_never_exceeds_source_entropy() {
        let map = ResonanceMap::standard().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let report = analyze(&bytes, &map, 3).unwrap();

        assert!((report.source.entropy_bits - 8.0).abs() < 1e-9);
        assert!(report.class.entropy_bits <= report.source.entropy_bits);
        assert!(report.index.entropy_bits <= 2.0 + 1e-9);
        assert!(report.class.distinct_symbols <= 96);
        assert_eq!(report.index.len, 4096);
    }

    #[test]
    fn codec_streams_have_sparse_index_channel() {
        let map = ResonanceMap::standard().unwrap();
        let dict = CanonicalDictionary::new(&map);
        let mut schema = Schema::with_kind("a", HasherKind::Crc32);
        schema.register("t").unwrap();
        let records = CdfCodec::new(&dict)
            .encode_stream((0..1000u32).map(|i| ("t", (60 + i % 40) as u8)), &schema)
            .unwrap();

        let report = analyze(&records, &map, 3).unwrap();
        assert!(report.index.zero_ratio > 0.33);
        assert!(report.index.entropy_bits < report.source.entropy_bits);
    }

    #[test]
    fn empty_profile() {
        let p = profile_stream(&[], 1).unwrap();
        assert_eq!(p.len, 0);
        assert_eq!(p.zstd_ratio(), 0.0);
        assert_eq!(shannon_entropy(&[]), 0.0);
    }
}
