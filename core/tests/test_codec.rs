#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use naclbox_core::compression::{
        create_engine, deflate_bytes, inflate_bytes, run_codec, CodecError, CodecMode, CodecSettings, StreamEngine,
    };
    use naclbox_core::constants::CODEC_CHUNK_SIZE;

    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut buf = vec![0u8; len];
        rng.fill_bytes(&mut buf);
        buf
    }

    // ------------------------------------------------------------
    // Round trips
    // ------------------------------------------------------------
    #[test]
    fn empty_input_round_trips() {
        let settings = CodecSettings::default();
        let packed = deflate_bytes(&[], &settings).unwrap();
        // A valid zlib stream still has header and checksum.
        assert!(!packed.is_empty());
        assert!(inflate_bytes(&packed, &settings).unwrap().is_empty());
    }

    #[test]
    fn inflating_nothing_yields_nothing() {
        assert!(inflate_bytes(&[], &CodecSettings::default()).unwrap().is_empty());
    }

    #[test]
    fn incompressible_input_outgrows_first_chunk() {
        let settings = CodecSettings::default();
        let input = random_bytes(CODEC_CHUNK_SIZE * 8 + 17, 7);
        let packed = deflate_bytes(&input, &settings).unwrap();
        assert!(packed.len() > CODEC_CHUNK_SIZE);
        assert_eq!(inflate_bytes(&packed, &settings).unwrap(), input);
    }

    #[test]
    fn highly_compressible_input_expands_many_times_on_inflate() {
        let settings = CodecSettings::default();
        let input = vec![b'a'; 1 << 20];
        let packed = deflate_bytes(&input, &settings).unwrap();
        assert!(packed.len() < CODEC_CHUNK_SIZE);
        assert_eq!(inflate_bytes(&packed, &settings).unwrap(), input);
    }

    #[test]
    fn tiny_initial_chunk_still_round_trips() {
        let settings = CodecSettings { level: 9, initial_chunk_size: 1 };
        let input = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let packed = deflate_bytes(&input, &settings).unwrap();
        assert_eq!(inflate_bytes(&packed, &settings).unwrap(), input);
    }

    #[test]
    fn every_level_round_trips() {
        let input = b"level sweep ".repeat(200);
        for level in 0..=9 {
            let settings = CodecSettings { level, ..CodecSettings::default() };
            let packed = deflate_bytes(&input, &settings).unwrap();
            assert_eq!(inflate_bytes(&packed, &settings).unwrap(), input, "level {}", level);
        }
    }

    // ------------------------------------------------------------
    // Failures
    // ------------------------------------------------------------
    #[test]
    fn level_out_of_range_fails_at_init() {
        let err = create_engine(CodecMode::Compress, 10).err().unwrap();
        assert!(matches!(err, CodecError::Init { mode: CodecMode::Compress, .. }));
    }

    #[test]
    fn garbage_does_not_inflate() {
        let err = inflate_bytes(b"definitely not zlib", &CodecSettings::default()).unwrap_err();
        assert!(matches!(err, CodecError::Step { .. } | CodecError::Stalled { .. }));
    }

    #[test]
    fn truncated_stream_does_not_inflate() {
        let settings = CodecSettings::default();
        let packed = deflate_bytes(&random_bytes(10_000, 3), &settings).unwrap();
        let truncated = &packed[..packed.len() / 2];
        assert!(inflate_bytes(truncated, &settings).is_err());
    }

    #[test]
    fn engine_can_be_driven_directly() {
        let mut engine = create_engine(CodecMode::Compress, 6).unwrap();
        let packed = run_codec(engine.as_mut(), b"direct", 16).unwrap();
        assert_eq!(engine.total_in(), 6);
        assert_eq!(engine.total_out(), packed.len() as u64);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..(1 << 20))) {
            let settings = CodecSettings::default();
            let packed = deflate_bytes(&data, &settings).unwrap();
            prop_assert_eq!(inflate_bytes(&packed, &settings).unwrap(), data);
        }

        #[test]
        fn prop_round_trip_small_chunks(data in prop::collection::vec(0u8..4, 0..20_000), chunk in 1usize..64) {
            let settings = CodecSettings { level: 6, initial_chunk_size: chunk };
            let packed = deflate_bytes(&data, &settings).unwrap();
            prop_assert_eq!(inflate_bytes(&packed, &settings).unwrap(), data);
        }
    }
}
