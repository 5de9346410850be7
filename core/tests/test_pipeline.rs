// * deflate_box → inflate_box_open restores the message
// * compression actually happens before sealing
// * stage failures report the stage that failed

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    use naclbox_core::compression::{inflate_bytes, CodecSettings};
    use naclbox_core::prelude::*;

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    struct Parties {
        alice: KeyPair,
        bob: KeyPair,
        nonce: [u8; BOX_NONCEBYTES],
    }

    fn parties() -> Parties {
        Parties { alice: box_keypair(), bob: box_keypair(), nonce: [0x42; BOX_NONCEBYTES] }
    }

    fn inline() -> Dispatcher<InlineQueue> {
        Dispatcher::inline(&DispatcherConfig::default()).unwrap()
    }

    fn pack(d: &Dispatcher<InlineQueue>, p: &Parties, message: &[u8]) -> Vec<u8> {
        d.deflate_box_sync(message, &p.nonce, &p.bob.public_key, &p.alice.secret_key)
            .into_result()
            .unwrap()
    }

    fn unpack(d: &Dispatcher<InlineQueue>, p: &Parties, ciphertext: &[u8]) -> Outcome {
        d.inflate_box_open_sync(ciphertext, &p.nonce, &p.alice.public_key, &p.bob.secret_key)
    }

    // ------------------------------------------------------------
    // Round trips
    // ------------------------------------------------------------
    #[test]
    fn compressible_payload_round_trips_and_shrinks() {
        let d = inline();
        let p = parties();
        let message = b"{\"user\":\"alice\",\"role\":\"admin\"}".repeat(500);

        let sealed = pack(&d, &p, &message);
        assert!(sealed.len() < message.len() / 4);
        assert_eq!(unpack(&d, &p, &sealed), Outcome::Success(message));
    }

    #[test]
    fn random_payload_round_trips() {
        let d = inline();
        let p = parties();
        let mut message = vec![0u8; 100_000];
        StdRng::seed_from_u64(11).fill_bytes(&mut message);

        let sealed = pack(&d, &p, &message);
        assert_eq!(unpack(&d, &p, &sealed), Outcome::Success(message));
    }

    #[test]
    fn empty_payload_round_trips() {
        let d = inline();
        let p = parties();
        let sealed = pack(&d, &p, &[]);
        assert!(sealed.len() > MAC_BYTES);
        assert_eq!(unpack(&d, &p, &sealed), Outcome::Success(Vec::new()));
    }

    #[test]
    fn plain_box_open_yields_the_zlib_stream() {
        let d = inline();
        let p = parties();
        let sealed = pack(&d, &p, b"still compressed");
        let inner = d
            .box_open_sync(&sealed, &p.nonce, &p.alice.public_key, &p.bob.secret_key)
            .into_result()
            .unwrap();
        assert_ne!(inner, b"still compressed");
        assert_eq!(inflate_bytes(&inner, &CodecSettings::default()).unwrap(), b"still compressed");
    }

    #[test]
    fn pipeline_through_worker_pool() {
        let d = Dispatcher::new(&DispatcherConfig::new(Some(2), Some(9))).unwrap();
        let p = parties();
        let message = b"pooled pipeline ".repeat(1000);
        let out = std::sync::Arc::new(std::sync::Mutex::new(None));

        let slot = std::sync::Arc::clone(&out);
        d.deflate_box_async(&message, &p.nonce, &p.bob.public_key, &p.alice.secret_key, move |err, value| {
            *slot.lock().unwrap() = Some((err, value));
        })
        .unwrap();
        d.wait_all(Duration::from_secs(10)).unwrap();

        let (err, value) = out.lock().unwrap().take().unwrap();
        assert!(err.is_none());
        let opened = d.inflate_box_open_sync(&value.unwrap(), &p.nonce, &p.alice.public_key, &p.bob.secret_key);
        assert_eq!(opened, Outcome::Success(message));
    }

    // ------------------------------------------------------------
    // Stage failures
    // ------------------------------------------------------------
    #[test]
    fn tampered_ciphertext_fails_before_inflate() {
        let d = inline();
        let p = parties();
        let mut sealed = pack(&d, &p, b"tamper me");
        sealed[0] ^= 0xFF;
        assert_eq!(unpack(&d, &p, &sealed), Outcome::failure("ciphertext fails verification"));
    }

    #[test]
    fn authentic_but_uncompressed_payload_fails_to_inflate() {
        let d = inline();
        let p = parties();
        let sealed = d
            .box_seal_sync(b"never deflated", &p.nonce, &p.bob.public_key, &p.alice.secret_key)
            .into_result()
            .unwrap();
        assert_eq!(unpack(&d, &p, &sealed), Outcome::failure("failed to inflate"));
    }

    #[test]
    fn wrong_key_length_fails_at_box_stage() {
        let d = inline();
        let p = parties();
        let outcome = d.deflate_box_sync(b"m", &p.nonce, &p.bob.public_key[..16], &p.alice.secret_key);
        assert_eq!(outcome, Outcome::failure("incorrect public-key length"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_deflate_box_round_trip(message in prop::collection::vec(any::<u8>(), 0..50_000)) {
            let d = inline();
            let p = parties();
            let sealed = pack(&d, &p, &message);
            prop_assert_eq!(unpack(&d, &p, &sealed), Outcome::Success(message));
        }
    }
}
