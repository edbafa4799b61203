#![cfg(all(feature = "aes", feature = "std"))]

use opengm_gcm::{AEAD, AesCipher, Error, GCM, new_aes_gcm, new_aes_gcm_with_random_nonce};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 16),
        proptest::collection::vec(any::<u8>(), 24),
        proptest::collection::vec(any::<u8>(), 32),
    ]
}

proptest! {
    #[test]
    fn seal_open_roundtrip(
        key in key_strategy(),
        nonce in proptest::collection::vec(any::<u8>(), 1..40),
        tag_size in 12usize..=16,
        plain in proptest::collection::vec(any::<u8>(), 0..300),
        aad in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let g = GCM::new(AesCipher::new(&key).unwrap(), nonce.len(), tag_size).unwrap();

        let mut sealed = Vec::new();
        g.seal(&mut sealed, &nonce, &plain, &aad);
        prop_assert_eq!(sealed.len(), plain.len() + tag_size);

        let mut opened = Vec::new();
        prop_assert_eq!(g.open(&mut opened, &nonce, &sealed, &aad), Ok(()));
        prop_assert_eq!(&opened, &plain);

        // Sealing in place gives the same bytes.
        let mut in_place = plain.clone();
        g.seal_in_place(&mut in_place, &nonce, &aad);
        prop_assert_eq!(&in_place, &sealed);
    }

    #[test]
    fn tampered_ciphertext_rejected(
        key in key_strategy(),
        plain in proptest::collection::vec(any::<u8>(), 0..200),
        aad in proptest::collection::vec(any::<u8>(), 0..32),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let g = new_aes_gcm(&key).unwrap();
        let nonce = [7u8; 12];

        let mut sealed = Vec::new();
        g.seal(&mut sealed, &nonce, &plain, &aad);
        let i = pos.index(sealed.len());
        sealed[i] ^= 1 << bit;

        let mut opened = Vec::new();
        prop_assert_eq!(
            g.open(&mut opened, &nonce, &sealed, &aad),
            Err(Error::AuthenticationFailed)
        );
        prop_assert!(opened.is_empty());
    }

    #[test]
    fn within_disjoint_matches_seal(
        plain in proptest::collection::vec(any::<u8>(), 0..200),
        gap in 0usize..20,
    ) {
        let g = new_aes_gcm(&[0x11; 16]).unwrap();
        let nonce = [3u8; 12];
        let n = plain.len();

        let mut want = Vec::new();
        g.seal(&mut want, &nonce, &plain, &[]);

        let dst = n + gap;
        let mut buf = vec![0u8; dst + n + 16];
        buf[..n].copy_from_slice(&plain);
        prop_assert_eq!(g.seal_within(&mut buf, 0..n, dst, &nonce, &[]), n + 16);
        prop_assert_eq!(&buf[dst..], want.as_slice());

        let m = g.open_within(&mut buf, dst..dst + n + 16, 0, &nonce, &[]).unwrap();
        prop_assert_eq!(&buf[..m], plain.as_slice());
    }

    #[test]
    fn random_nonce_roundtrip(
        plain in proptest::collection::vec(any::<u8>(), 0..200),
        aad in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let g = new_aes_gcm_with_random_nonce(&[0x22; 32]).unwrap();

        let mut sealed = Vec::new();
        g.seal(&mut sealed, &[], &plain, &aad);
        prop_assert_eq!(sealed.len(), plain.len() + g.overhead());

        let mut opened = Vec::new();
        prop_assert_eq!(g.open(&mut opened, &[], &sealed, &aad), Ok(()));
        prop_assert_eq!(&opened, &plain);

        let mut in_place = plain.clone();
        g.seal_in_place(&mut in_place, &[], &aad);
        let opened = g.open_in_place(&mut in_place, &[], &aad).unwrap();
        prop_assert_eq!(&*opened, plain.as_slice());
    }
}
