//! Property-based tests for sendlink crypto
//!
//! These tests verify the fundamental invariants of the access handshake:
//!
//! 1. **Fragment round-trip**: encode(decode(f)) == f for every canonical key
//! 2. **Determinism**: same (password, key, iterations) -> same verifier
//! 3. **Sensitivity**: changing any single input changes the verifier
//! 4. **Authenticity**: any tampering yields `DecryptionFailed`, never bytes

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use proptest::prelude::*;
use sendlink_crypto::{
    CryptoError, KEY_SIZE, KeyMaterial, NONCE_SIZE, decrypt, derive_password_verifier, seal,
};

// Small iteration counts keep PBKDF2 cheap; the algorithm is identical.
const TEST_ITERATIONS: u32 = 3;

fn key_strategy() -> impl Strategy<Value = [u8; KEY_SIZE]> {
    prop::array::uniform32(any::<u8>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_fragment_roundtrip(bytes in key_strategy()) {
        let fragment = KeyMaterial::from_bytes(bytes).to_url_fragment();
        let decoded = KeyMaterial::from_url_fragment(&fragment).unwrap();

        prop_assert_eq!(decoded.to_url_fragment(), fragment);
        prop_assert_eq!(decoded, KeyMaterial::from_bytes(bytes));
    }

    #[test]
    fn prop_wrong_length_rejected(len in 0usize..96) {
        prop_assume!(len != KEY_SIZE);
        let encoded = URL_SAFE_NO_PAD.encode(vec![0x5Au8; len]);
        let result = KeyMaterial::from_url_fragment(&encoded);

        prop_assert_eq!(
            result.unwrap_err(),
            CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: len }
        );
    }

    #[test]
    fn prop_derive_deterministic(
        password in ".{0,32}",
        bytes in key_strategy(),
        iterations in 1u32..8,
    ) {
        let key = KeyMaterial::from_bytes(bytes);
        let a = derive_password_verifier(&password, &key, iterations).unwrap();
        let b = derive_password_verifier(&password, &key, iterations).unwrap();

        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_derive_sensitive_to_password(
        password in "[a-z]{1,16}",
        suffix in "[A-Z]{1,4}",
        bytes in key_strategy(),
    ) {
        let key = KeyMaterial::from_bytes(bytes);
        let other = format!("{password}{suffix}");

        let a = derive_password_verifier(&password, &key, TEST_ITERATIONS).unwrap();
        let b = derive_password_verifier(&other, &key, TEST_ITERATIONS).unwrap();

        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_derive_sensitive_to_salt(
        password in "[a-z]{0,16}",
        bytes in key_strategy(),
        flip in 0usize..KEY_SIZE,
    ) {
        let mut other_bytes = bytes;
        other_bytes[flip] ^= 0x01;

        let a = derive_password_verifier(&password, &KeyMaterial::from_bytes(bytes), TEST_ITERATIONS)
            .unwrap();
        let b = derive_password_verifier(
            &password,
            &KeyMaterial::from_bytes(other_bytes),
            TEST_ITERATIONS,
        )
        .unwrap();

        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_seal_decrypt_roundtrip(
        plaintext in prop::collection::vec(any::<u8>(), 0..2048),
        bytes in key_strategy(),
        nonce in prop::array::uniform24(any::<u8>()),
    ) {
        let key = KeyMaterial::from_bytes(bytes);
        let sealed = seal(&plaintext, &key, nonce);

        prop_assert_eq!(decrypt(&sealed, &key).unwrap(), plaintext);
    }

    #[test]
    fn prop_any_bit_flip_fails_authentication(
        plaintext in prop::collection::vec(any::<u8>(), 1..256),
        bytes in key_strategy(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = KeyMaterial::from_bytes(bytes);
        let mut sealed = seal(&plaintext, &key, [0x24; NONCE_SIZE]);
        let idx = position.index(sealed.len());
        sealed[idx] ^= 1 << bit;

        let result = decrypt(&sealed, &key);
        prop_assert!(
            matches!(result, Err(CryptoError::DecryptionFailed { .. })),
            "expected DecryptionFailed, got {:?}",
            result
        );
    }
}
