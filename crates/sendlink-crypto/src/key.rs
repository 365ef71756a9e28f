//! Symmetric key material carried in the link fragment.

use std::fmt;

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::CryptoError;

/// Size of the send key in bytes.
pub const KEY_SIZE: usize = 32;

/// URL-safe alphabet. Padding is never emitted and optional on input.
const FRAGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The symmetric key of a single send.
///
/// Decoded exactly once from the link and then owned by the session for its
/// whole lifetime. It is never serialized towards the server.
#[derive(Clone)]
pub struct KeyMaterial {
    bytes: [u8; KEY_SIZE],
}

impl KeyMaterial {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Decode a URL-safe base64 link fragment.
    ///
    /// # Errors
    ///
    /// - `MalformedKey`: the fragment is not URL-safe base64
    /// - `InvalidKeyLength`: the decoded bytes are not [`KEY_SIZE`] long
    pub fn from_url_fragment(fragment: &str) -> Result<Self, CryptoError> {
        let mut decoded = FRAGMENT_ENGINE
            .decode(fragment.trim())
            .map_err(|e| CryptoError::MalformedKey { reason: e.to_string() })?;

        let result = <[u8; KEY_SIZE]>::try_from(decoded.as_slice())
            .map(Self::from_bytes)
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: decoded.len(),
            });

        decoded.zeroize();
        result
    }

    /// Encode as an unpadded URL-safe base64 link fragment.
    pub fn to_url_fragment(&self) -> String {
        FRAGMENT_ENGINE.encode(self.bytes)
    }

    /// Raw key bytes. Only the primitives in this crate read them.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for KeyMaterial {}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([redacted])")
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_key() -> KeyMaterial {
        let mut bytes = [0u8; KEY_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (i * 7) as u8;
        }
        KeyMaterial::from_bytes(bytes)
    }

    #[test]
    fn fragment_roundtrip() {
        let key = sample_key();
        let fragment = key.to_url_fragment();

        assert_eq!(fragment.len(), 43);
        assert!(!fragment.contains('='));
        assert_eq!(KeyMaterial::from_url_fragment(&fragment).unwrap(), key);
    }

    #[test]
    fn padded_fragment_accepted() {
        let key = sample_key();
        let padded = format!("{}=", key.to_url_fragment());

        assert_eq!(KeyMaterial::from_url_fragment(&padded).unwrap(), key);
    }

    #[test]
    fn standard_alphabet_rejected() {
        let fragment = "+".repeat(43);
        let result = KeyMaterial::from_url_fragment(&fragment);

        assert!(matches!(result, Err(CryptoError::MalformedKey { .. })));
    }

    #[test]
    fn short_key_rejected() {
        let fragment = FRAGMENT_ENGINE.encode([0xAB; 16]);
        let result = KeyMaterial::from_url_fragment(&fragment);

        assert_eq!(result, Err(CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: 16 }));
    }

    #[test]
    fn long_key_rejected() {
        let fragment = FRAGMENT_ENGINE.encode([0xAB; 64]);
        let result = KeyMaterial::from_url_fragment(&fragment);

        assert!(matches!(result, Err(CryptoError::InvalidKeyLength { actual: 64, .. })));
    }

    #[test]
    fn empty_fragment_rejected() {
        assert!(KeyMaterial::from_url_fragment("").is_err());
    }

    #[test]
    fn debug_redacts_bytes() {
        let key = KeyMaterial::from_bytes([0x41; KEY_SIZE]);
        let debug = format!("{key:?}");

        assert_eq!(debug, "KeyMaterial([redacted])");
    }

    #[test]
    fn different_keys_not_equal() {
        let a = KeyMaterial::from_bytes([0x01; KEY_SIZE]);
        let b = KeyMaterial::from_bytes([0x02; KEY_SIZE]);

        assert_ne!(a, b);
    }
}
