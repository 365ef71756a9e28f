//! Password verifier derivation using PBKDF2-HMAC-SHA256

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{CryptoError, KeyMaterial};

/// PBKDF2 iteration count used by the access protocol.
///
/// Must match the count used when the send was protected, otherwise the
/// server rejects every verifier.
pub const PASSWORD_ITERATIONS: u32 = 100_000;

/// Size of the derived verifier in bytes (SHA-256 output).
const VERIFIER_SIZE: usize = 32;

/// One-way proof of knowledge of the send password.
///
/// Lives for a single access request. It is rebuilt from the password on
/// every attempt and never cached.
pub struct PasswordVerifier {
    bytes: [u8; VERIFIER_SIZE],
}

impl PasswordVerifier {
    /// Verifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Standard base64 encoding for the access request body.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }
}

impl PartialEq for PasswordVerifier {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for PasswordVerifier {}

impl fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordVerifier([redacted])")
    }
}

impl Drop for PasswordVerifier {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Derive the password verifier for a send.
///
/// PBKDF2-HMAC-SHA256 over the UTF-8 password with the send key as salt.
///
/// # Security
///
/// - Deterministic: same (password, key, iterations) always yields the same
///   verifier, which is what the server compares against
/// - The verifier cannot be inverted to recover the password or the key
///
/// # Errors
///
/// - `InvalidIterations`: `iterations` is zero
pub fn derive_password_verifier(
    password: &str,
    key: &KeyMaterial,
    iterations: u32,
) -> Result<PasswordVerifier, CryptoError> {
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations { iterations });
    }

    let mut bytes = [0u8; VERIFIER_SIZE];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), key.as_bytes(), iterations, &mut bytes)
        .map_err(|e| CryptoError::KeyDerivation { reason: e.to_string() })?;

    Ok(PasswordVerifier { bytes })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::KEY_SIZE;

    #[test]
    fn derive_is_deterministic() {
        let key = KeyMaterial::from_bytes([0x11; KEY_SIZE]);

        let a = derive_password_verifier("hunter2", &key, 1_000).unwrap();
        let b = derive_password_verifier("hunter2", &key, 1_000).unwrap();

        assert_eq!(a, b, "same inputs must produce same output");
    }

    #[test]
    fn different_passwords_produce_different_verifiers() {
        let key = KeyMaterial::from_bytes([0x11; KEY_SIZE]);

        let a = derive_password_verifier("hunter2", &key, 1_000).unwrap();
        let b = derive_password_verifier("hunter3", &key, 1_000).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn different_keys_produce_different_verifiers() {
        let a = derive_password_verifier("pw", &KeyMaterial::from_bytes([0x01; KEY_SIZE]), 10)
            .unwrap();
        let b = derive_password_verifier("pw", &KeyMaterial::from_bytes([0x02; KEY_SIZE]), 10)
            .unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn different_iterations_produce_different_verifiers() {
        let key = KeyMaterial::from_bytes([0x33; KEY_SIZE]);

        let a = derive_password_verifier("pw", &key, 10).unwrap();
        let b = derive_password_verifier("pw", &key, 11).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn zero_iterations_rejected() {
        let key = KeyMaterial::from_bytes([0x33; KEY_SIZE]);
        let result = derive_password_verifier("pw", &key, 0);

        assert_eq!(result.unwrap_err(), CryptoError::InvalidIterations { iterations: 0 });
    }

    #[test]
    fn base64_encoding_is_standard_padded() {
        let key = KeyMaterial::from_bytes([0x33; KEY_SIZE]);
        let verifier = derive_password_verifier("pw", &key, 1).unwrap();
        let encoded = verifier.to_base64();

        // 32 bytes -> 44 chars with one '=' of padding
        assert_eq!(encoded.len(), 44);
        assert!(encoded.ends_with('='));
        assert_eq!(STANDARD.decode(&encoded).unwrap(), verifier.as_bytes());
    }

    #[test]
    fn empty_password_still_derives() {
        let key = KeyMaterial::from_bytes([0x33; KEY_SIZE]);
        let verifier = derive_password_verifier("", &key, 1).unwrap();

        assert_eq!(verifier.as_bytes().len(), VERIFIER_SIZE);
    }

    #[test]
    fn debug_redacts_bytes() {
        let key = KeyMaterial::from_bytes([0x33; KEY_SIZE]);
        let verifier = derive_password_verifier("pw", &key, 1).unwrap();

        assert_eq!(format!("{verifier:?}"), "PasswordVerifier([redacted])");
    }
}
