//! Payload decryption using `XChaCha20-Poly1305`
//!
//! Every ciphertext, whether an inline metadata field or a fetched file blob,
//! has the same layout:
//!
//! ```text
//! +----------------+-------------------------------+
//! | nonce (24)     | ciphertext || tag (16)        |
//! +----------------+-------------------------------+
//! ```
//!
//! Inline fields travel as standard base64 of that layout. File blobs are the
//! raw bytes.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};

use crate::{CryptoError, KeyMaterial};

/// `XChaCha20` nonce size (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Decrypt a sealed payload with the send key.
///
/// # Errors
///
/// - `DecryptionFailed`: payload shorter than nonce + tag, or authentication
///   tag mismatch (wrong key or tampered bytes)
pub fn decrypt(sealed: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed {
            reason: format!(
                "ciphertext too short: {} bytes, need at least {}",
                sealed.len(),
                NONCE_SIZE + TAG_SIZE
            ),
        });
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher.decrypt(XNonce::from_slice(nonce), ciphertext).map_err(|_| {
        CryptoError::DecryptionFailed { reason: "authentication failed".to_string() }
    })
}

/// Seal a payload under the send key.
///
/// The caller provides the nonce. It MUST be unique per key in production.
pub fn seal(plaintext: &[u8], key: &KeyMaterial, nonce: [u8; NONCE_SIZE]) -> Vec<u8> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let Ok(ciphertext) = cipher.encrypt(XNonce::from_slice(&nonce), plaintext) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    sealed
}

/// Decrypt a base64 metadata field.
///
/// # Errors
///
/// - `DecryptionFailed`: field is not base64, or see [`decrypt`]
pub fn decrypt_field(field: &str, key: &KeyMaterial) -> Result<Vec<u8>, CryptoError> {
    let sealed = STANDARD.decode(field).map_err(|e| CryptoError::DecryptionFailed {
        reason: format!("field is not base64: {e}"),
    })?;

    decrypt(&sealed, key)
}

/// Decrypt a base64 metadata field holding UTF-8 text.
///
/// # Errors
///
/// - `DecryptionFailed`: see [`decrypt_field`], or plaintext is not UTF-8
pub fn decrypt_field_str(field: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
    let plaintext = decrypt_field(field, key)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed {
        reason: "plaintext is not valid UTF-8".to_string(),
    })
}

/// Seal a metadata field and encode it as base64.
pub fn seal_field(plaintext: &[u8], key: &KeyMaterial, nonce: [u8; NONCE_SIZE]) -> String {
    STANDARD.encode(seal(plaintext, key, nonce))
}
