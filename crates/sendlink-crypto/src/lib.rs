//! Sendlink Cryptographic Primitives
//!
//! Cryptographic building blocks for recipient-side send access. Pure
//! functions with deterministic outputs. Callers provide nonces when sealing
//! so that fixtures are reproducible.
//!
//! # Key Flow
//!
//! ```text
//! Link fragment (URL-safe base64)
//!        │
//!        ▼
//! KeyMaterial (32 bytes, never leaves the client)
//!        │                          │
//!        ▼                          ▼
//! PBKDF2-HMAC-SHA256          XChaCha20-Poly1305
//! (salt = key, password)      (name, text, file name, file blob)
//!        │                          │
//!        ▼                          ▼
//! PasswordVerifier → server   Plaintext → recipient
//! ```
//!
//! # Security
//!
//! Key Confinement:
//! - The key is decoded once from the link and held by a single session
//! - Only the one-way password verifier is ever sent to the server
//! - Key and verifier bytes are zeroized on drop and redacted from `Debug`
//!
//! Authenticity:
//! - Every ciphertext is `nonce || ciphertext || tag`
//! - Failed authentication tag -> `DecryptionFailed`, no plaintext returned

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod key;
mod password;
mod payload;

pub use error::CryptoError;
pub use key::{KEY_SIZE, KeyMaterial};
pub use password::{PASSWORD_ITERATIONS, PasswordVerifier, derive_password_verifier};
pub use payload::{
    NONCE_SIZE, TAG_SIZE, decrypt, decrypt_field, decrypt_field_str, seal, seal_field,
};
