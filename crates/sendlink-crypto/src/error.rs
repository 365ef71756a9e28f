//! Error types for sendlink cryptographic operations

use thiserror::Error;

/// Errors from key handling, password derivation and payload decryption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Link key fragment is not valid URL-safe base64
    #[error("malformed key: {reason}")]
    MalformedKey {
        /// Reason the fragment was rejected
        reason: String,
    },

    /// Decoded key has the wrong number of bytes
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// PBKDF2 iteration count must be at least one
    #[error("invalid iteration count: {iterations}")]
    InvalidIterations {
        /// Rejected iteration count
        iterations: u32,
    },

    /// Key derivation primitive reported an error
    #[error("key derivation failed: {reason}")]
    KeyDerivation {
        /// Reason reported by the primitive
        reason: String,
    },

    /// Authentication tag mismatch or malformed ciphertext
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for decryption failure
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal for the session holding the key.
    ///
    /// A bad key can never be repaired in-session. A failed decryption of a
    /// fetched blob may succeed on a later fetch.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::MalformedKey { .. } | Self::InvalidKeyLength { .. } => true,
            Self::InvalidIterations { .. } | Self::KeyDerivation { .. } => true,
            Self::DecryptionFailed { .. } => false,
        }
    }
}
