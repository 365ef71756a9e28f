//! Session error types.

use sendlink_crypto::CryptoError;
use thiserror::Error;

use crate::SessionState;

/// Errors returned by [`crate::Session::handle`].
///
/// Network and decryption failures are not errors at this level: they become
/// state transitions or notifications. What remains is misuse of the state
/// machine and a link whose key cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation is not valid in the current state
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// State when the operation was attempted
        state: SessionState,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Link key fragment could not be decoded
    #[error("malformed key: {0}")]
    MalformedKey(CryptoError),

    /// Password verifier derivation failed
    #[error("password derivation failed: {0}")]
    Derivation(CryptoError),
}

impl SessionError {
    /// Returns true if the session cannot recover from this error.
    ///
    /// A malformed key leaves the session in `Error`; a fresh session is
    /// needed. Invalid transitions leave the state untouched.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::MalformedKey(_) | Self::Derivation(_) => true,
            Self::InvalidState { .. } => false,
        }
    }
}
