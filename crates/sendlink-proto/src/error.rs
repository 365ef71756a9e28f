//! Wire decoding errors.

use thiserror::Error;

use crate::SendType;

/// Errors that can occur while encoding or decoding access messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// Body is not valid JSON for the expected shape
    #[error("malformed body: {0}")]
    Malformed(String),

    /// Send type tag is not one this client understands
    #[error("unknown send type: {0}")]
    UnknownSendType(u8),

    /// Response type tag has no matching content section
    #[error("{send_type} send is missing its content section")]
    MissingSection {
        /// Declared send type
        send_type: SendType,
    },
}

impl From<serde_json::Error> for ProtoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
