//! Application layer errors.

use sendlink_client::SessionError;
use thiserror::Error;

/// Gateway errors.
///
/// Only blob fetches surface these. Access request failures are folded into
/// [`AccessOutcome::Failed`](sendlink_client::AccessOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Gateway could not be constructed.
    #[error("gateway setup failed: {0}")]
    Setup(String),

    /// Request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be read.
    #[error("body read failed: {0}")]
    Body(String),
}

/// Errors returned by [`crate::Runtime`].
#[derive(Debug, Error)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// Session rejected the operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Host failed to carry out an action.
    #[error("host error: {0}")]
    Host(#[source] E),
}

impl<E> RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns true if the session behind the runtime is unusable.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Session(e) => e.is_fatal(),
            Self::Host(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sendlink_client::SessionState;

    use super::*;

    #[derive(Debug, Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn host_errors_are_recoverable() {
        let err: RuntimeError<DiskFull> = RuntimeError::Host(DiskFull);

        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "host error: disk full");
    }

    #[test]
    fn session_errors_pass_through() {
        let err: RuntimeError<DiskFull> = SessionError::InvalidState {
            state: SessionState::Error,
            operation: "download file",
        }
        .into();

        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "invalid state transition: cannot download file from Error");
    }
}
