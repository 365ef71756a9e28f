//! Session events and actions.

use std::fmt;

use sendlink_proto::AccessResponse;

/// Result of one access request, as reported by the gateway.
///
/// Every failure other than 401 is collapsed into `Failed`. The session must
/// not learn, and therefore cannot reveal, whether a send is missing, expired
/// or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Server released the encrypted send.
    Granted(AccessResponse),

    /// Server answered 401: a password verifier is needed.
    PasswordRequired,

    /// Any other status, transport error or unreadable body.
    Failed {
        /// Diagnostic reason. Logged, never shown to the recipient.
        reason: String,
    },
}

/// Events the caller feeds into the session.
///
/// `Debug` output never contains a submitted password.
#[derive(Clone)]
pub enum SessionEvent {
    /// Link resolved into its identifier and key fragment.
    ///
    /// Either part may be absent, in which case the session does nothing.
    Initiate {
        /// `sendId` route segment.
        send_id: Option<String>,
        /// `key` fragment, URL-safe base64.
        key: Option<String>,
    },

    /// Recipient entered a password after a challenge.
    SubmitPassword {
        /// Password as typed.
        password: String,
    },

    /// Gateway finished an access request.
    AccessResolved(AccessOutcome),

    /// Recipient toggled between masked and revealed text.
    ToggleReveal,

    /// Recipient asked to copy the text.
    CopyText,

    /// Recipient asked to download the file.
    DownloadFile,

    /// Blob fetch completed with an HTTP status.
    FileFetched {
        /// HTTP status code.
        status: u16,
        /// Response body, sealed bytes on success.
        body: Vec<u8>,
    },

    /// Blob fetch failed before a status was received.
    FileFetchFailed {
        /// Transport error description.
        reason: String,
    },
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiate { send_id, key } => f
                .debug_struct("Initiate")
                .field("send_id", send_id)
                .field("key", &key.as_ref().map(|_| "[redacted]"))
                .finish(),
            Self::SubmitPassword { .. } => {
                f.debug_struct("SubmitPassword").field("password", &"[redacted]").finish()
            },
            Self::AccessResolved(outcome) => {
                f.debug_tuple("AccessResolved").field(outcome).finish()
            },
            Self::ToggleReveal => f.write_str("ToggleReveal"),
            Self::CopyText => f.write_str("CopyText"),
            Self::DownloadFile => f.write_str("DownloadFile"),
            Self::FileFetched { status, body } => f
                .debug_struct("FileFetched")
                .field("status", status)
                .field("body_len", &body.len())
                .finish(),
            Self::FileFetchFailed { reason } => {
                f.debug_struct("FileFetchFailed").field("reason", reason).finish()
            },
        }
    }
}

/// Severity of a recipient-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed; the recipient may retry.
    Error,
}

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Submit an access request.
    ///
    /// Feed the result back as [`SessionEvent::AccessResolved`].
    RequestAccess {
        /// Send identifier.
        send_id: String,
        /// Base64 password verifier, if one was derived.
        password: Option<String>,
    },

    /// Fetch the sealed file blob, bypassing caches.
    ///
    /// Feed the result back as [`SessionEvent::FileFetched`] or
    /// [`SessionEvent::FileFetchFailed`].
    FetchFile {
        /// Short-lived blob URL.
        url: String,
    },

    /// Persist decrypted file contents.
    SaveFile {
        /// Decrypted file name.
        file_name: String,
        /// Decrypted file contents.
        data: Vec<u8>,
    },

    /// Write decrypted text to the clipboard.
    CopyToClipboard {
        /// Decrypted text.
        text: String,
    },

    /// Show a transient notification.
    Notify {
        /// Severity.
        level: NotifyLevel,
        /// Message text.
        message: String,
    },
}
