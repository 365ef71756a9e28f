//! Send access session state machine.
//!
//! The `Session` owns the link key for its whole lifetime and drives one
//! recipient through the access flow: initial request, optional password
//! challenge, decryption of the granted metadata, and any number of file
//! downloads.

use std::fmt;

use sendlink_crypto::{KeyMaterial, PASSWORD_ITERATIONS, decrypt, derive_password_verifier};
use zeroize::Zeroizing;

use crate::{
    AccessOutcome, DecryptedView, FileView, NotifyLevel, SendContent, SessionAction,
    SessionError, SessionEvent,
};

/// Generic failure message shown to the recipient.
pub const ERROR_MESSAGE: &str = "An error has occurred.";

/// Confirmation shown after text was copied.
pub const COPIED_MESSAGE: &str = "Copied!";

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Link not (fully) resolved yet.
    Uninitialized,
    /// Access request in flight.
    Loading,
    /// Server asked for a password.
    PasswordRequired,
    /// Content decrypted and viewable.
    Ready,
    /// Access failed or the link is unusable. Terminal.
    Error,
}

/// Recipient-side access session for a single send.
///
/// # Invariants
///
/// - `key` is set exactly once, on a successful `Initiate`, and never changes
/// - `view` is `Some` iff `state == Ready`
/// - `downloading` is only ever true in `Ready` with a file send
/// - At most one access request is in flight (only `Loading` accepts results)
pub struct Session {
    state: SessionState,
    send_id: Option<String>,
    key: Option<KeyMaterial>,
    view: Option<DecryptedView>,
    /// Text currently shown in clear.
    revealed: bool,
    /// A blob fetch is outstanding.
    downloading: bool,
    /// Last password entered. Kept like a form field; the verifier is not.
    password: Option<Zeroizing<String>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("send_id", &self.send_id)
            .field("key", &self.key)
            .field("view", &self.view.as_ref().map(|_| "[decrypted]"))
            .field("revealed", &self.revealed)
            .field("downloading", &self.downloading)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session waiting for its link.
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            send_id: None,
            key: None,
            view: None,
            revealed: false,
            downloading: false,
            password: None,
        }
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::Initiate { send_id, key } => self.handle_initiate(send_id, key),
            SessionEvent::SubmitPassword { password } => self.handle_submit_password(password),
            SessionEvent::AccessResolved(outcome) => self.handle_access_resolved(outcome),
            SessionEvent::ToggleReveal => self.handle_toggle_reveal(),
            SessionEvent::CopyText => self.handle_copy_text(),
            SessionEvent::DownloadFile => self.handle_download_file(),
            SessionEvent::FileFetched { status, body } => self.handle_file_fetched(status, &body),
            SessionEvent::FileFetchFailed { reason } => self.handle_file_fetch_failed(&reason),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send identifier from the link. `None` until initiated.
    pub fn send_id(&self) -> Option<&str> {
        self.send_id.as_deref()
    }

    /// Link key. `None` until initiated.
    pub fn key(&self) -> Option<&KeyMaterial> {
        self.key.as_ref()
    }

    /// Decrypted view. `None` unless `Ready`.
    pub fn view(&self) -> Option<&DecryptedView> {
        self.view.as_ref()
    }

    /// Text as it should be displayed: clear when revealed, masked otherwise.
    ///
    /// `None` unless `Ready` with a text send.
    pub fn send_text(&self) -> Option<&str> {
        let text = self.view.as_ref()?.text()?;
        if self.revealed { Some(text.text.as_str()) } else { Some(text.masked_text()) }
    }

    /// Whether the content is currently shown in clear.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether a file download is in flight.
    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    /// Last password submitted.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState { state: self.state, operation }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    fn handle_initiate(
        &mut self,
        send_id: Option<String>,
        key: Option<String>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(self.invalid("initiate"));
        }

        let (Some(send_id), Some(key)) = (non_blank(send_id), non_blank(key)) else {
            tracing::debug!("link incomplete, waiting");
            return Ok(vec![]);
        };

        let key = match KeyMaterial::from_url_fragment(&key) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "link key rejected");
                self.transition(SessionState::Error);
                return Err(SessionError::MalformedKey(e));
            },
        };

        self.send_id = Some(send_id.clone());
        self.key = Some(key);
        self.transition(SessionState::Loading);

        Ok(vec![SessionAction::RequestAccess { send_id, password: None }])
    }

    fn handle_submit_password(
        &mut self,
        password: String,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.state != SessionState::PasswordRequired {
            return Err(self.invalid("submit password"));
        }
        let (Some(send_id), Some(key)) = (self.send_id.clone(), self.key.as_ref()) else {
            return Err(self.invalid("submit password"));
        };

        // Derived fresh on every attempt; a verifier from an earlier wrong
        // password must never be replayed.
        let verifier = derive_password_verifier(&password, key, PASSWORD_ITERATIONS)
            .map_err(SessionError::Derivation)?;

        self.password = Some(Zeroizing::new(password));
        self.transition(SessionState::Loading);

        Ok(vec![SessionAction::RequestAccess { send_id, password: Some(verifier.to_base64()) }])
    }

    fn handle_access_resolved(
        &mut self,
        outcome: AccessOutcome,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if self.state != SessionState::Loading {
            return Err(self.invalid("resolve access"));
        }
        let Some(key) = self.key.as_ref() else {
            return Err(self.invalid("resolve access"));
        };

        match outcome {
            AccessOutcome::Granted(response) => match DecryptedView::decrypt(&response, key) {
                Ok(view) => {
                    self.revealed = match &view.content {
                        SendContent::Text(text) => !text.hidden,
                        SendContent::File(_) => true,
                    };
                    self.view = Some(view);
                    self.transition(SessionState::Ready);
                },
                Err(e) => {
                    tracing::warn!(error = %e, "granted send could not be decrypted");
                    self.transition(SessionState::Error);
                },
            },
            AccessOutcome::PasswordRequired => {
                self.transition(SessionState::PasswordRequired);
            },
            AccessOutcome::Failed { reason } => {
                tracing::warn!(%reason, "access failed");
                self.transition(SessionState::Error);
            },
        }

        Ok(vec![])
    }

    fn handle_toggle_reveal(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        if self.ready_text().is_none() {
            return Err(self.invalid("toggle reveal"));
        }

        self.revealed = !self.revealed;
        Ok(vec![])
    }

    fn handle_copy_text(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let Some(text) = self.ready_text() else {
            return Err(self.invalid("copy text"));
        };

        Ok(vec![
            SessionAction::CopyToClipboard { text: text.to_string() },
            SessionAction::Notify {
                level: NotifyLevel::Success,
                message: COPIED_MESSAGE.to_string(),
            },
        ])
    }

    fn handle_download_file(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let Some(url) = self.ready_file().map(|file| file.url.clone()) else {
            return Err(self.invalid("download file"));
        };

        if self.downloading {
            tracing::debug!("download already in flight, ignoring");
            return Ok(vec![]);
        }

        self.downloading = true;
        Ok(vec![SessionAction::FetchFile { url }])
    }

    fn handle_file_fetched(
        &mut self,
        status: u16,
        body: &[u8],
    ) -> Result<Vec<SessionAction>, SessionError> {
        if !self.downloading {
            return Err(self.invalid("complete download"));
        }
        self.downloading = false;

        if status != 200 {
            tracing::warn!(status, "file fetch rejected");
            return Ok(vec![error_notification()]);
        }

        let (Some(file), Some(key)) = (self.ready_file(), self.key.as_ref()) else {
            return Err(self.invalid("complete download"));
        };

        match decrypt(body, key) {
            Ok(data) => {
                Ok(vec![SessionAction::SaveFile { file_name: file.file_name.clone(), data }])
            },
            Err(e) => {
                tracing::warn!(error = %e, "file could not be decrypted");
                Ok(vec![error_notification()])
            },
        }
    }

    fn handle_file_fetch_failed(
        &mut self,
        reason: &str,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if !self.downloading {
            return Err(self.invalid("complete download"));
        }
        self.downloading = false;

        tracing::warn!(%reason, "file fetch failed");
        Ok(vec![error_notification()])
    }

    fn ready_text(&self) -> Option<&str> {
        if self.state != SessionState::Ready {
            return None;
        }
        self.view.as_ref()?.text().map(|text| text.text.as_str())
    }

    fn ready_file(&self) -> Option<&FileView> {
        if self.state != SessionState::Ready {
            return None;
        }
        self.view.as_ref()?.file()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn error_notification() -> SessionAction {
    SessionAction::Notify { level: NotifyLevel::Error, message: ERROR_MESSAGE.to_string() }
}
