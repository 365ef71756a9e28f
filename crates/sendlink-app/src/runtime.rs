//! Generic runtime for session orchestration.
//!
//! The Runtime owns a [`Session`] and executes its actions, coordinating
//! between:
//! - [`Session`]: access state machine
//! - [`AccessGateway`]: network I/O
//! - [`Host`]: recipient-facing effects

use std::collections::VecDeque;

use sendlink_client::{
    ERROR_MESSAGE, NotifyLevel, Session, SessionAction, SessionError, SessionEvent,
};

use crate::{AccessGateway, Host, RuntimeError, SendLink};

/// Generic runtime that drives one [`Session`] to completion.
///
/// Each public operation feeds one recipient event into the session, then
/// executes the resulting actions until the session stops producing them.
/// Gateway results are fed back as events in the same call, so every
/// operation returns with no request outstanding.
///
/// # Type Parameters
///
/// - `G`: Network gateway
/// - `H`: Host for files, clipboard and notifications
pub struct Runtime<G, H>
where
    G: AccessGateway,
    H: Host,
{
    gateway: G,
    host: H,
    session: Session,
}

impl<G, H> Runtime<G, H>
where
    G: AccessGateway,
    H: Host,
{
    /// Create a runtime around a fresh session.
    pub fn new(gateway: G, host: H) -> Self {
        Self { gateway, host, session: Session::new() }
    }

    /// Session state, for rendering.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Gateway in use.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Host in use.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Start the session from a parsed link.
    ///
    /// A malformed key also raises a generic error notification on the host.
    ///
    /// # Errors
    ///
    /// Returns `Session(MalformedKey)` for an undecodable key, or `Host` if
    /// the host fails.
    pub async fn initiate(&mut self, link: &SendLink) -> Result<(), RuntimeError<H::Error>> {
        let event =
            SessionEvent::Initiate { send_id: link.send_id.clone(), key: link.key.clone() };

        match self.dispatch(event).await {
            Err(RuntimeError::Session(e @ SessionError::MalformedKey(_))) => {
                self.host.notify(NotifyLevel::Error, ERROR_MESSAGE);
                Err(e.into())
            },
            other => other,
        }
    }

    /// Answer a password challenge.
    ///
    /// # Errors
    ///
    /// Returns `Session(InvalidState)` unless a password is required.
    pub async fn submit_password(&mut self, password: &str) -> Result<(), RuntimeError<H::Error>> {
        self.dispatch(SessionEvent::SubmitPassword { password: password.to_string() }).await
    }

    /// Flip between masked and clear text.
    ///
    /// # Errors
    ///
    /// Returns `Session(InvalidState)` unless a text send is ready.
    pub async fn toggle_reveal(&mut self) -> Result<(), RuntimeError<H::Error>> {
        self.dispatch(SessionEvent::ToggleReveal).await
    }

    /// Copy the text to the host clipboard.
    ///
    /// # Errors
    ///
    /// Returns `Session(InvalidState)` unless a text send is ready, or `Host`
    /// if the clipboard write fails.
    pub async fn copy_text(&mut self) -> Result<(), RuntimeError<H::Error>> {
        self.dispatch(SessionEvent::CopyText).await
    }

    /// Download, decrypt and save the file.
    ///
    /// Fetch and decryption failures are reported through host
    /// notifications; the session stays ready for a retry.
    ///
    /// # Errors
    ///
    /// Returns `Session(InvalidState)` unless a file send is ready, or `Host`
    /// if saving fails.
    pub async fn download_file(&mut self) -> Result<(), RuntimeError<H::Error>> {
        self.dispatch(SessionEvent::DownloadFile).await
    }

    /// Feed an event and run the session until it is quiescent.
    ///
    /// # Errors
    ///
    /// Returns the first session or host error. Actions already executed are
    /// not rolled back.
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<(), RuntimeError<H::Error>> {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let actions = self.session.handle(event)?;
            for action in actions {
                if let Some(next) = self.execute(action).await? {
                    pending.push_back(next);
                }
            }
        }

        Ok(())
    }

    /// Execute one action, returning the event that reports its result.
    async fn execute(
        &mut self,
        action: SessionAction,
    ) -> Result<Option<SessionEvent>, RuntimeError<H::Error>> {
        match action {
            SessionAction::RequestAccess { send_id, password } => {
                tracing::debug!(%send_id, with_password = password.is_some(), "requesting access");
                let outcome = self.gateway.request_access(&send_id, password.as_deref()).await;
                Ok(Some(SessionEvent::AccessResolved(outcome)))
            },
            SessionAction::FetchFile { url } => {
                let event = match self.gateway.fetch_file(&url).await {
                    Ok(file) => SessionEvent::FileFetched { status: file.status, body: file.body },
                    Err(e) => SessionEvent::FileFetchFailed { reason: e.to_string() },
                };
                Ok(Some(event))
            },
            SessionAction::SaveFile { file_name, data } => {
                tracing::debug!(%file_name, len = data.len(), "saving file");
                self.host.save_file(&file_name, data).await.map_err(RuntimeError::Host)?;
                Ok(None)
            },
            SessionAction::CopyToClipboard { text } => {
                self.host.copy_to_clipboard(&text).map_err(RuntimeError::Host)?;
                Ok(None)
            },
            SessionAction::Notify { level, message } => {
                self.host.notify(level, &message);
                Ok(None)
            },
        }
    }
}
