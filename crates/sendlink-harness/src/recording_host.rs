//! Host that records every effect.

use sendlink_app::Host;
use sendlink_client::NotifyLevel;
use thiserror::Error;

/// Injected host failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host failure: {0}")]
pub struct HostFailure(pub String);

/// Recording [`Host`] for assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Saved files as `(file_name, data)`.
    pub saved: Vec<(String, Vec<u8>)>,
    /// Clipboard writes, oldest first.
    pub clipboard: Vec<String>,
    /// Notifications, oldest first.
    pub notifications: Vec<(NotifyLevel, String)>,
    fail_saves: bool,
}

impl RecordingHost {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail.
    pub fn fail_saves(&mut self) {
        self.fail_saves = true;
    }

    /// Notifications of the given level.
    pub fn notifications_at(&self, level: NotifyLevel) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Host for RecordingHost {
    type Error = HostFailure;

    async fn save_file(&mut self, file_name: &str, data: Vec<u8>) -> Result<(), HostFailure> {
        if self.fail_saves {
            return Err(HostFailure(format!("cannot write {file_name}")));
        }
        self.saved.push((file_name.to_string(), data));
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), HostFailure> {
        self.clipboard.push(text.to_string());
        Ok(())
    }

    fn notify(&mut self, level: NotifyLevel, message: &str) {
        tracing::debug!(?level, %message, "notification");
        self.notifications.push((level, message.to_string()));
    }
}
