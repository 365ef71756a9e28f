//! Presentation seam.

use std::future::Future;

use sendlink_client::NotifyLevel;

/// Carries out the recipient-facing effects of a session.
///
/// The binary writes files to disk and text to stdout; tests record every
/// call.
pub trait Host: Send {
    /// Host-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Persist decrypted file contents under the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save_file(
        &mut self,
        file_name: &str,
        data: Vec<u8>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Place decrypted text on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Show a transient notification.
    fn notify(&mut self, level: NotifyLevel, message: &str);
}
