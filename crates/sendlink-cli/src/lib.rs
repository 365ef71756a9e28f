//! Terminal host for the `sendlink` binary.
//!
//! Files are written into an output directory, copied text goes to stdout,
//! and notifications become log events.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use sendlink_app::{GatewayError, Host, RuntimeError};
use sendlink_client::NotifyLevel;
use thiserror::Error;

/// Name used when a decrypted file name has no usable final component.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Binary errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Link lacks an identifier or key.
    #[error("link must contain both a send id and a key")]
    IncompleteLink,

    /// Access was refused or the send could not be opened.
    #[error("{0}")]
    AccessFailed(&'static str),

    /// Password challenge not answered.
    #[error("password required")]
    PasswordRequired,

    /// Download or save did not complete.
    #[error("download failed")]
    DownloadFailed,

    /// Gateway could not be built.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Runtime rejected an operation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError<io::Error>),

    /// Terminal I/O failed.
    #[error("terminal i/o: {0}")]
    Io(#[from] io::Error),
}

/// [`Host`] backed by the local filesystem and terminal.
#[derive(Debug)]
pub struct CliHost {
    output_dir: PathBuf,
    saved: Vec<PathBuf>,
    errors: usize,
}

impl CliHost {
    /// Host that saves files under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into(), saved: Vec::new(), errors: 0 }
    }

    /// Paths written so far.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Number of error notifications received.
    pub fn errors(&self) -> usize {
        self.errors
    }
}

impl Host for CliHost {
    type Error = io::Error;

    async fn save_file(&mut self, file_name: &str, data: Vec<u8>) -> Result<(), io::Error> {
        let path = self.output_dir.join(safe_file_name(file_name));
        tokio::fs::write(&path, &data).await?;

        tracing::info!(path = %path.display(), bytes = data.len(), "file saved");
        self.saved.push(path);
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), io::Error> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }

    fn notify(&mut self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success => tracing::info!("{message}"),
            NotifyLevel::Error => {
                self.errors += 1;
                tracing::error!("{message}");
            },
        }
    }
}

/// Final path component of a decrypted file name.
///
/// The name comes from the sender, so directories and parent references are
/// dropped.
pub fn safe_file_name(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}
