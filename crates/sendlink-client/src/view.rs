//! Recipient-visible view of a granted send.
//!
//! Built once from an [`AccessResponse`] by decrypting its metadata fields
//! with the link key. File contents are not part of the view: they are
//! fetched and decrypted on demand.

use sendlink_crypto::{CryptoError, KeyMaterial, decrypt_field_str};
use sendlink_proto::{AccessResponse, ProtoError, SendType};

/// Placeholder shown instead of hidden text.
///
/// Same for every text, whatever its length.
pub const MASKED_TEXT: &str = "••••••••";

/// Decrypted text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextView {
    /// Full plaintext.
    pub text: String,
    /// Sender asked for the text to be masked until revealed.
    pub hidden: bool,
}

impl TextView {
    /// Masked representation of the text.
    pub fn masked_text(&self) -> &'static str {
        MASKED_TEXT
    }
}

/// Decrypted file metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    /// Server-side file identifier.
    pub id: Option<String>,
    /// Decrypted file name.
    pub file_name: String,
    /// Size in bytes as reported by the server.
    pub size: Option<String>,
    /// Human readable size.
    pub size_name: Option<String>,
    /// Short-lived URL of the sealed blob.
    pub url: String,
}

/// Content of a granted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendContent {
    /// Inline text.
    Text(TextView),
    /// File available for download.
    File(FileView),
}

/// Decrypted view of a send.
///
/// Immutable once built. The reveal toggle lives on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedView {
    /// Send identifier.
    pub id: String,
    /// Decrypted send name, if the server returned one.
    pub name: Option<String>,
    /// Text or file content.
    pub content: SendContent,
}

impl DecryptedView {
    /// Decrypt the metadata of an access response.
    ///
    /// # Errors
    ///
    /// - `DecryptionFailed`: any ciphertext field fails authentication, or the
    ///   section named by the type tag is missing
    pub fn decrypt(response: &AccessResponse, key: &KeyMaterial) -> Result<Self, CryptoError> {
        response.validate().map_err(missing_section)?;

        let name = response.name.as_deref().map(|n| decrypt_field_str(n, key)).transpose()?;

        let content = match (response.send_type, &response.text, &response.file) {
            (SendType::Text, Some(text), _) => SendContent::Text(TextView {
                text: decrypt_field_str(&text.text, key)?,
                hidden: text.hidden,
            }),
            (SendType::File, _, Some(file)) => SendContent::File(FileView {
                id: file.id.clone(),
                file_name: decrypt_field_str(&file.file_name, key)?,
                size: file.size.clone(),
                size_name: file.size_name.clone(),
                url: file.url.clone(),
            }),
            (send_type, ..) => {
                return Err(missing_section(ProtoError::MissingSection { send_type }));
            },
        };

        Ok(Self { id: response.id.clone(), name, content })
    }

    /// Send type of the content.
    pub fn send_type(&self) -> SendType {
        match self.content {
            SendContent::Text(_) => SendType::Text,
            SendContent::File(_) => SendType::File,
        }
    }

    /// Text content. `None` for file sends.
    pub fn text(&self) -> Option<&TextView> {
        match &self.content {
            SendContent::Text(text) => Some(text),
            SendContent::File(_) => None,
        }
    }

    /// File content. `None` for text sends.
    pub fn file(&self) -> Option<&FileView> {
        match &self.content {
            SendContent::File(file) => Some(file),
            SendContent::Text(_) => None,
        }
    }
}

fn missing_section(err: ProtoError) -> CryptoError {
    CryptoError::DecryptionFailed { reason: err.to_string() }
}
