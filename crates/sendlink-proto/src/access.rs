//! Access request and response bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Kind of content a send carries.
///
/// Encoded on the wire as an integer tag (`0` text, `1` file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SendType {
    /// Inline text, decrypted at view time.
    Text,
    /// File blob behind a signed URL, decrypted at download time.
    File,
}

impl TryFrom<u8> for SendType {
    type Error = ProtoError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Text),
            1 => Ok(Self::File),
            other => Err(ProtoError::UnknownSendType(other)),
        }
    }
}

impl From<SendType> for u8 {
    fn from(send_type: SendType) -> Self {
        match send_type {
            SendType::Text => 0,
            SendType::File => 1,
        }
    }
}

impl fmt::Display for SendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Body of `POST /sends/access/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Base64 password verifier. Omitted until the server asks for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccessRequest {
    /// Request without a password verifier.
    pub fn anonymous() -> Self {
        Self { password: None }
    }

    /// Request carrying an encoded password verifier.
    pub fn with_password(verifier_b64: impl Into<String>) -> Self {
        Self { password: Some(verifier_b64.into()) }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Inline text section of an access response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSection {
    /// Ciphertext of the text.
    pub text: String,
    /// Sender asked for the text to be masked until revealed.
    #[serde(default)]
    pub hidden: bool,
}

/// File section of an access response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSection {
    /// Server-side file identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Ciphertext of the file name.
    pub file_name: String,
    /// Plaintext size in bytes, as reported by the server.
    #[serde(default)]
    pub size: Option<String>,
    /// Human readable size.
    #[serde(default)]
    pub size_name: Option<String>,
    /// Short-lived URL of the sealed blob.
    pub url: String,
}

/// Successful access response.
///
/// All content fields are still ciphertext and must be decrypted with the
/// key from the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResponse {
    /// Send identifier.
    pub id: String,
    /// Send type tag.
    #[serde(rename = "type")]
    pub send_type: SendType,
    /// Ciphertext of the send name.
    #[serde(default)]
    pub name: Option<String>,
    /// Present for text sends.
    #[serde(default)]
    pub text: Option<TextSection>,
    /// Present for file sends.
    #[serde(default)]
    pub file: Option<FileSection>,
}

impl AccessResponse {
    /// Parse and validate a JSON response body.
    ///
    /// # Errors
    ///
    /// - `Malformed`: not JSON, wrong shape, or unknown type tag
    /// - `MissingSection`: the section named by the type tag is absent
    pub fn from_json(body: &[u8]) -> Result<Self, ProtoError> {
        let response: Self = serde_json::from_slice(body)?;
        response.validate()?;
        Ok(response)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Check that the section named by the type tag is present.
    pub fn validate(&self) -> Result<(), ProtoError> {
        let present = match self.send_type {
            SendType::Text => self.text.is_some(),
            SendType::File => self.file.is_some(),
        };

        if present {
            Ok(())
        } else {
            Err(ProtoError::MissingSection { send_type: self.send_type })
        }
    }
}
