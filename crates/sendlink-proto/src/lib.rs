//! Sendlink wire types
//!
//! JSON shapes exchanged with the send service during recipient access. Every
//! field marked as ciphertext is opaque at this layer: decoding an
//! [`AccessResponse`] never requires the send key.
//!
//! # Access exchange
//!
//! ```text
//! POST /sends/access/{id}   { "password": "<base64 verifier>" }?
//!   200 -> AccessResponse
//!   401 -> password required
//!   *   -> failure (not distinguished)
//! GET {file.url}            raw sealed bytes
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod access;
mod error;

pub use access::{AccessRequest, AccessResponse, FileSection, SendType, TextSection};
pub use error::ProtoError;
