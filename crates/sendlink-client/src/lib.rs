//! Client
//!
//! Action-based session state machine for recipient-side access to a secure
//! send. Holds the link key, answers the server's password challenge, and
//! decrypts the granted content.
//!
//! # Architecture
//!
//! The session is Sans-IO. It receives events ([`SessionEvent`]), processes
//! them through pure state machine logic, and returns actions
//! ([`SessionAction`]) for the caller to execute: access requests, blob
//! fetches, file saves, clipboard writes and notifications. Results of those
//! effects come back as further events.
//!
//! ```text
//! Uninitialized ──initiate──▶ Loading ──granted──▶ Ready ◀─┐ toggle / copy /
//!                                │  ▲                 └──┘ download
//!                          401   │  │ submit password
//!                                ▼  │
//!                          PasswordRequired
//!           Loading ──failed / bad metadata──▶ Error (terminal)
//! ```
//!
//! # Components
//!
//! - [`Session`]: the state machine
//! - [`SessionEvent`] / [`SessionAction`]: inputs and effects
//! - [`DecryptedView`]: what the recipient sees once access is granted

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod session;
mod view;

pub use error::SessionError;
pub use event::{AccessOutcome, NotifyLevel, SessionAction, SessionEvent};
pub use sendlink_crypto::{KeyMaterial, PASSWORD_ITERATIONS};
pub use sendlink_proto::{AccessResponse, SendType};
pub use session::{COPIED_MESSAGE, ERROR_MESSAGE, Session, SessionState};
pub use view::{DecryptedView, FileView, MASKED_TEXT, SendContent, TextView};
