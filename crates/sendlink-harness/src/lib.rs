//! Deterministic simulation harness for sendlink testing.
//!
//! In-memory implementations of the [`AccessGateway`](sendlink_app::AccessGateway)
//! and [`Host`](sendlink_app::Host) seams, so the production
//! [`Runtime`](sendlink_app::Runtime) runs unchanged in tests.
//!
//! - [`SimServer`]: a send service that seals content with seeded nonces,
//!   answers password challenges, serves blobs, and counts every call
//! - [`RecordingHost`]: records saved files, clipboard writes and
//!   notifications

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod recording_host;
pub mod sim_server;

pub use recording_host::{HostFailure, RecordingHost};
pub use sim_server::{AccessCall, PublishedSend, SimServer};
