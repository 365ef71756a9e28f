//! Application layer for sendlink
//!
//! Drives the Sans-IO [`Session`](sendlink_client::Session) against real or
//! simulated I/O, so the same orchestration runs in the binary and in tests.
//!
//! # Components
//!
//! - [`AccessGateway`]: Network seam (access requests, blob fetches)
//! - [`Host`]: Presentation seam (save file, clipboard, notifications)
//! - [`Runtime`]: Executes session actions and feeds results back
//! - [`SendLink`]: Splits a shared link into identifier and key fragment
//! - [`GatewayConfig`]: Service endpoint and request settings
//! - `HttpGateway`: reqwest-backed gateway (feature `http`)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod gateway;
mod host;
#[cfg(feature = "http")]
mod http;
mod link;
mod runtime;

pub use config::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, GatewayConfig};
pub use error::{GatewayError, RuntimeError};
pub use gateway::{AccessGateway, FetchedFile};
pub use host::Host;
#[cfg(feature = "http")]
pub use http::HttpGateway;
pub use link::SendLink;
pub use runtime::Runtime;
