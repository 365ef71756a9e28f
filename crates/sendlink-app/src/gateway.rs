//! Network seam.

use std::future::Future;

use sendlink_client::AccessOutcome;

use crate::GatewayError;

/// Raw result of a blob fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Sealed bytes when `status == 200`.
    pub body: Vec<u8>,
}

/// Talks to the send service on behalf of a [`crate::Runtime`].
///
/// # Implementations
///
/// - **HTTP**: `HttpGateway` (feature `http`), reqwest over rustls
/// - **Simulation**: `SimServer` in `sendlink-harness`, in memory
///
/// Implementations receive the send identifier and, at most, a base64
/// password verifier. They never see the password or the link key.
pub trait AccessGateway: Send {
    /// Submit an access request.
    ///
    /// HTTP 401 must map to [`AccessOutcome::PasswordRequired`]. Every other
    /// failure, including transport errors and undecodable bodies, maps to
    /// [`AccessOutcome::Failed`].
    fn request_access(
        &mut self,
        send_id: &str,
        password: Option<&str>,
    ) -> impl Future<Output = AccessOutcome> + Send;

    /// Fetch a sealed file blob, bypassing any cache.
    ///
    /// Non-200 statuses are returned as [`FetchedFile`], not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received or its body was lost.
    fn fetch_file(
        &mut self,
        url: &str,
    ) -> impl Future<Output = Result<FetchedFile, GatewayError>> + Send;
}
