//! HTTP gateway for the send service.
//!
//! Thin layer over reqwest: encodes requests, maps statuses to outcomes.
//! Protocol logic remains in the Sans-IO session.

use reqwest::{
    Client, StatusCode,
    header::{CACHE_CONTROL, CONTENT_TYPE},
};
use sendlink_client::{AccessOutcome, AccessResponse};
use sendlink_proto::AccessRequest;

use crate::{AccessGateway, FetchedFile, GatewayConfig, GatewayError};

/// reqwest-backed [`AccessGateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Build a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Setup` if the TLS backend cannot be initialised.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GatewayError::Setup(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl AccessGateway for HttpGateway {
    async fn request_access(&mut self, send_id: &str, password: Option<&str>) -> AccessOutcome {
        let request = match password {
            Some(verifier) => AccessRequest::with_password(verifier),
            None => AccessRequest::anonymous(),
        };
        let body = match request.to_json() {
            Ok(body) => body,
            Err(e) => return AccessOutcome::Failed { reason: e.to_string() },
        };

        let response = match self
            .client
            .post(self.config.access_url(send_id))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AccessOutcome::Failed { reason: format!("request failed: {e}") },
        };

        match response.status() {
            StatusCode::UNAUTHORIZED => AccessOutcome::PasswordRequired,
            status if status.is_success() => match response.bytes().await {
                Ok(bytes) => match AccessResponse::from_json(&bytes) {
                    Ok(access) => AccessOutcome::Granted(access),
                    Err(e) => AccessOutcome::Failed { reason: e.to_string() },
                },
                Err(e) => AccessOutcome::Failed { reason: format!("body read failed: {e}") },
            },
            status => AccessOutcome::Failed { reason: format!("status {status}") },
        }
    }

    async fn fetch_file(&mut self, url: &str) -> Result<FetchedFile, GatewayError> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| GatewayError::Body(e.to_string()))?;

        Ok(FetchedFile { status, body: body.to_vec() })
    }
}
