//! In-memory send service.
//!
//! `SimServer` plays the service side of the access protocol. Content is
//! sealed with keys and nonces drawn from a seeded ChaCha RNG, so a given seed
//! always produces the same wire bytes.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sendlink_app::{AccessGateway, FetchedFile, GatewayError};
use sendlink_client::{AccessOutcome, AccessResponse, SendType};
use sendlink_crypto::{
    KEY_SIZE, KeyMaterial, NONCE_SIZE, PASSWORD_ITERATIONS, derive_password_verifier, seal,
    seal_field,
};
use sendlink_proto::{FileSection, TextSection};

/// Base URL for blob links handed out by the server.
const BLOB_BASE: &str = "https://blobs.sim";

/// Origin used when building share links.
const SHARE_ORIGIN: &str = "https://send.sim";

/// One recorded access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCall {
    /// Requested send.
    pub send_id: String,
    /// Verifier sent with the request, if any.
    pub password: Option<String>,
}

/// Handle to a published send, as its sender would hold it.
#[derive(Debug, Clone)]
pub struct PublishedSend {
    /// Server-side identifier.
    pub send_id: String,
    /// Link key. Never stored by the server.
    pub key: KeyMaterial,
}

impl PublishedSend {
    /// Share link in `#/send/{id}/{key}` form.
    pub fn link(&self) -> String {
        format!("{SHARE_ORIGIN}/#/send/{}/{}", self.send_id, self.key.to_url_fragment())
    }
}

struct StoredSend {
    response: AccessResponse,
    /// Base64 verifier for protected sends.
    verifier: Option<String>,
}

/// Simulation send service for testing.
///
/// Tests publish sends, then hand the server to a
/// [`Runtime`](sendlink_app::Runtime) as its gateway. Fault injection covers
/// the failure paths the recipient must survive.
pub struct SimServer {
    rng: ChaCha8Rng,
    sends: HashMap<String, StoredSend>,
    blobs: HashMap<String, Vec<u8>>,
    access_calls: Vec<AccessCall>,
    fetch_calls: Vec<String>,
    /// Status returned for every fetch instead of the blob.
    fetch_status: Option<u16>,
    /// Transport error returned for every fetch.
    fetch_failure: Option<String>,
}

impl SimServer {
    /// Create an empty server with a deterministic RNG.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            sends: HashMap::new(),
            blobs: HashMap::new(),
            access_calls: Vec::new(),
            fetch_calls: Vec::new(),
            fetch_status: None,
            fetch_failure: None,
        }
    }

    /// Publish a text send under a fresh key.
    pub fn publish_text(
        &mut self,
        send_id: &str,
        name: &str,
        text: &str,
        hidden: bool,
    ) -> PublishedSend {
        let key = self.generate_key();
        let response = AccessResponse {
            id: send_id.to_string(),
            send_type: SendType::Text,
            name: Some(self.seal_text(name, &key)),
            text: Some(TextSection { text: self.seal_text(text, &key), hidden }),
            file: None,
        };

        self.store(send_id, response);
        PublishedSend { send_id: send_id.to_string(), key }
    }

    /// Publish a file send under a fresh key.
    pub fn publish_file(
        &mut self,
        send_id: &str,
        file_name: &str,
        contents: &[u8],
    ) -> PublishedSend {
        let key = self.generate_key();
        let file_id = format!("{send_id}-file");
        let url = format!("{BLOB_BASE}/{file_id}");
        let blob = seal(contents, &key, self.nonce());

        let response = AccessResponse {
            id: send_id.to_string(),
            send_type: SendType::File,
            name: Some(self.seal_text(file_name, &key)),
            text: None,
            file: Some(FileSection {
                id: Some(file_id),
                file_name: self.seal_text(file_name, &key),
                size: Some(contents.len().to_string()),
                size_name: Some(format!("{} Bytes", contents.len())),
                url: url.clone(),
            }),
        };

        self.blobs.insert(url, blob);
        self.store(send_id, response);
        PublishedSend { send_id: send_id.to_string(), key }
    }

    /// Require a password for an already published send.
    ///
    /// Returns `false` if the send does not exist.
    pub fn protect(&mut self, send: &PublishedSend, password: &str) -> bool {
        let Some(stored) = self.sends.get_mut(&send.send_id) else {
            return false;
        };
        let Ok(verifier) = derive_password_verifier(password, &send.key, PASSWORD_ITERATIONS)
        else {
            unreachable!("protocol iteration count is non-zero");
        };

        stored.verifier = Some(verifier.to_base64());
        true
    }

    /// Replace a stored response wholesale, e.g. with one sealed under the
    /// wrong key.
    pub fn replace_response(&mut self, send_id: &str, response: AccessResponse) {
        if let Some(stored) = self.sends.get_mut(send_id) {
            stored.response = response;
        }
    }

    /// Answer every subsequent fetch with `status` and an empty body.
    pub fn fail_fetches_with(&mut self, status: u16) {
        self.fetch_status = Some(status);
    }

    /// Fail every subsequent fetch before a status is received.
    pub fn drop_fetches(&mut self, reason: &str) {
        self.fetch_failure = Some(reason.to_string());
    }

    /// Serve fetches normally again.
    pub fn heal_fetches(&mut self) {
        self.fetch_status = None;
        self.fetch_failure = None;
    }

    /// Flip one bit in the last byte of a stored blob.
    pub fn corrupt_blob(&mut self, url: &str) {
        if let Some(last) = self.blobs.get_mut(url).and_then(|blob| blob.last_mut()) {
            *last ^= 0x01;
        }
    }

    /// Blob URL of a file send.
    pub fn blob_url(&self, send_id: &str) -> Option<&str> {
        self.sends.get(send_id)?.response.file.as_ref().map(|file| file.url.as_str())
    }

    /// Every access request received, in order.
    pub fn access_calls(&self) -> &[AccessCall] {
        &self.access_calls
    }

    /// Every blob URL fetched, in order.
    pub fn fetch_calls(&self) -> &[String] {
        &self.fetch_calls
    }

    fn store(&mut self, send_id: &str, response: AccessResponse) {
        self.sends.insert(send_id.to_string(), StoredSend { response, verifier: None });
    }

    fn generate_key(&mut self) -> KeyMaterial {
        let mut bytes = [0u8; KEY_SIZE];
        self.rng.fill_bytes(&mut bytes);
        KeyMaterial::from_bytes(bytes)
    }

    fn nonce(&mut self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        self.rng.fill_bytes(&mut nonce);
        nonce
    }

    fn seal_text(&mut self, plaintext: &str, key: &KeyMaterial) -> String {
        let nonce = self.nonce();
        seal_field(plaintext.as_bytes(), key, nonce)
    }
}

impl AccessGateway for SimServer {
    async fn request_access(&mut self, send_id: &str, password: Option<&str>) -> AccessOutcome {
        self.access_calls.push(AccessCall {
            send_id: send_id.to_string(),
            password: password.map(str::to_string),
        });

        let Some(stored) = self.sends.get(send_id) else {
            tracing::debug!(%send_id, "unknown send");
            return AccessOutcome::Failed { reason: "status 404 Not Found".to_string() };
        };

        match (&stored.verifier, password) {
            (Some(expected), Some(given)) if expected == given => {
                AccessOutcome::Granted(stored.response.clone())
            },
            (Some(_), _) => AccessOutcome::PasswordRequired,
            (None, _) => AccessOutcome::Granted(stored.response.clone()),
        }
    }

    async fn fetch_file(&mut self, url: &str) -> Result<FetchedFile, GatewayError> {
        self.fetch_calls.push(url.to_string());

        if let Some(reason) = &self.fetch_failure {
            return Err(GatewayError::Transport(reason.clone()));
        }
        if let Some(status) = self.fetch_status {
            return Ok(FetchedFile { status, body: Vec::new() });
        }

        Ok(match self.blobs.get(url) {
            Some(blob) => FetchedFile { status: 200, body: blob.clone() },
            None => FetchedFile { status: 404, body: Vec::new() },
        })
    }
}
