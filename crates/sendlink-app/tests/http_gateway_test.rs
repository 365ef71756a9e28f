//! Integration tests for the HTTP gateway.
//!
//! Each test starts a one-shot HTTP/1.1 stub on a loopback port, points a
//! real `HttpGateway` at it, and checks both the request that went out and
//! the outcome that came back.

use std::time::Duration;

use sendlink_app::{AccessGateway, GatewayConfig, GatewayError, HttpGateway};
use sendlink_client::{AccessOutcome, AccessResponse, SendType};
use sendlink_proto::TextSection;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

/// Raw request as received by the stub.
struct Received {
    head: String,
    body: String,
}

impl Received {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then_some(value.trim())
        })
    }
}

/// Serve exactly one request with `status` and `body`, returning the base URL
/// and a handle that yields what the client sent.
async fn serve_once(status: u16, body: &'static [u8]) -> (String, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let received = read_request(&mut stream).await;

        let head = format!(
            "HTTP/1.1 {status} Stub\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(body).await.unwrap();
        stream.shutdown().await.unwrap();
        received
    });

    (base, handle)
}

async fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before finishing its request");
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).into_owned();
        let received = Received { head, body: String::new() };
        let length: usize =
            received.header("content-length").map_or(0, |v| v.parse().unwrap());

        if buf.len() >= end + 4 + length {
            let body = String::from_utf8_lossy(&buf[end + 4..end + 4 + length]).into_owned();
            return Received { body, ..received };
        }
    }
}

fn gateway(base: &str) -> HttpGateway {
    let config = GatewayConfig::default()
        .with_api_url(base)
        .with_request_timeout(Duration::from_secs(5));
    HttpGateway::new(config).unwrap()
}

fn text_response() -> AccessResponse {
    AccessResponse {
        id: "s1".into(),
        send_type: SendType::Text,
        name: None,
        text: Some(TextSection { text: "sealed".into(), hidden: false }),
        file: None,
    }
}

#[tokio::test]
async fn granted_access_decodes_response() {
    let body: &'static [u8] = text_response().to_json().unwrap().leak();
    let (base, server) = serve_once(200, body).await;

    let outcome = gateway(&base).request_access("s1", None).await;
    let received = server.await.unwrap();

    assert_eq!(outcome, AccessOutcome::Granted(text_response()));
    assert_eq!(received.request_line(), "POST /sends/access/s1 HTTP/1.1");
    assert_eq!(received.header("content-type"), Some("application/json"));
    assert_eq!(received.body, "{}");
}

#[tokio::test]
async fn verifier_is_sent_as_password_field() {
    let body: &'static [u8] = text_response().to_json().unwrap().leak();
    let (base, server) = serve_once(200, body).await;

    let _ = gateway(&base).request_access("s1", Some("dmVyaWZpZXI=")).await;
    let received = server.await.unwrap();

    assert_eq!(received.body, r#"{"password":"dmVyaWZpZXI="}"#);
}

#[tokio::test]
async fn identifier_is_encoded_once_in_path() {
    let (base, server) = serve_once(404, b"").await;

    let _ = gateway(&base).request_access("a b", None).await;
    let received = server.await.unwrap();

    assert_eq!(received.request_line(), "POST /sends/access/a%20b HTTP/1.1");
}

#[tokio::test]
async fn unauthorized_requires_password() {
    let (base, server) = serve_once(401, b"").await;

    let outcome = gateway(&base).request_access("s1", None).await;
    server.await.unwrap();

    assert_eq!(outcome, AccessOutcome::PasswordRequired);
}

#[tokio::test]
async fn other_statuses_fail() {
    for status in [404, 500] {
        let (base, server) = serve_once(status, br#"{"message":"nope"}"#).await;

        let outcome = gateway(&base).request_access("s1", None).await;
        server.await.unwrap();

        assert!(matches!(outcome, AccessOutcome::Failed { .. }), "status {status}: {outcome:?}");
    }
}

#[tokio::test]
async fn undecodable_body_fails() {
    let bodies: [&'static [u8]; 3] =
        [b"not json", br#"{"id":"s1","type":7}"#, br#"{"id":"s1","type":1}"#];

    for body in bodies {
        let (base, server) = serve_once(200, body).await;

        let outcome = gateway(&base).request_access("s1", None).await;
        server.await.unwrap();

        assert!(matches!(outcome, AccessOutcome::Failed { .. }), "{outcome:?}");
    }
}

#[tokio::test]
async fn unreachable_service_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let outcome = gateway(&base).request_access("s1", None).await;
    let fetched = gateway(&base).fetch_file(&format!("{base}/blob")).await;

    assert!(matches!(outcome, AccessOutcome::Failed { .. }));
    assert!(matches!(fetched, Err(GatewayError::Transport(_))));
}

#[tokio::test]
async fn fetch_bypasses_caches_and_returns_body() {
    let (base, server) = serve_once(200, b"sealed blob").await;

    let fetched = gateway(&base).fetch_file(&format!("{base}/blobs/f1?sig=abc")).await.unwrap();
    let received = server.await.unwrap();

    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body, b"sealed blob");
    assert_eq!(received.request_line(), "GET /blobs/f1?sig=abc HTTP/1.1");
    assert_eq!(received.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn fetch_reports_error_status() {
    let (base, server) = serve_once(403, b"").await;

    let fetched = gateway(&base).fetch_file(&format!("{base}/blobs/f1")).await.unwrap();
    server.await.unwrap();

    assert_eq!(fetched.status, 403);
    assert!(fetched.body.is_empty());
}
