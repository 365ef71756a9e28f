//! Shared link parsing.
//!
//! A send link carries the identifier in its route and the key in the
//! fragment or query, so the key never reaches the service in a request
//! line. Accepted shapes:
//!
//! ```text
//! https://host/#/send/{id}/{key}
//! https://host/#/send/{id}?key={key}
//! https://host/send/{id}?key={key}
//! ```

use percent_encoding::percent_decode_str;
use url::Url;

/// Base that relative links (a bare `#/send/...` fragment) are resolved
/// against.
const RELATIVE_BASE: &str = "http://link.invalid/";

/// Identifier and key fragment extracted from a link.
///
/// Either part may be missing; the session then stays uninitialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendLink {
    /// `sendId` route segment, percent-decoded.
    pub send_id: Option<String>,
    /// URL-safe base64 key fragment, percent-decoded but not base64-decoded.
    pub key: Option<String>,
}

impl SendLink {
    /// Link from already separated parts. Blank parts count as missing.
    pub fn new(send_id: Option<String>, key: Option<String>) -> Self {
        Self { send_id: non_empty(send_id), key: non_empty(key) }
    }

    /// Split a link into identifier and key.
    ///
    /// Route segments and query values are percent-decoded, so a padded key
    /// written as `%3D` arrives as `=`.
    ///
    /// Never fails: anything unrecognised yields missing parts.
    pub fn parse(link: &str) -> Self {
        let Ok(base) = Url::parse(RELATIVE_BASE) else {
            unreachable!("relative base is a valid URL");
        };
        let Ok(outer) = base.join(link.trim()) else {
            return Self::default();
        };

        // Hash routing: the route lives in the fragment, resolved like a path.
        let route = outer
            .fragment()
            .filter(|fragment| is_send_route(fragment))
            .and_then(|fragment| base.join(fragment.trim_start_matches('/')).ok());
        let inner = route.as_ref().unwrap_or(&outer);

        let mut segments = inner
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .skip_while(|s| *s != "send")
            .skip(1)
            .map(decode_segment);

        let send_id = segments.next();
        // Under a hash route the key may also sit in the outer query.
        let key = segments
            .next()
            .or_else(|| key_param(inner))
            .or_else(|| route.as_ref().and_then(|_| key_param(&outer)));

        Self::new(send_id, key)
    }

    /// Both parts are present.
    pub fn is_complete(&self) -> bool {
        self.send_id.is_some() && self.key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_send_route(fragment: &str) -> bool {
    fragment.trim_start_matches('/').starts_with("send/")
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn key_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(name, value)| name == "key" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
