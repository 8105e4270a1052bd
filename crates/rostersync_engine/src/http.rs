//! Request preparation and response classification shared by both HTTP
//! clients.
//!
//! Routing both clients through these functions is what keeps their
//! observable behaviour identical: the same status yields the same error
//! variant and message regardless of the execution model.

use crate::error::{SyncError, SyncResult};
use crate::headers::HeaderSet;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

/// HTTP verb of a sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

pub(crate) fn require_url(url: &str) -> SyncResult<()> {
    if url.trim().is_empty() {
        return Err(SyncError::invalid_input("URL cannot be null or empty"));
    }
    Ok(())
}

/// Default `Content-Type: application/json` overlaid with the caller's
/// headers.
pub(crate) fn header_map(headers: &HeaderSet) -> SyncResult<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SyncError::invalid_input(format!("invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| SyncError::invalid_input(format!("invalid value for header {name}: {e}")))?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}

pub(crate) fn encode_body<B: Serialize + ?Sized>(body: &B) -> SyncResult<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|e| SyncError::invalid_input(format!("failed to encode request body: {e}")))
}

/// Classifies a received response and decodes its body.
///
/// An empty 2xx body decodes as JSON `null`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    method: HttpMethod,
    url: &str,
    status: u16,
    body: &[u8],
) -> SyncResult<T> {
    if !(200..300).contains(&status) {
        error!(
            %method,
            url,
            status,
            body = %String::from_utf8_lossy(body),
            "Request rejected by remote"
        );
        return Err(SyncError::status(
            status,
            format!("{method} request failed with status code: {status}"),
        ));
    }

    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };

    let decoded = serde_json::from_slice(body).map_err(|e| {
        error!(%method, url, status, error = %e, "Failed to decode response body");
        SyncError::status(status, format!("failed to decode {method} response body: {e}"))
    })?;

    info!(%method, url, status, "Request successful");
    Ok(decoded)
}

/// Maps a client error raised before a response was classified.
pub(crate) fn request_error(
    method: HttpMethod,
    url: &str,
    err: reqwest::Error,
    timeout: Duration,
) -> SyncError {
    if err.is_timeout() {
        error!(%method, url, ?timeout, "Request timed out");
        return SyncError::Timeout(timeout);
    }

    error!(%method, url, error = %err, "Request failed");
    match err.status() {
        Some(status) => SyncError::status(
            status.as_u16(),
            format!("{method} request failed with status code: {}", status.as_u16()),
        ),
        None => SyncError::connection(format!("{method} request to {url} failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn non_success_status_is_transport_error() {
        let result: SyncResult<Value> =
            decode_response(HttpMethod::Get, "http://x", 404, b"not here");
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "transport error: GET request failed with status code: 404"
        );
    }

    #[test]
    fn success_window_bounds() {
        let ok: SyncResult<Value> = decode_response(HttpMethod::Post, "http://x", 299, b"{}");
        assert!(ok.is_ok());

        let redirect: SyncResult<Value> =
            decode_response(HttpMethod::Post, "http://x", 300, b"{}");
        assert_eq!(redirect.unwrap_err().status_code(), Some(300));
    }

    #[test]
    fn empty_success_body_is_null() {
        let value: Value = decode_response(HttpMethod::Post, "http://x", 204, b"").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn undecodable_body_keeps_status() {
        let result: SyncResult<Vec<u32>> =
            decode_response(HttpMethod::Get, "http://x", 200, b"{\"not\": \"a list\"}");
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), Some(200));
        assert!(err.to_string().contains("failed to decode GET response body"));
    }

    #[test]
    fn caller_headers_override_defaults() {
        let mut headers = HeaderSet::new();
        headers.insert("Content-Type".into(), "application/vnd.roster+json".into());
        headers.insert("Authorization".into(), "Basic abc".into());

        let map = header_map(&headers).unwrap();
        assert_eq!(map[CONTENT_TYPE], "application/vnd.roster+json");
        assert_eq!(map["authorization"], "Basic abc");
    }

    #[test]
    fn invalid_header_is_invalid_input() {
        let mut headers = HeaderSet::new();
        headers.insert("Bad Header".into(), "x".into());
        assert!(matches!(
            header_map(&headers),
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[test]
    fn blank_url_rejected() {
        assert!(require_url("").is_err());
        assert!(require_url("   ").is_err());
        assert!(require_url("https://example.org").is_ok());
    }
}
