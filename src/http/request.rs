//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for every inbound request
//! - Extract the session cookie from the inbound `cookie` header
//! - Derive the relay's own origin as seen by the browser
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Cookie parsing never fails; malformed segments are skipped

use axum::http::{header, HeaderMap, HeaderValue};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer, if any.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Pull a named cookie's percent-decoded value out of a `cookie` header.
///
/// Returns an empty string when the header is empty or has no such cookie.
/// Values that fail to percent-decode are returned as-is.
pub fn extract_named(cookie_header: &str, name: &str) -> String {
    for segment in cookie_header.split(';') {
        let Some((key, value)) = segment.trim().split_once('=') else {
            continue;
        };
        if key.trim() != name {
            continue;
        }
        let value = value.trim();
        return match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        };
    }
    String::new()
}

/// Extract the session cookie from all `cookie` headers on a request.
pub fn session_cookie(headers: &HeaderMap, name: &str) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| extract_named(v, name))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// The relay's origin (`scheme://host`) as addressed by the caller.
///
/// The scheme comes from `x-forwarded-proto` when a fronting proxy terminates
/// TLS; otherwise plain `http` is assumed.
pub fn request_origin(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}", scheme, host)
}
