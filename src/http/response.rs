//! Response handling and transformation.
//!
//! # Responsibilities
//! - Copy upstream response headers for the client
//! - Strip hop-by-hop headers in both directions
//! - Drop `Content-Length`, since rewriting changes the body size
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body; the server falls back
//!   to chunked transfer encoding once the length is gone
//! - Status and every other header (including `Location`) pass untouched

use axum::http::{header, HeaderMap, HeaderName};

/// Connection-scoped headers that must not be forwarded by a proxy.
pub const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Headers to send downstream for an upstream response.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if is_hop_by_hop(name) || name == header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}
