//! Upstream forwarding.
//!
//! # Responsibilities
//! - Resolve the upstream target for a request
//! - Rebuild the request headers for upstream (host, session cookie)
//! - Stream the request body up and the rewritten response body down
//!
//! # Design Decisions
//! - Redirects are never followed; 3xx and `Location` reach the browser as-is
//! - Transport failures become a 500 carrying the failure text, no retries
//! - No timeout beyond what the transport applies on its own
//! - A failure after the response head was sent aborts the connection

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    response::Response,
};
use url::Url;

use crate::error::RelayError;
use crate::http::request;
use crate::http::response::{filter_response_headers, is_hop_by_hop};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rewrite::{rewrite_stream, BodyRewriter, RewriteRules};

/// Build the client used for all upstream requests.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// `host[:port]` for the `Host` header.
fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Headers sent upstream for an inbound request.
///
/// Everything is copied except hop-by-hop headers, `accept-encoding` (the
/// client negotiates and decodes compression itself), `referer`, and the
/// inbound cookies. `host` is pointed at the upstream and `cookie` is
/// replaced by the session cookie alone, empty when there is none.
pub fn upstream_headers(inbound: &HeaderMap, target: &Url, session_cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_hop_by_hop(name)
            || name == header::HOST
            || name == header::COOKIE
            || name == header::REFERER
            || name == header::ACCEPT_ENCODING
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    if let Some(host) = host_header(target).and_then(|h| HeaderValue::from_str(&h).ok()) {
        headers.insert(header::HOST, host);
    }

    let cookie = HeaderValue::from_str(session_cookie).unwrap_or_else(|_| {
        tracing::warn!("Session cookie is not a valid header value, sending none");
        HeaderValue::from_static("")
    });
    headers.insert(header::COOKIE, cookie);

    headers
}

/// True when the inbound request declares a body worth streaming upstream.
fn has_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

/// Forward a request upstream and stream back the rewritten response.
pub async fn forward(state: &AppState, request: Request<Body>, request_id: &str) -> Result<Response, RelayError> {
    let (parts, body) = request.into_parts();

    let target = state.resolver.resolve(parts.uri.path(), parts.uri.query());
    let target_url = target.url(&state.origins);
    let url = Url::parse(&target_url)
        .map_err(|e| RelayError::InvalidTarget(format!("{}: {}", target_url, e)))?;

    let session = request::session_cookie(&parts.headers, &state.config.upstream.session_cookie);
    let request_origin = request::request_origin(&parts.headers);
    let headers = upstream_headers(&parts.headers, &url, &session);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        target = %target_url,
        origin = target.origin.as_str(),
        session = !session.is_empty(),
        "Forwarding upstream"
    );

    let mut outbound = state
        .client
        .request(parts.method.clone(), url)
        .headers(headers);
    if has_body(&parts.headers) {
        outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let upstream = outbound.send().await.inspect_err(|_| {
        metrics::record_upstream_error();
    })?;

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let response_headers = filter_response_headers(upstream.headers());

    let rules = RewriteRules::new(state.origins.asset.clone(), request_origin);
    let rewriter = BodyRewriter::new(&content_type, rules);

    tracing::debug!(
        request_id = %request_id,
        status = status.as_u16(),
        content_type = %content_type,
        body = rewriter.policy().kind(),
        "Upstream responded"
    );

    let body = Body::from_stream(rewrite_stream(upstream.bytes_stream(), rewriter));
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
