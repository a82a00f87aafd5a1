//! Request-scoped failures and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error as StdError;
use thiserror::Error;

/// Anything that ends a single request early.
///
/// None of these take the process down; each becomes one response.
#[derive(Debug, Error)]
pub enum RelayError {
    /// `/api/account` body without `id` or `cookie`.
    #[error("Invalid account data")]
    InvalidAccount,

    /// Body on an API route was not valid JSON of the expected shape.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Body on an API route could not be read (too large, aborted).
    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The shell document could not be read from disk.
    #[error("Failed to read shell document {path}: {source}")]
    Shell {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level failure talking to upstream.
    #[error("Proxy Error: {}", error_chain(.0))]
    Upstream(#[from] reqwest::Error),

    /// The outbound request could not be assembled.
    #[error("Proxy Error: {0}")]
    InvalidTarget(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidAccount | RelayError::InvalidJson(_) | RelayError::Body(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Shell { .. }
            | RelayError::Upstream(_)
            | RelayError::InvalidTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Do not leak local filesystem paths to callers.
            RelayError::Shell { .. } => "Failed to load page".to_string(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
