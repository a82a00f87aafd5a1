//! Static shell document.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::config::ShellConfig;
use crate::error::RelayError;

/// Read the shell document from disk and serve it as HTML.
///
/// The file is read on every request so edits show up without a restart.
pub async fn serve_shell(config: &ShellConfig) -> Result<Response, RelayError> {
    let document = tokio::fs::read(&config.path)
        .await
        .map_err(|source| RelayError::Shell {
            path: config.path.clone(),
            source,
        })?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=UTF-8")],
        document,
    )
        .into_response())
}
