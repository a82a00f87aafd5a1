//! Account API handlers (`/api/sync`, `/api/account`).

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, AccountPayload};
use crate::error::RelayError;
use crate::http::server::AppState;

/// Body of `POST /api/sync`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SyncRequest {
    pub accounts: Option<Vec<AccountPayload>>,
}

/// Response of `POST /api/sync`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    success: bool,
}

async fn read_json<T: DeserializeOwned>(request: Request<Body>, limit: usize) -> Result<T, RelayError> {
    let bytes = axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|e| RelayError::Body(e.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Merge the caller's accounts into the store and return the union.
pub async fn sync_accounts(state: &AppState, request: Request<Body>) -> Result<Response, RelayError> {
    let body: SyncRequest = read_json(request, state.config.api.max_body_bytes).await?;
    let merged = state.store.merge(body.accounts.unwrap_or_default());
    tracing::info!(accounts = merged.len(), "Accounts synced");
    Ok(Json(SyncResponse { accounts: merged }).into_response())
}

/// Insert or overwrite one account.
pub async fn save_account(state: &AppState, request: Request<Body>) -> Result<Response, RelayError> {
    let payload: AccountPayload = read_json(request, state.config.api.max_body_bytes).await?;
    let account = payload.into_account().ok_or(RelayError::InvalidAccount)?;
    tracing::info!(account_id = %account.id, "Account saved");
    state.store.upsert_one(account);
    Ok(Json(SaveResponse { success: true }).into_response())
}
