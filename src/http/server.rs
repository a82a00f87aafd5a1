//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single dispatch handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener and shut down gracefully
//! - Dispatch requests through the local route table
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::accounts::{CredentialStore, MemoryStore};
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::http::request::{self, MakeRequestUuidV4};
use crate::http::{api, proxy, shell};
use crate::observability::metrics;
use crate::routing::{Route, RouteTable, UpstreamOrigins, UpstreamResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub routes: Arc<RouteTable>,
    pub resolver: Arc<UpstreamResolver>,
    pub origins: Arc<UpstreamOrigins>,
    pub store: Arc<dyn CredentialStore>,
    pub client: reqwest::Client,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
    store: Arc<dyn CredentialStore>,
}

impl HttpServer {
    /// Create a new HTTP server with an empty in-memory credential store.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a new HTTP server backed by the given credential store.
    pub fn with_store(
        config: RelayConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let state = AppState {
            routes: Arc::new(RouteTable::new()),
            resolver: Arc::new(UpstreamResolver::new()),
            origins: Arc::new(UpstreamOrigins::from_config(&config.upstream)),
            store: store.clone(),
            client: proxy::build_client()?,
            config: config.clone(),
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            store,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            primary_origin = %self.config.upstream.primary_origin,
            asset_origin = %self.config.upstream.asset_origin,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Handle to the credential store the server uses.
    pub fn store(&self) -> Arc<dyn CredentialStore> {
        self.store.clone()
    }
}

/// Single entry point: classify, then hand off to the matching handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request::request_id(request.headers()).to_string();

    let route = state.routes.classify(&method, &path);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.as_str(),
        "Dispatching request"
    );

    let result = match route {
        Route::SyncAccounts => api::sync_accounts(&state, request).await,
        Route::SaveAccount => api::save_account(&state, request).await,
        Route::StaticShell => shell::serve_shell(&state.config.shell).await,
        Route::MethodNotAllowed => Err(RelayError::MethodNotAllowed),
        Route::Proxy => proxy::forward(&state, request, &request_id).await,
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(request_id = %request_id, path = %path, error = %e, "Request failed");
            } else {
                tracing::warn!(request_id = %request_id, path = %path, error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), route.as_str(), response.status().as_u16(), start_time);
    response
}
