//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Primary upstream service.
pub const PRIMARY_ORIGIN: &str = "https://grok.com";

/// Upstream host serving static and generated assets.
pub const ASSET_ORIGIN: &str = "https://assets.grok.com";

/// Cookie carrying the session credential forwarded upstream.
pub const SESSION_COOKIE: &str = "grok_cookie";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins and session cookie.
    pub upstream: UpstreamConfig,

    /// Static shell document.
    pub shell: ShellConfig,

    /// Account API limits.
    pub api: ApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Upstream configuration.
///
/// The defaults are the production origins; overriding them is meant for
/// pointing the relay at local test doubles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin for `/grok/*` and unprefixed paths.
    pub primary_origin: String,

    /// Origin for `/assets/*`; links to it in HTML are rewritten.
    pub asset_origin: String,

    /// Name of the inbound cookie forwarded as the upstream `cookie` header.
    pub session_cookie: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            primary_origin: PRIMARY_ORIGIN.to_string(),
            asset_origin: ASSET_ORIGIN.to_string(),
            session_cookie: SESSION_COOKIE.to_string(),
        }
    }
}

/// Static shell document configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Path to the HTML document served at `/` and `/index.html`.
    pub path: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            path: "static/index.html".to_string(),
        }
    }
}

/// Account API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Maximum JSON body size accepted by `/api/sync` and `/api/account`.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "grok_relay=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
