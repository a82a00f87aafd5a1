//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing::RouteTable (classify method + path)
//!         → api.rs    (/api/sync, /api/account)
//!         → shell.rs  (/, /index.html)
//!         → proxy.rs  (everything else)
//!             → request.rs  (session cookie, relay origin)
//!             → upstream via reqwest
//!             → response.rs (header filtering)
//!             → rewrite::rewrite_stream (body)
//!     → Send to client
//! ```

pub mod api;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod shell;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
