//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query)
//!     → router.rs (local route table lookup)
//!         → sync / account / shell / 405 handled locally
//!         → Proxy:
//!             → upstream.rs (prefix rules via matcher.rs)
//!             → Return: UpstreamTarget (origin, path, query)
//! ```
//!
//! # Design Decisions
//! - Tables built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (rule order is significant)

pub mod matcher;
pub mod router;
pub mod upstream;

pub use router::{Route, RouteTable};
pub use upstream::{Origin, UpstreamOrigins, UpstreamResolver, UpstreamTarget};
