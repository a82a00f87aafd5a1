//! Streaming response rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! upstream body chunks + Content-Type
//!     → policy.rs (binary? html? json? decided once per response)
//!     → binary: chunk forwarded untouched
//!     → textual:
//!         → utf8.rs (decode, carrying split characters to the next chunk)
//!         → policy.rs RewriteRules (literal substitutions)
//!         → re-encode as UTF-8
//!     → stream.rs yields the chunk downstream
//! ```
//!
//! # Design Decisions
//! - Never buffers a whole body; memory is bounded by chunk size
//! - Substitutions are plain case-sensitive substring replacement
//! - Matches are chunk-scoped: a literal split across two chunks is not
//!   rewritten
//! - Invalid UTF-8 decodes to U+FFFD rather than failing the response

pub mod policy;
pub mod stream;
pub mod utf8;

pub use policy::{ContentPolicy, RewriteRules, IMAGE_MARKERS};
pub use stream::{rewrite_stream, BodyRewriter};
pub use utf8::Utf8Carry;
