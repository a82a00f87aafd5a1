//! Session credential subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/account {id, cookie}
//!     → store.rs upsert_one (replace single entry)
//!
//! POST /api/sync {accounts: [...]}
//!     → store.rs merge (existing-then-incoming, last write wins per id)
//!     → merged list written back and returned to caller
//! ```
//!
//! # Design Decisions
//! - The store is an injected trait object; handlers never touch globals
//! - Contents live for the process lifetime only
//! - Whole-store exclusion: every mutation swaps one immutable snapshot

pub mod store;

pub use store::{Account, AccountPayload, CredentialStore, MemoryStore};
