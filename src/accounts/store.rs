//! In-memory credential store.
//!
//! The whole collection is held behind an [`ArcSwap`] pointing at an
//! immutable, ordered snapshot. Mutations go through `rcu`, which re-runs the
//! closure when another writer swapped the snapshot in between, so a merge can
//! never drop a concurrent upsert.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::observability::metrics;

/// A stored session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub cookie: String,
}

/// Account as submitted by a client. Either field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountPayload {
    pub id: Option<String>,
    pub cookie: Option<String>,
}

impl AccountPayload {
    /// Convert into an [`Account`] if both fields are present and non-empty.
    pub fn into_account(self) -> Option<Account> {
        match (self.id, self.cookie) {
            (Some(id), Some(cookie)) if !id.is_empty() && !cookie.is_empty() => {
                Some(Account { id, cookie })
            }
            _ => None,
        }
    }
}

/// Storage interface used by the API handlers.
pub trait CredentialStore: Send + Sync {
    /// Insert or overwrite a single account.
    fn upsert_one(&self, account: Account);

    /// Merge incoming accounts into the store and return the merged list.
    ///
    /// Existing entries come first in their current order, followed by new
    /// ids in submission order. On id collision the incoming cookie wins but
    /// the entry keeps its original position. Incomplete entries are skipped.
    fn merge(&self, incoming: Vec<AccountPayload>) -> Vec<Account>;

    /// Export the current contents.
    fn snapshot(&self) -> Vec<Account>;
}

/// Process-lifetime store backed by an atomically swapped snapshot.
#[derive(Default)]
pub struct MemoryStore {
    accounts: ArcSwap<Vec<Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn put(accounts: &mut Vec<Account>, account: Account) {
    match accounts.iter_mut().find(|a| a.id == account.id) {
        Some(existing) => existing.cookie = account.cookie,
        None => accounts.push(account),
    }
}

fn merged_with(current: &[Account], incoming: &[Account]) -> Vec<Account> {
    let mut next = current.to_vec();
    for account in incoming {
        put(&mut next, account.clone());
    }
    next
}

impl CredentialStore for MemoryStore {
    fn upsert_one(&self, account: Account) {
        let id = account.id.clone();
        let previous = self
            .accounts
            .rcu(|current| merged_with(current, std::slice::from_ref(&account)));
        let size = self.len();
        metrics::record_account_count(size);
        tracing::debug!(
            account_id = %id,
            replaced = previous.iter().any(|a| a.id == id),
            accounts = size,
            "Account saved"
        );
    }

    fn merge(&self, incoming: Vec<AccountPayload>) -> Vec<Account> {
        let submitted = incoming.len();
        let valid: Vec<Account> = incoming
            .into_iter()
            .filter_map(AccountPayload::into_account)
            .collect();

        // `rcu` hands back the snapshot the winning closure run replaced, so
        // replaying the merge on it yields exactly what was stored.
        let previous = self.accounts.rcu(|current| merged_with(current, &valid));
        let merged = merged_with(&previous, &valid);
        metrics::record_account_count(merged.len());
        tracing::debug!(
            submitted,
            accepted = valid.len(),
            accounts = merged.len(),
            "Accounts merged"
        );
        merged
    }

    fn snapshot(&self) -> Vec<Account> {
        Vec::clone(&self.accounts.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn payload(id: &str, cookie: &str) -> AccountPayload {
        AccountPayload {
            id: Some(id.to_string()),
            cookie: Some(cookie.to_string()),
        }
    }

    fn account(id: &str, cookie: &str) -> Account {
        Account {
            id: id.to_string(),
            cookie: cookie.to_string(),
        }
    }

    #[test]
    fn test_upsert_then_snapshot() {
        let store = MemoryStore::new();
        store.upsert_one(account("u1", "c1"));
        store.upsert_one(account("u1", "c2"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot, vec![account("u1", "c2")]);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let store = MemoryStore::new();
        store.upsert_one(account("x", "old"));

        let merged = store.merge(vec![payload("x", "new")]);
        assert_eq!(merged, vec![account("x", "new")]);
        assert_eq!(store.snapshot(), vec![account("x", "new")]);
    }

    #[test]
    fn test_merge_order_existing_then_incoming() {
        let store = MemoryStore::new();
        store.upsert_one(account("a", "1"));
        store.upsert_one(account("b", "2"));

        let merged = store.merge(vec![payload("c", "3"), payload("a", "9"), payload("c", "4")]);
        assert_eq!(
            merged,
            vec![account("a", "9"), account("b", "2"), account("c", "4")]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let store = MemoryStore::new();
        store.upsert_one(account("a", "1"));
        store.upsert_one(account("b", "2"));

        let current: Vec<AccountPayload> = store
            .snapshot()
            .into_iter()
            .map(|a| payload(&a.id, &a.cookie))
            .collect();
        let before = store.snapshot();
        store.merge(current);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_merge_skips_incomplete_entries() {
        let store = MemoryStore::new();
        let merged = store.merge(vec![
            AccountPayload { id: Some("a".into()), cookie: None },
            AccountPayload { id: None, cookie: Some("c".into()) },
            payload("", "c"),
            payload("b", ""),
            payload("ok", "yes"),
        ]);
        assert_eq!(merged, vec![account("ok", "yes")]);
    }

    #[test]
    fn test_concurrent_upserts_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.upsert_one(account(&format!("{t}-{i}"), "c"));
                        if i % 10 == 0 {
                            store.merge(vec![payload(&format!("m{t}-{i}"), "m")]);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 50 + 8 * 5);
    }
}
