//! Session store assigning short, human-typeable identifiers to papers.
//!
//! The store lives for the lifetime of the service process and is shared by
//! every request. Identifiers are never reused or rebound: the first record
//! observed for an external identifier is the one every later lookup returns,
//! even if a later search brings back different metadata for the same paper.
//!
//! # Identifier strategies
//!
//! - [`IdStrategy::Sequential`] mints `p1`, `p2`, ... in registration order.
//! - [`IdStrategy::Hashed`] uses a hex prefix of the SHA-256 of the external
//!   identifier, so the same paper gets the same identifier in every process.
//!   On a prefix collision with a different paper the prefix is lengthened.
//!
//! ```rust
//! use papervista::models::MetadataRecord;
//! use papervista::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let record = MetadataRecord::builder("1706.03762", "Attention Is All You Need").build();
//! let entries = store.register(vec![record.clone()]);
//! let (id, _) = &entries[0];
//! assert_eq!(*store.resolve(id).unwrap(), record);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::CitationError;
use crate::models::MetadataRecord;

/// Default hex prefix length for hashed identifiers
pub const DEFAULT_HASH_LEN: usize = 6;

const SEQUENTIAL_PREFIX: &str = "p";

/// Process-local identifier handed out for a paper.
///
/// Identifiers are case-insensitive for users; they are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShortId {
    fn from(value: &str) -> Self {
        ShortId(value.trim().to_lowercase())
    }
}

impl From<String> for ShortId {
    fn from(value: String) -> Self {
        ShortId::from(value.as_str())
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How new short identifiers are minted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Monotonic counter: p1, p2, ...
    #[default]
    Sequential,
    /// Hex prefix of SHA-256(external id)
    Hashed,
}

#[derive(Debug, Default)]
struct StoreInner {
    by_short: HashMap<ShortId, Arc<MetadataRecord>>,
    by_external: HashMap<String, ShortId>,
    next_seq: u64,
}

/// Snapshot of store size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub entries: usize,
    pub strategy: IdStrategy,
}

/// Identifier namespace and metadata cache for one service process
#[derive(Debug)]
pub struct SessionStore {
    strategy: IdStrategy,
    hash_len: usize,
    inner: RwLock<StoreInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty store using sequential identifiers
    pub fn new() -> Self {
        Self::with_strategy(IdStrategy::default())
    }

    /// Create an empty store using the given identifier strategy
    pub fn with_strategy(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            hash_len: DEFAULT_HASH_LEN,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Override the initial hex prefix length for hashed identifiers
    pub fn with_hash_length(mut self, len: usize) -> Self {
        self.hash_len = len.clamp(1, 64);
        self
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Assign identifiers to a batch of records, in input order.
    ///
    /// Records whose external identifier is already known are returned with
    /// their existing identifier and the originally stored metadata.
    pub fn register<I>(&self, records: I) -> Vec<(ShortId, Arc<MetadataRecord>)>
    where
        I: IntoIterator<Item = MetadataRecord>,
    {
        // A poisoned lock still holds a consistent map: entries are inserted
        // in full or not at all.
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        records
            .into_iter()
            .map(|record| {
                if let Some(existing) = inner.by_external.get(&record.external_id) {
                    let id = existing.clone();
                    let stored = Arc::clone(&inner.by_short[&id]);
                    if *stored != record {
                        tracing::debug!(
                            id = %id,
                            external_id = %record.external_id,
                            "Keeping first-seen metadata for known paper"
                        );
                    }
                    return (id, stored);
                }

                let id = self.mint(&mut inner, &record.external_id);
                let stored = Arc::new(record);
                inner
                    .by_external
                    .insert(stored.external_id.clone(), id.clone());
                inner.by_short.insert(id.clone(), Arc::clone(&stored));
                tracing::debug!(id = %id, external_id = %stored.external_id, "Registered paper");
                (id, stored)
            })
            .collect()
    }

    /// Look up the record bound to a short identifier
    pub fn resolve(&self, id: &ShortId) -> Result<Arc<MetadataRecord>, CitationError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_short
            .get(id)
            .cloned()
            .ok_or_else(|| CitationError::NotFound(id.to_string()))
    }

    /// Short identifier already assigned to an external identifier, if any
    pub fn lookup_external(&self, external_id: &str) -> Option<ShortId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_external.get(external_id).cloned()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            entries: self.len(),
            strategy: self.strategy,
        }
    }

    fn mint(&self, inner: &mut StoreInner, external_id: &str) -> ShortId {
        match self.strategy {
            IdStrategy::Sequential => Self::next_sequential(inner),
            IdStrategy::Hashed => {
                let digest = format!("{:x}", Sha256::digest(external_id.as_bytes()));
                (self.hash_len..=digest.len())
                    .map(|len| ShortId(digest[..len].to_string()))
                    .find(|candidate| !inner.by_short.contains_key(candidate))
                    // Only reachable if two external ids share a full digest
                    .unwrap_or_else(|| Self::next_sequential(inner))
            }
        }
    }

    fn next_sequential(inner: &mut StoreInner) -> ShortId {
        loop {
            inner.next_seq += 1;
            let candidate = ShortId(format!("{}{}", SEQUENTIAL_PREFIX, inner.next_seq));
            if !inner.by_short.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn paper(id: &str, title: &str) -> MetadataRecord {
        MetadataRecord::builder(id, title)
            .author("Ada Lovelace")
            .published_year(2020)
            .build()
    }

    #[test]
    fn test_register_assigns_sequential_ids_in_order() {
        let store = SessionStore::new();
        let entries = store.register(vec![paper("a", "A"), paper("b", "B"), paper("c", "C")]);

        let ids: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(entries[1].1.title, "B");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_register_is_idempotent_across_calls() {
        let store = SessionStore::new();
        let first = store.register(vec![paper("2301.00001", "One")]);
        let second = store.register(vec![paper("2301.00002", "Two"), paper("2301.00001", "One")]);

        assert_eq!(first[0].0, second[1].0);
        assert_eq!(second[0].0.as_str(), "p2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_duplicates_within_one_batch_share_an_id() {
        let store = SessionStore::new();
        let entries = store.register(vec![paper("x", "X"), paper("x", "X again")]);

        assert_eq!(entries[0].0, entries[1].0);
        assert_eq!(entries[1].1.title, "X");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_first_seen_metadata_wins() {
        let store = SessionStore::new();
        let original = paper("x", "Original Title");
        let (id, _) = store.register(vec![original.clone()]).remove(0);

        let drifted = MetadataRecord::builder("x", "Revised Title")
            .author("Someone Else")
            .build();
        let (again, returned) = store.register(vec![drifted]).remove(0);

        assert_eq!(again, id);
        assert_eq!(*returned, original);
        assert_eq!(*store.resolve(&id).unwrap(), original);
    }

    #[test]
    fn test_round_trip() {
        let store = SessionStore::new();
        let record = paper("1706.03762", "Attention Is All You Need");
        let (id, _) = store.register(vec![record.clone()]).remove(0);

        assert_eq!(*store.resolve(&id).unwrap(), record);
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        let store = SessionStore::new();
        store.register(vec![paper("a", "A")]);

        let err = store.resolve(&ShortId::from("p99")).unwrap_err();
        assert!(matches!(err, CitationError::NotFound(ref id) if id == "p99"));
    }

    #[test]
    fn test_fresh_store_does_not_know_other_sessions() {
        let earlier = SessionStore::new();
        let (id, _) = earlier.register(vec![paper("a", "A")]).remove(0);

        let restarted = SessionStore::new();
        assert!(restarted.resolve(&id).is_err());
        assert!(restarted.is_empty());
    }

    #[test]
    fn test_short_id_is_case_insensitive() {
        let store = SessionStore::new();
        store.register(vec![paper("a", "A")]);

        assert!(store.resolve(&ShortId::from("  P1 ")).is_ok());
    }

    #[test]
    fn test_lookup_external() {
        let store = SessionStore::new();
        store.register(vec![paper("a", "A")]);

        assert_eq!(store.lookup_external("a"), Some(ShortId::from("p1")));
        assert_eq!(store.lookup_external("b"), None);
    }

    #[test]
    fn test_hashed_ids_are_deterministic_across_stores() {
        let one = SessionStore::with_strategy(IdStrategy::Hashed);
        let two = SessionStore::with_strategy(IdStrategy::Hashed);

        let a = one.register(vec![paper("1706.03762", "T")]).remove(0).0;
        two.register(vec![paper("unrelated", "U")]);
        let b = two.register(vec![paper("1706.03762", "T")]).remove(0).0;

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), DEFAULT_HASH_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hashed_prefix_collisions_are_resolved() {
        // A one-character prefix forces collisions among 40 papers.
        let store = SessionStore::with_strategy(IdStrategy::Hashed).with_hash_length(1);
        let records: Vec<_> = (0..40).map(|i| paper(&format!("ext-{i}"), "T")).collect();
        let entries = store.register(records);

        let unique: HashSet<&ShortId> = entries.iter().map(|(id, _)| id).collect();
        assert_eq!(unique.len(), 40);
        for (i, (id, record)) in entries.iter().enumerate() {
            assert_eq!(record.external_id, format!("ext-{i}"));
            assert_eq!(store.resolve(id).unwrap().external_id, record.external_id);
        }
    }

    #[test]
    fn test_concurrent_registers_converge() {
        let store = Arc::new(SessionStore::new());
        let batch: Vec<MetadataRecord> =
            (0..50).map(|i| paper(&format!("shared-{i}"), "S")).collect();

        let results: Vec<Vec<ShortId>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let batch = batch.clone();
                    scope.spawn(move || {
                        store
                            .register(batch)
                            .into_iter()
                            .map(|(id, _)| id)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for ids in &results[1..] {
            assert_eq!(ids, &results[0]);
        }
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_stats() {
        let store = SessionStore::with_strategy(IdStrategy::Hashed);
        store.register(vec![paper("a", "A"), paper("b", "B")]);

        let stats = store.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.strategy, IdStrategy::Hashed);
    }
}
