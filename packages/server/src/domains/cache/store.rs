use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// A cached value with the time it was written and an optional change signature.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    /// Empty when the writer had no signature to record.
    pub hash: String,
}

/// Time-bounded key/value store.
///
/// Every method takes the lock once, so individual calls never interleave
/// with each other on the same key. Read-modify-write sequences spanning
/// several calls are not atomic; callers that need that serialise per key.
pub struct CacheStore<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> CacheStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        self.get_at(key, Utc::now())
    }

    /// Look up `key` as of `now`, evicting it if older than the TTL.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry<T>> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let age = now - entries.get(key)?.timestamp;

        if age > self.ttl {
            debug!(key, age_hours = age.num_hours(), "Cache expired");
            entries.remove(key);
            return None;
        }

        debug!(key, age_hours = age.num_hours(), "Cache hit");
        entries.get(key).cloned()
    }

    pub fn put(&self, key: &str, data: T, hash: Option<String>) {
        self.put_at(key, data, hash, Utc::now());
    }

    /// Overwrite the entry for `key`, stamped with `now`.
    pub fn put_at(&self, key: &str, data: T, hash: Option<String>, now: DateTime<Utc>) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: now,
                hash: hash.unwrap_or_default(),
            },
        );
    }

    /// Remove every entry past the TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| now - entry.timestamp <= self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Serialize> CacheStore<T> {
    /// Size of the whole store serialised as JSON.
    pub fn approx_size_bytes(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        serde_json::to_vec(&*entries).map_or(0, |bytes| bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CacheStore<Vec<u32>> {
        CacheStore::new(Duration::hours(24))
    }

    #[test]
    fn entry_is_a_hit_just_before_ttl_and_a_miss_just_after() {
        let cache = store();
        let written = Utc::now();
        let epsilon = Duration::seconds(1);

        cache.put_at("posts:alice", vec![1], None, written);
        assert!(cache
            .get_at("posts:alice", written + Duration::hours(24) - epsilon)
            .is_some());
        assert!(cache
            .get_at("posts:alice", written + Duration::hours(24) + epsilon)
            .is_none());
    }

    #[test]
    fn expired_get_evicts_entry() {
        let cache = store();
        let written = Utc::now();
        cache.put_at("k", vec![1], None, written);

        assert!(cache.get_at("k", written + Duration::hours(25)).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn put_overwrites_whole_entry() {
        let cache = store();
        cache.put("k", vec![1, 2], Some("10-2".into()));
        cache.put("k", vec![3], None);

        let entry = cache.get("k").unwrap();
        assert_eq!(entry.data, vec![3]);
        assert_eq!(entry.hash, "");
    }

    #[test]
    fn sweep_removes_only_expired() {
        let cache = store();
        let now = Utc::now();
        cache.put_at("old", vec![1], None, now - Duration::hours(30));
        cache.put_at("fresh", vec![2], None, now - Duration::hours(1));

        assert_eq!(cache.sweep_expired_at(now), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("fresh", now).is_some());
    }

    #[test]
    fn size_grows_with_content() {
        let cache = store();
        let empty = cache.approx_size_bytes();
        cache.put("k", vec![1, 2, 3], None);
        assert!(cache.approx_size_bytes() > empty);
    }
}
