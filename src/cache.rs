//! In-memory TTL cache
//!
//! Injected cache abstraction with an explicit owner and lifetime, used for
//! same-session hints (markets, icons, last approval state). Entries carry
//! their insertion time; freshness is decided by the caller-supplied TTL at
//! read time.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Thread-safe map of values with per-entry insertion timestamps
#[derive(Debug, Default)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, (V, Instant)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace a value, stamping it with the current time
    pub fn set(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (value, Instant::now()));
    }

    /// Get a value regardless of age
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map(|(v, _)| v.clone())
    }

    /// Get a value only if it is younger than `ttl`
    pub fn get_valid(&self, key: &K, ttl: Duration) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|(_, at)| at.elapsed() <= ttl)
            .map(|(v, _)| v.clone())
    }

    /// Check whether a value exists and is younger than `ttl`
    pub fn has_valid(&self, key: &K, ttl: Duration) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .map(|(_, at)| at.elapsed() <= ttl)
            .unwrap_or(false)
    }

    /// Remove a single entry
    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Remove everything
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}
