use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use twox_hash::XxHash64;

use waypoint_core::types::FilterSet;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self { Self { now: Mutex::new(start) } }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = chrono::Duration::from_std(by).ok().and_then(|d| now.checked_add_signed(d)) {
            *now = next;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self { Self::new(Utc::now()) }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> { *self.now.lock().unwrap_or_else(|e| e.into_inner()) }
}

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Fresh while `now - created_at < ttl`. A clock that went backwards
    /// counts as zero age.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = (now - self.created_at).to_std().unwrap_or(Duration::ZERO);
        age < self.ttl
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Lazily-expiring memo table. Expired entries are dropped when they are
/// next looked up, or in bulk by [`purge_expired`](Self::purge_expired).
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self { Self::with_clock(Arc::new(SystemClock)) }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: HashMap::new(), clock, stats: CacheStats::default() }
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                self.stats.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.misses += 1;
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, ttl: Duration, value: V) {
        let key = key.into();
        let entry = CacheEntry { key: key.clone(), value, created_at: self.clock.now(), ttl };
        self.entries.insert(key, entry);
    }

    /// Return the fresh value under `key`, or run `compute`, store its result
    /// and return it.
    pub fn get_or_compute<F>(&mut self, key: &str, ttl: Duration, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        self.insert(key, ttl, value.clone());
        value
    }

    pub fn invalidate(&mut self, key: &str) -> bool { self.entries.remove(key).is_some() }

    pub fn clear(&mut self) { self.entries.clear() }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_fresh(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn stats(&self) -> CacheStats { self.stats }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self { Self::new() }
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    s.hash(&mut hasher);
    hasher.finish()
}

/// Cache key for a (subject, filter set) request. Equal subjects with
/// equivalent filters always produce the same key.
pub fn derive_key(subject: &str, filters: &FilterSet) -> String {
    format!("{:016x}:{:016x}", hash_str(subject), hash_str(&filters.canonical()))
}
