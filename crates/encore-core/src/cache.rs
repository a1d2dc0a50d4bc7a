use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::types::{SearchRequest, SearchResultItem};

pub const CACHE_TTL: Duration = Duration::from_secs(300);
pub const MAX_CAPACITY: usize = 1000;

/// Time source for TTL and eviction decisions, injected so tests can move
/// time deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock advanced by hand. Intended for tests.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap();
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// Canonical key for a logical search request. Field order is fixed, so two
/// requests that differ only in payload ordering serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &SearchRequest) -> Self {
        let query = request
            .query_text()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let filters = request.filters.clone().unwrap_or_default();

        CacheKey(format!(
            "q={query}|genre={}|mood={}|artist={}|tags={}|limit={}",
            filters.genre.as_deref().unwrap_or(""),
            filters.mood.as_deref().unwrap_or(""),
            filters.artist.as_deref().unwrap_or(""),
            filters
                .search_in_tags
                .map(|b| b.to_string())
                .unwrap_or_default(),
            request.effective_limit(),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct CacheEntry {
    created_at: Instant,
    results: Vec<SearchResultItem>,
}

/// Bounded TTL cache for aggregated search results. The entry map is owned
/// here exclusively; callers only see cloned result vectors.
pub struct CacheStore {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, CACHE_TTL, MAX_CAPACITY)
    }

    pub fn with_limits(clock: Arc<dyn Clock>, ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity,
            clock,
        }
    }

    /// Freshness is checked at read time: a stale entry is a miss even if
    /// no sweep has removed it yet.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<SearchResultItem>> {
        let entry = self.entries.get(key)?;
        if self.clock.now().duration_since(entry.created_at) < self.ttl {
            debug!(key = key.as_str(), "cache hit");
            Some(entry.results.clone())
        } else {
            debug!(key = key.as_str(), "cache entry expired");
            None
        }
    }

    pub fn put(&self, key: CacheKey, results: Vec<SearchResultItem>) {
        let created_at = self.clock.now();
        self.entries.insert(key, CacheEntry { created_at, results });
        self.sweep();
    }

    /// Remove expired entries, then evict oldest-first until the store is
    /// back within capacity. Runs synchronously inside `put`, so eviction
    /// work is amortized across writers.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.created_at) < ttl);

        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut by_age: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        for (key, _) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        debug!(evicted = excess, "cache evicted oldest entries over capacity");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }
}
