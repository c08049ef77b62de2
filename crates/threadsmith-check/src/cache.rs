//! Time-bounded response cache.
//!
//! Re-checking identical text is common: the user pauses, the debounce
//! fires, nothing changed. Responses are cached keyed by language plus a
//! text fingerprint for a bounded window so those calls are free. The
//! cache is purely an optimization — a hit is only ever served for an
//! exactly matching key, so returned matches always correspond to the
//! text argument.

use ahash::AHashMap;
use web_time::{Duration, Instant};

use crate::wire::RawMatch;

/// How long a cached response stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Entries kept before the oldest are evicted.
const DEFAULT_CAPACITY: usize = 256;

/// Fingerprint of a check request: language, first 100 chars, total chars.
///
/// Two texts sharing prefix and length but differing in the tail would
/// collide; in practice a thread segment is 280 weighted characters and
/// the window is minutes, so the fingerprint is equality for our inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    language: String,
    prefix: String,
    char_len: usize,
}

impl CacheKey {
    #[must_use]
    pub fn new(text: &str, language: &str) -> Self {
        Self {
            language: language.to_string(),
            prefix: text.chars().take(100).collect(),
            char_len: text.chars().count(),
        }
    }
}

struct Entry {
    matches: Vec<RawMatch>,
    stored_at: Instant,
}

/// Bounded TTL cache for raw check responses.
pub struct ResponseCache {
    entries: AHashMap<CacheKey, Entry>,
    order: Vec<CacheKey>,
    ttl: Duration,
    capacity: usize,
}

impl ResponseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: AHashMap::new(),
            order: Vec::new(),
            ttl,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Fetch a still-valid entry.
    #[must_use]
    pub fn get(&self, key: &CacheKey, now: Instant) -> Option<&[RawMatch]> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.stored_at) < self.ttl {
            tracing::debug!(len = entry.matches.len(), "checker cache hit");
            Some(&entry.matches)
        } else {
            None
        }
    }

    /// Store a response, evicting the oldest entry when full.
    pub fn insert(&mut self, key: CacheKey, matches: Vec<RawMatch>, now: Instant) {
        if !self.entries.contains_key(&key) {
            if self.order.len() >= self.capacity {
                let oldest = self.order.remove(0);
                self.entries.remove(&oldest);
            }
            self.order.push(key.clone());
        }
        self.entries.insert(
            key,
            Entry {
                matches,
                stored_at: now,
            },
        );
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, "en-US")
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = ResponseCache::new();
        let now = Instant::now();
        cache.insert(key("hello"), vec![], now);
        assert!(cache.get(&key("hello"), now).is_some());
    }

    #[test]
    fn miss_after_ttl() {
        let mut cache = ResponseCache::with_ttl(Duration::from_secs(1));
        let now = Instant::now();
        cache.insert(key("hello"), vec![], now);
        assert!(cache.get(&key("hello"), now + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn different_language_is_a_different_key() {
        let mut cache = ResponseCache::new();
        let now = Instant::now();
        cache.insert(CacheKey::new("hello", "en-US"), vec![], now);
        assert!(cache.get(&CacheKey::new("hello", "de-DE"), now).is_none());
    }

    #[test]
    fn different_length_is_a_different_key() {
        let mut cache = ResponseCache::new();
        let now = Instant::now();
        cache.insert(key("hello"), vec![], now);
        assert!(cache.get(&key("hello!"), now).is_none());
    }

    #[test]
    fn reinsert_refreshes_timestamp() {
        let mut cache = ResponseCache::with_ttl(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert(key("hello"), vec![], start);
        let later = start + Duration::from_secs(8);
        cache.insert(key("hello"), vec![], later);
        assert!(cache.get(&key("hello"), start + Duration::from_secs(15)).is_some());
    }

    #[test]
    fn eviction_drops_oldest() {
        let mut cache = ResponseCache::new();
        let now = Instant::now();
        for i in 0..(DEFAULT_CAPACITY + 1) {
            cache.insert(key(&format!("text {i}")), vec![], now);
        }
        assert_eq!(cache.len(), DEFAULT_CAPACITY);
        assert!(cache.get(&key("text 0"), now).is_none());
        assert!(cache.get(&key("text 1"), now).is_some());
    }

    #[test]
    fn clear_empties() {
        let mut cache = ResponseCache::new();
        cache.insert(key("hello"), vec![], Instant::now());
        cache.clear();
        assert!(cache.is_empty());
    }
}
