//! LRU cache of geocoding results.
//!
//! The same block or intersection shows up in many rows of one log, so
//! repeated lookups are served from memory. Default: 2000 entries, 24h TTL.
//! Only resolved coordinates are cached; failures are retried next time.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use policelog_core::Coordinates;

struct CacheEntry {
    coords: Coordinates,
    inserted_at: Instant,
}

/// Thread-safe LRU cache keyed by cleaned location text.
pub struct LocationCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    max_size: usize,
    ttl: Duration,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

impl LocationCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    pub fn default_cache() -> Self {
        Self::new(2000, Duration::from_secs(24 * 3600))
    }

    /// Cached coordinates, or `None` on miss or expiry.
    pub fn get(&self, location: &str) -> Option<Coordinates> {
        let mut inner = self.inner.lock();
        let (coords, expired) = match inner.entries.get(location) {
            Some(entry) => (entry.coords, entry.inserted_at.elapsed() >= inner.ttl),
            None => return None,
        };
        if expired {
            inner.remove(location);
            return None;
        }
        inner.touch(location);
        Some(coords)
    }

    pub fn put(&self, location: String, coords: Coordinates) {
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&location) {
            inner.touch(&location);
        } else {
            while inner.entries.len() >= inner.max_size {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
            }
            inner.order.push_back(location.clone());
        }
        inner.entries.insert(
            location,
            CacheEntry {
                coords,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let cache = LocationCache::new(10, Duration::from_secs(3600));
        assert!(cache.get("Main St").is_none());

        cache.put("Main St".into(), Coordinates::new(37.4, -122.1));
        assert_eq!(cache.get("Main St"), Some(Coordinates::new(37.4, -122.1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_is_least_recently_used() {
        let cache = LocationCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), Coordinates::new(1.0, 1.0));
        cache.put("b".into(), Coordinates::new(2.0, 2.0));
        assert!(cache.get("a").is_some());

        cache.put("c".into(), Coordinates::new(3.0, 3.0));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = LocationCache::new(10, Duration::from_millis(1));
        cache.put("ephemeral".into(), Coordinates::new(1.0, 1.0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("ephemeral").is_none());
        assert!(cache.is_empty());
    }
}
