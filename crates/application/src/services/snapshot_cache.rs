//! Snapshot cache
//!
//! Keyed TTL cache of validated snapshots. Expired entries are removed by
//! the lookup that finds them; there is no background sweep and no size
//! bound.

use std::collections::HashMap;
use std::time::Duration;

use domain::WeatherSnapshot;
use parking_lot::Mutex;
use tokio::time::Instant;

/// Key for a free-text query
#[must_use]
pub fn text_key(query: &str) -> String {
    format!("weather_{query}")
}

/// Key for a coordinate pair
#[must_use]
pub fn coordinates_key(latitude: f64, longitude: f64) -> String {
    format!("weather_coords_{latitude}_{longitude}")
}

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: WeatherSnapshot,
    inserted_at: Instant,
}

/// In-memory TTL cache of snapshots
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl SnapshotCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live entry for `key`; an expired entry is evicted and reported as a miss
    #[must_use]
    pub fn get(&self, key: &str) -> Option<WeatherSnapshot> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.snapshot.clone());
            },
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Insert or replace the entry for `key`, stamped now
    pub fn insert(&self, key: impl Into<String>, snapshot: WeatherSnapshot) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                snapshot,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `key`, live or not
    pub fn remove(&self, key: &str) -> Option<WeatherSnapshot> {
        self.entries.lock().remove(key).map(|entry| entry.snapshot)
    }

    /// Number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
