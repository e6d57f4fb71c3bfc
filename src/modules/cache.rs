use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// # cache of computed pages
/// serialized page data keyed by request path. clones share the same
/// entries, so the routes and the database watcher see the same cache.
/// a cache created with capacity 0 never stores anything
#[derive(Clone, Debug)]
pub struct PlotCache {
    entries: Option<Arc<Mutex<LruCache<String, String>>>>,
}

impl PlotCache {
    pub fn new(capacity: usize) -> PlotCache {
        PlotCache {
            entries: NonZeroUsize::new(capacity).map(|e| Arc::new(Mutex::new(LruCache::new(e)))),
        }
    }

    pub fn disabled() -> PlotCache {
        PlotCache { entries: None }
    }

    fn lock(&self) -> Option<MutexGuard<'_, LruCache<String, String>>> {
        self.entries
            .as_ref()
            .map(|e| e.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// # get cached data
    /// entries that no longer deserialize into `T` are dropped
    ///
    /// ## Arguments
    /// * `key` - the request path
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.lock()?;
        let data = entries.get(key)?;

        match serde_json::from_str(data) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(target: "cache:get", "dropping unreadable cache entry {}: {}", key, error);
                entries.pop(key);
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        let Some(mut entries) = self.lock() else {
            return;
        };

        match serde_json::to_string(value) {
            Ok(data) => {
                entries.put(key.to_string(), data);
            }
            Err(error) => {
                warn!(target: "cache:insert", "could not serialize {}: {}", key, error);
            }
        }
    }

    /// # clear the cache
    ///
    /// ## Returns
    /// * `usize` - the amount of entries removed
    pub fn clear(&self) -> usize {
        let Some(mut entries) = self.lock() else {
            return 0;
        };

        let removed = entries.len();
        entries.clear();
        debug!(target: "cache:clear", "removed {} cached pages", removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
