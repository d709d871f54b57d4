//! TTL cache for instance listings.
//!
//! Entries expire lazily: a lookup that finds an entry at or past its TTL
//! drops it and reports a miss. There is no background reaper and no size
//! bound; the key space is `(service type, user)` pairs, which stays small.
//! Failed lookups are never stored.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::types::ServiceInstance;

/// How long a listing stays fresh unless the client is built with another TTL.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Identifies one listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Service type filter, `None` for the unfiltered collection.
    pub service_type: Option<String>,
    /// User scope, `None` when unscoped.
    pub user_id: Option<String>,
}

impl CacheKey {
    /// Build a key for a listing query.
    #[must_use]
    pub fn new(service_type: Option<&str>, user_id: Option<&str>) -> Self {
        Self {
            service_type: service_type.map(str::to_owned),
            user_id: user_id.map(str::to_owned),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instances:{}:{}",
            self.service_type.as_deref().unwrap_or("*"),
            self.user_id.as_deref().unwrap_or("*")
        )
    }
}

struct CacheEntry {
    instances: Vec<ServiceInstance>,
    stored_at: Instant,
}

/// Time-bounded memo of listing results, owned by one registry client.
pub struct InstanceCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl InstanceCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The TTL this cache was built with.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh listing for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Vec<ServiceInstance>> {
        self.get_at(key, Instant::now())
    }

    /// Store a listing, replacing any previous entry for `key`.
    pub fn put(&self, key: CacheKey, instances: Vec<ServiceInstance>) {
        self.put_at(key, instances, Instant::now());
    }

    /// Drop the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().is_some_and(|mut entries| entries.remove(key).is_some())
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Some(mut entries) = self.lock() {
            entries.clear();
        }
    }

    /// Number of stored entries, including ones that have expired but not
    /// yet been looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Vec<ServiceInstance>> {
        let mut entries = self.lock()?;

        let age = now.saturating_duration_since(entries.get(key)?.stored_at);
        if age >= self.ttl {
            debug!(key = %key, age_ms = age.as_millis(), "cache entry expired");
            entries.remove(key);
            return None;
        }

        debug!(key = %key, "cache hit");
        entries.get(key).map(|entry| entry.instances.clone())
    }

    pub(crate) fn put_at(&self, key: CacheKey, instances: Vec<ServiceInstance>, now: Instant) {
        if let Some(mut entries) = self.lock() {
            entries.insert(
                key,
                CacheEntry {
                    instances,
                    stored_at: now,
                },
            );
        }
    }

    /// A poisoned lock degrades to "no cache" rather than a panic.
    fn lock(&self) -> Option<MutexGuard<'_, HashMap<CacheKey, CacheEntry>>> {
        match self.entries.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("instance cache lock poisoned; bypassing cache");
                None
            },
        }
    }
}

impl Default for InstanceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl fmt::Debug for InstanceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
