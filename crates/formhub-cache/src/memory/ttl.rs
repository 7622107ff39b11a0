//! Fixed-TTL cache using the moka crate.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use tracing::trace;

use formhub_core::traits::Clock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// A capacity-bounded cache whose entries live for a fixed TTL.
///
/// Entries are never invalidated early except by capacity eviction; a value
/// read within its TTL may be stale by up to the TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, Entry<V>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: u64, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        // The wall-clock TTL only reclaims memory; freshness is decided by `clock`.
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl.max(Duration::from_secs(1)))
            .build();
        Self {
            inner,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
            clock,
        }
    }

    /// Return the cached value if it has not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entry = self.inner.get(key).await?;
        if self.clock.now() < entry.expires_at {
            Some(entry.value)
        } else {
            trace!("Cache entry expired");
            self.inner.invalidate(key).await;
            None
        }
    }

    /// Store a value for one TTL from now.
    pub async fn insert(&self, key: K, value: V) {
        let entry = Entry {
            value,
            expires_at: self.clock.now() + self.ttl,
        };
        self.inner.insert(key, entry).await;
    }

    /// Remove a value.
    pub async fn remove(&self, key: &K) {
        self.inner.invalidate(key).await;
    }

    /// Approximate number of entries (after pending maintenance runs).
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
