// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Dual-region call cache with single-flight entries
//!
//! Each region is an LRU map from [`CacheKey`] to a shared future. The future
//! is inserted before it resolves, so every caller that arrives while the
//! upstream call is in flight awaits the same computation, and callers that
//! arrive later read its stored outcome. Failed calls are stored like any
//! other outcome and returned to every caller until the entry is evicted or
//! cleared.
//!
//! Regions are allocated lazily: a region that never receives a cacheable
//! call never allocates a store.

use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock};

use alloy_primitives::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{CacheKey, CacheRegion};
use crate::config::SemiocallConfig;
use crate::errors::CallError;

/// A call outcome shared by every caller of the same key
pub type SharedCall = Shared<BoxFuture<'static, Result<Bytes, CallError>>>;

static GLOBAL: LazyLock<Arc<CallCache>> = LazyLock::new(|| Arc::new(CallCache::default()));

/// Statistics about a cache region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from an existing entry
    pub hits: u64,
    /// Lookups that started a new upstream call
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Current number of entries in the region
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.entries,
            self.hit_rate()
        )
    }
}

struct RegionState {
    store: Option<LruCache<CacheKey, SharedCall>>,
    max_entries: NonZeroUsize,
    stats: CacheStats,
}

impl RegionState {
    fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            store: None,
            max_entries,
            stats: CacheStats::default(),
        }
    }
}

/// Process-lifetime cache of read call outcomes
///
/// Proxies share a cache by holding the same `Arc<CallCache>`. Use
/// [`CallCache::global`] for the default shared instance or construct a
/// dedicated one to isolate tenants or tests.
///
/// # Examples
///
/// ```rust,ignore
/// use semiocall::{CallCache, CacheMode, CachedCallProvider, SemiocallConfig};
/// use std::sync::Arc;
///
/// let cache = Arc::new(CallCache::new(SemiocallConfig::default()));
/// let cached = CachedCallProvider::with_cache(provider, cache.clone(), CacheMode::ByBlockTag);
///
/// // When the chain head advances
/// cache.clear_region(CacheRegion::BlockScoped).await;
/// ```
pub struct CallCache {
    block_scoped: Mutex<RegionState>,
    immutable: Mutex<RegionState>,
}

impl Default for CallCache {
    fn default() -> Self {
        Self::new(SemiocallConfig::default())
    }
}

impl fmt::Debug for CallCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallCache").finish_non_exhaustive()
    }
}

impl CallCache {
    /// Create a cache with region capacities taken from `config`
    pub fn new(config: SemiocallConfig) -> Self {
        Self {
            block_scoped: Mutex::new(RegionState::new(
                config.max_entries(CacheRegion::BlockScoped),
            )),
            immutable: Mutex::new(RegionState::new(config.max_entries(CacheRegion::Immutable))),
        }
    }

    /// The default process-wide cache
    pub fn global() -> Arc<CallCache> {
        GLOBAL.clone()
    }

    fn region(&self, region: CacheRegion) -> &Mutex<RegionState> {
        match region {
            CacheRegion::BlockScoped => &self.block_scoped,
            CacheRegion::Immutable => &self.immutable,
        }
    }

    /// Return the entry for `key`, starting `compute` if there is none
    ///
    /// `compute` is invoked at most once per cold key: lookup and insert
    /// happen under the region lock, and the not-yet-resolved future is
    /// stored before the lock is released. Dropping the returned future does
    /// not cancel the computation for other holders of the entry.
    pub async fn get_or_compute<F, Fut>(
        &self,
        region: CacheRegion,
        key: CacheKey,
        compute: F,
    ) -> SharedCall
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, CallError>> + Send + 'static,
    {
        let mut guard = self.region(region).lock().await;
        let state = &mut *guard;
        let max_entries = state.max_entries;

        let store = state.store.get_or_insert_with(|| {
            debug!(region = %region, max_entries = max_entries.get(), "Allocating cache region");
            LruCache::new(max_entries)
        });

        if let Some(entry) = store.get(&key) {
            let entry = entry.clone();
            state.stats.hits += 1;
            trace!(region = %region, key = %key, "Cache hit");
            return entry;
        }

        let entry = compute().boxed().shared();
        let evicted = store.push(key, entry.clone());
        let entries = store.len();

        state.stats.misses += 1;
        state.stats.entries = entries;
        if let Some((evicted_key, _)) = evicted {
            state.stats.evictions += 1;
            debug!(region = %region, key = %evicted_key, "Evicting LRU cache entry");
        }
        trace!(region = %region, key = %key, "Cache miss");

        entry
    }

    /// Drop every entry in both regions
    ///
    /// In-flight computations still resolve for callers already awaiting them
    /// but are no longer reachable through the cache.
    pub async fn clear(&self) {
        for region in CacheRegion::ALL {
            self.clear_region(region).await;
        }
    }

    /// Drop every entry in one region
    ///
    /// Intended for rotating the block-scoped region when the chain advances.
    /// Only the entry count is reset; see [`CallCache::stats`].
    pub async fn clear_region(&self, region: CacheRegion) {
        let mut state = self.region(region).lock().await;
        if let Some(store) = state.store.as_mut() {
            debug!(region = %region, entries = store.len(), "Clearing cache region");
            store.clear();
        }
        state.stats.entries = 0;
    }

    /// Replace a region's store with one of a new capacity
    ///
    /// Existing entries are dropped. The new store is allocated on the next
    /// cacheable call for the region.
    pub async fn reconfigure(&self, region: CacheRegion, max_entries: NonZeroUsize) {
        let mut state = self.region(region).lock().await;
        debug!(region = %region, max_entries = max_entries.get(), "Reconfiguring cache region");
        state.max_entries = max_entries;
        state.store = None;
        state.stats.entries = 0;
    }

    /// Number of entries currently held in `region`
    pub async fn len(&self, region: CacheRegion) -> usize {
        let state = self.region(region).lock().await;
        state.store.as_ref().map_or(0, LruCache::len)
    }

    /// Returns true if both regions are empty
    pub async fn is_empty(&self) -> bool {
        for region in CacheRegion::ALL {
            if self.len(region).await > 0 {
                return false;
            }
        }
        true
    }

    /// Returns true if `region` has allocated its store
    pub async fn is_allocated(&self, region: CacheRegion) -> bool {
        self.region(region).lock().await.store.is_some()
    }

    /// Configured capacity of `region`
    pub async fn max_entries(&self, region: CacheRegion) -> NonZeroUsize {
        self.region(region).lock().await.max_entries
    }

    /// Statistics for `region`
    ///
    /// `hits`, `misses` and `evictions` are cumulative over the cache's
    /// lifetime and survive `clear`, `clear_region` and `reconfigure`. Use
    /// [`CallCache::reset_stats`] to measure a window such as one block.
    pub async fn stats(&self, region: CacheRegion) -> CacheStats {
        self.region(region).lock().await.stats.clone()
    }

    /// Zero the cumulative counters of `region`, keeping its entries
    pub async fn reset_stats(&self, region: CacheRegion) {
        let mut state = self.region(region).lock().await;
        let entries = state.store.as_ref().map_or(0, LruCache::len);
        state.stats = CacheStats {
            entries,
            ..CacheStats::default()
        };
    }
}
