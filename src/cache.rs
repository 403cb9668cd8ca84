// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cache-aside layer for identity and capability lookups.
//!
//! Read-through: a hit returns without touching the backing store, a miss
//! invokes the loader against the authoritative gateway and refreshes the
//! entry. Staleness after a permission edit is therefore bounded to roughly
//! one TTL window. The cache is advisory only: any cache failure is logged
//! and the call falls back to the authoritative store, it never fails or
//! denies a request.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gateways::{CacheError, CacheGateway, StoreError};

// =============================================================================
// Cache Keys
// =============================================================================

/// Cache key for an identity record.
pub fn identity_key(ident: Uuid) -> String {
    format!("identity:{}", ident.simple())
}

/// Cache key for a capability set.
pub fn capabilities_key(identity_ident: Uuid) -> String {
    format!("capabilities:{}", identity_ident.simple())
}

// =============================================================================
// Cache-Aside Wrapper
// =============================================================================

/// Read-through wrapper over a [`CacheGateway`].
#[derive(Clone)]
pub struct CacheAside {
    gateway: Arc<dyn CacheGateway>,
}

impl CacheAside {
    pub fn new(gateway: Arc<dyn CacheGateway>) -> Self {
        Self { gateway }
    }

    /// Return the cached value for `key`, or load it from the authoritative
    /// store and refresh the entry.
    ///
    /// The loader result is authoritative: a `None` from the loader is
    /// returned as-is and nothing is cached for it. An undecodable cached
    /// value is dropped and treated as a miss. The write back is
    /// fire-and-forget relative to the returned value.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, StoreError>>,
    {
        match self.gateway.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    return Ok(Some(value));
                }
                Err(err) => {
                    warn!(key, error = %err, "dropping undecodable cache entry");
                    let _ = self.gateway.delete(key).await;
                }
            },
            Ok(None) => {}
            Err(err) => warn!(key, error = %err, "cache read failed, falling back to store"),
        }

        let loaded = loader().await?;

        if let Some(ref value) = loaded {
            match serde_json::to_string(value) {
                Ok(raw) => {
                    if let Err(err) = self.gateway.set(key, &raw).await {
                        warn!(key, error = %err, "cache write failed");
                    }
                }
                Err(err) => warn!(key, error = %err, "cache serialization failed"),
            }
        }

        Ok(loaded)
    }

    /// Drop the entry for `key`, if any. Failures are logged and swallowed.
    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.gateway.delete(key).await {
            warn!(key, error = %err, "cache invalidation failed");
        }
    }
}

// =============================================================================
// In-Process Cache Gateway
// =============================================================================

struct CacheSlot {
    value: String,
    inserted_at: Instant,
}

/// In-process LRU cache gateway with per-entry TTL.
pub struct InMemoryCache {
    entries: Mutex<LruCache<String, CacheSlot>>,
    ttl: Duration,
}

impl InMemoryCache {
    /// Create a cache holding at most `capacity` entries, each valid for
    /// `ttl` after insertion.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }
}

#[async_trait]
impl CacheGateway for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError("cache lock poisoned".to_string()))?;
        if let Some(slot) = entries.get(key) {
            if slot.inserted_at.elapsed() < self.ttl {
                return Ok(Some(slot.value.clone()));
            }
            // Expired entry, drop it.
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError("cache lock poisoned".to_string()))?;
        entries.put(
            key.to_string(),
            CacheSlot {
                value: value.to_string(),
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError("cache lock poisoned".to_string()))?;
        entries.pop(key);
        Ok(())
    }
}
