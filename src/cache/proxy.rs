// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-through caching decorator for call providers

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{trace, Instrument};

use super::{CacheKey, CacheMode, CachePolicy, Cacheability, CallCache};
use crate::errors::CallError;
use crate::provider::{CallProvider, CallRequest, CallTarget};
use crate::tracing::spans;

/// A [`CallProvider`] that serves repeated read calls from a [`CallCache`]
///
/// Only `call` is intercepted; every other capability is forwarded to the
/// wrapped provider untouched. A call is cached when it is pinned to a
/// numeric block and has a target (see [`CachePolicy`]); everything else goes
/// straight upstream and never touches the cache.
///
/// Concurrent identical calls share one upstream request. Upstream failures
/// are cached too and reach every caller sharing the key.
///
/// # Examples
///
/// ```rust,ignore
/// use semiocall::{CacheMode, CachedCallProvider};
/// use semiocall::provider::CallRequest;
/// use alloy_eips::BlockId;
///
/// let cached = CachedCallProvider::new(provider, CacheMode::ByBlockTag);
///
/// let request = CallRequest::new(token, calldata).with_block(BlockId::number(19_000_000));
/// let first = cached.call(request.clone()).await?;   // upstream
/// let second = cached.call(request).await?;          // cache hit
/// ```
pub struct CachedCallProvider<P> {
    inner: Arc<P>,
    cache: Arc<CallCache>,
    mode: CacheMode,
}

impl<P> Clone for CachedCallProvider<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: self.cache.clone(),
            mode: self.mode,
        }
    }
}

impl<P> std::fmt::Debug for CachedCallProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCallProvider")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<P> CachedCallProvider<P>
where
    P: CallProvider + 'static,
{
    /// Wrap `inner`, storing results in the process-wide [`CallCache::global`]
    pub fn new(inner: P, mode: CacheMode) -> Self {
        Self::with_cache(inner, CallCache::global(), mode)
    }

    /// Wrap `inner`, storing results in `cache`
    pub fn with_cache(inner: P, cache: Arc<CallCache>, mode: CacheMode) -> Self {
        Self {
            inner: Arc::new(inner),
            cache,
            mode,
        }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The cache this proxy reads from and writes to
    pub fn cache(&self) -> &Arc<CallCache> {
        &self.cache
    }

    /// The keying mode fixed at construction
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    async fn resolve(&self, target: Option<&CallTarget>) -> Result<Option<Address>, CallError> {
        match target {
            Some(target) => self.inner.resolve_target(target).await.map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<P> CallProvider for CachedCallProvider<P>
where
    P: CallProvider + 'static,
{
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError> {
        let to = self.resolve(request.to.as_ref()).await?;

        let (region, target, key_block) = match CachePolicy::evaluate(to, request.block, self.mode)
        {
            Cacheability::Cacheable {
                region,
                target,
                key_block,
            } => (region, target, key_block),
            Cacheability::Uncacheable(reason) => {
                trace!(reason = %reason, "Bypassing call cache");
                return self.inner.call(request).await;
            }
        };

        let key = CacheKey::new(target, &request.input, key_block);
        let upstream = CallRequest {
            to: Some(CallTarget::Address(target)),
            ..request
        };

        let inner = self.inner.clone();
        async move {
            self.cache
                .get_or_compute(region, key, move || async move { inner.call(upstream).await })
                .await
                .await
        }
        .instrument(spans::cached_call(target, key_block, region))
        .await
    }

    async fn resolve_target(&self, target: &CallTarget) -> Result<Address, CallError> {
        self.inner.resolve_target(target).await
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        self.inner.chain_id().await
    }

    async fn block_number(&self) -> Result<u64, CallError> {
        self.inner.block_number().await
    }
}
