// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for semiocall operations.
//!
//! Telemetry is kept out of business logic: each instrumented operation has a
//! span helper here, and the operation attaches it with
//! [`tracing::Instrument`]:
//!
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(param_value))
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use tracing::Span;

use crate::cache::CacheRegion;

/// Create span for a cacheable call served through the call cache.
///
/// Parent: caller's span
/// Children: upstream `eth_call` when the key is cold
#[inline]
pub(crate) fn cached_call(target: Address, block: Option<u64>, region: CacheRegion) -> Span {
    tracing::trace_span!(
        "semiocall.cached_call",
        target = %target,
        block = ?block,
        region = %region,
    )
}

/// Create span for a batched aggregation request.
///
/// This is the main public API entry point for batching.
///
/// Parent: None (root span for this operation)
/// Children: aggregate_chunk spans (one per chunk)
#[inline]
pub(crate) fn aggregate(
    operation: &'static str,
    aggregator: Address,
    calls: usize,
    batch_size: usize,
) -> Span {
    tracing::debug_span!(
        "semiocall.aggregate",
        operation = operation,
        aggregator = %aggregator,
        calls = calls,
        batch_size = batch_size,
        chunks = calls.div_ceil(batch_size),
    )
}

/// Create span for a single aggregation call covering one chunk.
///
/// Parent: aggregate span
#[inline]
pub(crate) fn aggregate_chunk(index: usize, calls: usize) -> Span {
    tracing::trace_span!("semiocall.aggregate_chunk", chunk = index, calls = calls)
}

/// Create span for resolving the aggregation contract of the connected chain.
#[inline]
pub(crate) fn multicall_init() -> Span {
    tracing::debug_span!("semiocall.multicall_init", chain_id = tracing::field::Empty)
}
