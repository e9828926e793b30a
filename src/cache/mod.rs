// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-through caching of read calls.
//!
//! - [`CacheKey`] derives a compact identity for a call
//! - [`CachePolicy`] decides whether a call is cacheable and in which
//!   [`CacheRegion`]
//! - [`CallCache`] holds the two LRU regions and guarantees a single upstream
//!   call per cold key
//! - [`CachedCallProvider`] wraps any [`CallProvider`](crate::provider::CallProvider)
//!   and intercepts its `call`

mod key;
mod policy;
mod proxy;
mod store;

pub use key::CacheKey;
pub use policy::{CacheMode, CachePolicy, CacheRegion, Cacheability, UncacheableReason};
pub use proxy::CachedCallProvider;
pub use store::{CacheStats, CallCache, SharedCall};
