// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Decides whether a call may be cached, and where
//!
//! Rules, applied in order:
//!
//! 1. No block or `latest` → not cacheable (state may change at any moment)
//! 2. Any other non-numeric block (pending, safe, finalized, earliest, hash)
//!    → not cacheable
//! 3. No target → not cacheable
//! 4. Otherwise cacheable in the region selected by the proxy's [`CacheMode`]

use std::fmt;

use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::Address;

/// How a cached proxy keys its calls
///
/// Fixed when the proxy is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheMode {
    /// Key by block number; entries live in the block-scoped region
    #[default]
    ByBlockTag,
    /// Ignore the block number; entries live in the immutable region
    ///
    /// For calls whose result never changes, e.g. calls pinned to a block far
    /// behind the chain head.
    Immutable,
}

impl CacheMode {
    /// The region calls made in this mode are stored in
    #[must_use]
    pub fn region(&self) -> CacheRegion {
        match self {
            Self::ByBlockTag => CacheRegion::BlockScoped,
            Self::Immutable => CacheRegion::Immutable,
        }
    }
}

/// One of the two independently sized cache regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    /// Entries tied to a specific block
    BlockScoped,
    /// Entries assumed valid regardless of block
    Immutable,
}

impl CacheRegion {
    /// Both regions, block-scoped first
    pub const ALL: [CacheRegion; 2] = [CacheRegion::BlockScoped, CacheRegion::Immutable];

    /// Human-readable region name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlockScoped => "block_scoped",
            Self::Immutable => "immutable",
        }
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a call bypassed the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncacheableReason {
    /// Block was unset or `latest`
    LatestBlock,
    /// Block was a tag or hash rather than a number
    NonIntegralBlock,
    /// Call had no destination
    NoTarget,
}

impl fmt::Display for UncacheableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestBlock => f.write_str("latest block"),
            Self::NonIntegralBlock => f.write_str("non-integral block"),
            Self::NoTarget => f.write_str("no target"),
        }
    }
}

/// Outcome of evaluating a call against the cache policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cacheability {
    /// The call may be served from `region`
    Cacheable {
        /// Region the entry belongs to
        region: CacheRegion,
        /// Resolved call target
        target: Address,
        /// Block number that is part of the key; `None` in the immutable region
        key_block: Option<u64>,
    },
    /// The call must go straight to the upstream provider
    Uncacheable(UncacheableReason),
}

impl Cacheability {
    /// Returns true if the call may be cached
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Cacheable { .. })
    }
}

/// Pure cache policy over a resolved call
pub struct CachePolicy;

impl CachePolicy {
    /// Evaluate a call with resolved target `to` against `block`
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloy_eips::BlockId;
    /// use alloy_primitives::Address;
    /// use semiocall::cache::{CacheMode, CachePolicy, UncacheableReason, Cacheability};
    ///
    /// let latest = CachePolicy::evaluate(Some(Address::ZERO), None, CacheMode::ByBlockTag);
    /// assert_eq!(latest, Cacheability::Uncacheable(UncacheableReason::LatestBlock));
    ///
    /// let pinned = CachePolicy::evaluate(
    ///     Some(Address::ZERO),
    ///     Some(BlockId::number(100)),
    ///     CacheMode::ByBlockTag,
    /// );
    /// assert!(pinned.is_cacheable());
    /// ```
    #[must_use]
    pub fn evaluate(to: Option<Address>, block: Option<BlockId>, mode: CacheMode) -> Cacheability {
        let number = match block {
            None | Some(BlockId::Number(BlockNumberOrTag::Latest)) => {
                return Cacheability::Uncacheable(UncacheableReason::LatestBlock);
            }
            Some(BlockId::Number(BlockNumberOrTag::Number(number))) => number,
            Some(_) => return Cacheability::Uncacheable(UncacheableReason::NonIntegralBlock),
        };

        let Some(target) = to else {
            return Cacheability::Uncacheable(UncacheableReason::NoTarget);
        };

        let region = mode.region();
        let key_block = match region {
            CacheRegion::BlockScoped => Some(number),
            CacheRegion::Immutable => None,
        };

        Cacheability::Cacheable {
            region,
            target,
            key_block,
        }
    }
}
