// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for semiocall caches and batching
//!
//! # Example: Using defaults
//!
//! ```rust
//! use semiocall::SemiocallConfig;
//!
//! let config = SemiocallConfig::default();
//! assert_eq!(config.batch_size.get(), 100);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use semiocall::SemiocallConfigBuilder;
//! use std::num::NonZeroUsize;
//!
//! let config = SemiocallConfigBuilder::new()
//!     .block_scoped_max_entries(NonZeroUsize::new(64).unwrap())
//!     .batch_size(NonZeroUsize::new(250).unwrap())
//!     .build();
//! ```

use std::num::NonZeroUsize;

use crate::cache::CacheRegion;

pub mod constants;

use constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BLOCK_SCOPED_MAX_ENTRIES, DEFAULT_IMMUTABLE_MAX_ENTRIES,
};

/// Configuration for call caching and batching
///
/// Region sizes take effect the next time a region's store is allocated,
/// i.e. on first use or after it has been reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemiocallConfig {
    /// Maximum entries kept in the block-scoped region
    /// Default: 1000
    pub block_scoped_max_entries: NonZeroUsize,

    /// Maximum entries kept in the immutable region
    /// Default: 10000
    pub immutable_max_entries: NonZeroUsize,

    /// Default number of calls per aggregation call
    /// Default: 100
    pub batch_size: NonZeroUsize,
}

impl Default for SemiocallConfig {
    fn default() -> Self {
        Self {
            block_scoped_max_entries: DEFAULT_BLOCK_SCOPED_MAX_ENTRIES,
            immutable_max_entries: DEFAULT_IMMUTABLE_MAX_ENTRIES,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SemiocallConfig {
    /// Get the configured capacity for a cache region
    #[must_use]
    pub fn max_entries(&self, region: CacheRegion) -> NonZeroUsize {
        match region {
            CacheRegion::BlockScoped => self.block_scoped_max_entries,
            CacheRegion::Immutable => self.immutable_max_entries,
        }
    }

    /// Set the capacity for a cache region
    pub fn set_max_entries(&mut self, region: CacheRegion, max_entries: NonZeroUsize) {
        match region {
            CacheRegion::BlockScoped => self.block_scoped_max_entries = max_entries,
            CacheRegion::Immutable => self.immutable_max_entries = max_entries,
        }
    }
}

/// Builder for [`SemiocallConfig`]
///
/// # Example
///
/// ```rust
/// use semiocall::SemiocallConfigBuilder;
/// use std::num::NonZeroUsize;
///
/// let config = SemiocallConfigBuilder::new()
///     .immutable_max_entries(NonZeroUsize::new(50_000).unwrap())
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SemiocallConfigBuilder {
    config: SemiocallConfig,
}

impl SemiocallConfigBuilder {
    /// Create a new builder starting from defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block-scoped region capacity
    pub fn block_scoped_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.config.block_scoped_max_entries = max_entries;
        self
    }

    /// Set the immutable region capacity
    pub fn immutable_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.config.immutable_max_entries = max_entries;
        self
    }

    /// Set the default number of calls per aggregation call
    pub fn batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SemiocallConfig {
        self.config
    }
}
