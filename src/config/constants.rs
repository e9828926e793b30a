//! Well-known addresses and default limits
//!
//! This module centralizes magic constants used throughout the semiocall crate.

use std::num::NonZeroUsize;

use alloy_primitives::{address, Address};

/// Canonical Multicall3 deployment address.
///
/// Multicall3 is deployed at the same address on most EVM chains via a
/// keyless deployment transaction.
///
/// Contract: 0xcA11bde05977b3631167028862bE2a173976CA11
pub const MULTICALL3_ADDRESS: Address = address!("ca11bde05977b3631167028862be2a173976ca11");

/// Default number of calls sent in a single aggregation call.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default capacity of the block-scoped cache region.
pub const DEFAULT_BLOCK_SCOPED_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(1_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default capacity of the immutable cache region.
pub const DEFAULT_IMMUTABLE_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(n) => n,
    None => unreachable!(),
};
