// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for cache keys and the cache policy
//!
//! These tests use proptest to check that keys are deterministic and that
//! changing any component of a call changes its key.

use alloy_eips::BlockId;
use alloy_primitives::Address;
use proptest::prelude::*;
use semiocall::cache::{CacheKey, CacheMode, CachePolicy, CacheRegion, Cacheability};

// Helper to generate arbitrary addresses
fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from)
}

// Helper to generate arbitrary call payloads (0-256 bytes)
fn arb_payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

proptest! {
    /// Property: Equal inputs always produce equal keys
    #[test]
    fn prop_key_is_deterministic(
        target in arb_address(),
        payload in arb_payload(),
        block in proptest::option::of(any::<u64>()),
    ) {
        prop_assert_eq!(
            CacheKey::new(target, &payload, block),
            CacheKey::new(target, &payload, block)
        );
    }

    /// Property: Changing the target changes the key
    #[test]
    fn prop_target_changes_key(
        a in arb_address(),
        b in arb_address(),
        payload in arb_payload(),
        block in any::<u64>(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            CacheKey::new(a, &payload, Some(block)),
            CacheKey::new(b, &payload, Some(block))
        );
    }

    /// Property: Changing the payload changes the key
    #[test]
    fn prop_payload_changes_key(
        target in arb_address(),
        a in arb_payload(),
        b in arb_payload(),
        block in any::<u64>(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            CacheKey::new(target, &a, Some(block)),
            CacheKey::new(target, &b, Some(block))
        );
    }

    /// Property: Changing the block changes a block-scoped key
    #[test]
    fn prop_block_changes_key(
        target in arb_address(),
        payload in arb_payload(),
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            CacheKey::new(target, &payload, Some(a)),
            CacheKey::new(target, &payload, Some(b))
        );
    }

    /// Property: Moving bytes between block and payload never collides
    #[test]
    fn prop_block_payload_boundary_is_unambiguous(
        target in arb_address(),
        payload in arb_payload(),
        block in 1u64..,
    ) {
        let mut shifted: Vec<u8> = block
            .to_be_bytes()
            .into_iter()
            .skip_while(|b| *b == 0)
            .collect();
        shifted.extend_from_slice(&payload);

        prop_assert_ne!(
            CacheKey::new(target, &payload, Some(block)),
            CacheKey::new(target, &shifted, Some(0))
        );
    }

    /// Property: Every numeric block is cacheable, keyed by block only in block-scoped mode
    #[test]
    fn prop_numeric_blocks_are_cacheable(
        target in arb_address(),
        block in any::<u64>(),
    ) {
        prop_assert_eq!(
            CachePolicy::evaluate(Some(target), Some(BlockId::number(block)), CacheMode::ByBlockTag),
            Cacheability::Cacheable { region: CacheRegion::BlockScoped, target, key_block: Some(block) }
        );
        prop_assert_eq!(
            CachePolicy::evaluate(Some(target), Some(BlockId::number(block)), CacheMode::Immutable),
            Cacheability::Cacheable { region: CacheRegion::Immutable, target, key_block: None }
        );
    }
}
