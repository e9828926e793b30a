// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for batched call execution

mod helpers;

use std::num::NonZeroUsize;
use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_eips::BlockId;
use alloy_primitives::{Address, Bytes, U256};
use helpers::{addr, init_tracing, uint, MockCallProvider};
use semiocall::config::constants::MULTICALL3_ADDRESS;
use semiocall::multicall::{Multicall, MulticallCall, MulticallRegistry, TryCallResult};
use semiocall::{CacheMode, CachedCallProvider, CallCache, MulticallError};

const CHAIN_ID: u64 = 31337;

fn registry() -> Arc<MulticallRegistry> {
    let registry = MulticallRegistry::new();
    registry.register(CHAIN_ID, MULTICALL3_ADDRESS);
    Arc::new(registry)
}

/// `totalSupply()` on `target`
fn supply(target: Address) -> MulticallCall {
    MulticallCall::from_signature(target, "totalSupply()", Bytes::new(), "uint256").unwrap()
}

fn supply_value(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

/// Mock where call n on addr(n) returns n * 10, except for `failing`
fn mock_with(count: u8, failing: &[u8]) -> MockCallProvider {
    let mut mock = MockCallProvider::new(CHAIN_ID).with_aggregator(MULTICALL3_ADDRESS);
    for n in 1..=count {
        let call = supply(addr(n));
        mock = if failing.contains(&n) {
            mock.with_failure(addr(n), call.calldata(), "execution reverted")
        } else {
            mock.with_response(addr(n), call.calldata(), uint(u64::from(n) * 10))
        };
    }
    mock
}

fn multicall(mock: Arc<MockCallProvider>) -> Multicall<Arc<MockCallProvider>> {
    Multicall::with_registry(mock, registry())
        .with_chain_id(CHAIN_ID)
        .unwrap()
}

#[tokio::test]
async fn test_all_collapses_on_any_failure() {
    init_tracing();

    let mock = Arc::new(mock_with(4, &[2]));
    let multicall = multicall(mock.clone());
    let calls: Vec<_> = (1..=4).map(|n| supply(addr(n))).collect();

    let outcome = multicall.all(&calls, Some(BlockId::number(50)), None).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.results.is_empty());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_try_all_isolates_failures() {
    let mock = Arc::new(mock_with(4, &[2]));
    let multicall = multicall(mock.clone());
    let calls: Vec<_> = (1..=4).map(|n| supply(addr(n))).collect();

    let results = multicall.try_all(&calls, Some(BlockId::number(50)), None).await.unwrap();

    let flags: Vec<bool> = results.iter().map(|r| r.success).collect();
    assert_eq!(flags, vec![true, false, true, true]);
    assert_eq!(results[1], TryCallResult::failed());
    assert_eq!(results[0].value, Some(supply_value(10)));
    assert_eq!(results[0].return_data, uint(10));
    assert_eq!(results[2].value, Some(supply_value(30)));
    assert_eq!(results[3].value, Some(supply_value(40)));
}

#[tokio::test]
async fn test_all_fails_when_a_later_chunk_fails() {
    // all([c1, c2, c3, c4], 50, batch size 2) with c3 failing
    let mock = Arc::new(mock_with(4, &[3]));
    let multicall = multicall(mock.clone());
    let calls: Vec<_> = (1..=4).map(|n| supply(addr(n))).collect();

    let outcome = multicall
        .all(&calls, Some(BlockId::number(50)), Some(2))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.results.is_empty());
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_all_succeeds_and_decodes_in_order() {
    let mock = Arc::new(mock_with(4, &[]));
    let multicall = multicall(mock.clone());
    let calls: Vec<_> = (1..=4).map(|n| supply(addr(n))).collect();

    let outcome = multicall.all(&calls, None, Some(3)).await.unwrap();

    assert!(outcome.success);
    assert_eq!(
        outcome.results,
        vec![supply_value(10), supply_value(20), supply_value(30), supply_value(40)]
    );
}

#[tokio::test]
async fn test_chunking_does_not_change_results() {
    let batch_size = 3;
    let count = (2 * batch_size + 1) as u8;
    let calls: Vec<_> = (1..=count).map(|n| supply(addr(n))).collect();

    let chunked_mock = Arc::new(mock_with(count, &[5]));
    let chunked = multicall(chunked_mock.clone());
    let single_mock = Arc::new(mock_with(count, &[5]));
    let single = multicall(single_mock.clone());

    let chunked_results = chunked.try_all(&calls, None, Some(batch_size)).await.unwrap();
    let single_results = single.try_all(&calls, None, Some(calls.len())).await.unwrap();
    assert_eq!(chunked_results, single_results);
    assert_eq!(chunked_mock.call_count(), 3);
    assert_eq!(single_mock.call_count(), 1);

    let all_ok: Vec<_> = calls.iter().filter(|c| c.target() != addr(5)).cloned().collect();
    let chunked_all = chunked.all(&all_ok, None, Some(batch_size)).await.unwrap();
    let single_all = single.all(&all_ok, None, Some(all_ok.len())).await.unwrap();
    assert!(chunked_all.success);
    assert_eq!(chunked_all, single_all);
}

#[tokio::test]
async fn test_group_all_preserves_boundaries() {
    let mock = Arc::new(mock_with(8, &[]));
    let multicall = multicall(mock.clone());
    let groups = vec![
        vec![supply(addr(1)), supply(addr(2))],
        vec![supply(addr(3)), supply(addr(4))],
        vec![supply(addr(5)), supply(addr(6)), supply(addr(7))],
        vec![supply(addr(8))],
    ];

    let outcome = multicall.group_all(&groups, None, Some(3)).await.unwrap();

    assert!(outcome.success);
    let sizes: Vec<usize> = outcome.results.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 3, 1]);
    assert_eq!(outcome.results[2][0], supply_value(50));
    assert_eq!(outcome.results[3][0], supply_value(80));
}

#[tokio::test]
async fn test_group_all_is_empty_on_failure() {
    let mock = Arc::new(mock_with(8, &[6]));
    let multicall = multicall(mock.clone());
    let groups = vec![
        vec![supply(addr(1)), supply(addr(2))],
        vec![supply(addr(3)), supply(addr(4))],
        vec![supply(addr(5)), supply(addr(6)), supply(addr(7))],
        vec![supply(addr(8))],
    ];

    let outcome = multicall.group_all(&groups, None, None).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn test_group_try_all_preserves_boundaries_with_failures() {
    let mock = Arc::new(mock_with(8, &[2, 6]));
    let multicall = multicall(mock.clone());
    let groups = vec![
        vec![supply(addr(1)), supply(addr(2))],
        vec![supply(addr(3)), supply(addr(4))],
        vec![supply(addr(5)), supply(addr(6)), supply(addr(7))],
        vec![supply(addr(8))],
    ];

    let grouped = multicall.group_try_all(&groups, None, Some(2)).await.unwrap();

    let flags: Vec<Vec<bool>> = grouped
        .iter()
        .map(|group| group.iter().map(|r| r.success).collect())
        .collect();
    assert_eq!(
        flags,
        vec![
            vec![true, false],
            vec![true, true],
            vec![true, false, true],
            vec![true],
        ]
    );
}

#[tokio::test]
async fn test_unsupported_chain_fails_without_network_calls() {
    let mock = Arc::new(MockCallProvider::new(424242).with_aggregator(MULTICALL3_ADDRESS));

    let constructed = Multicall::with_registry(mock.clone(), registry()).with_chain_id(424242);
    assert!(matches!(
        constructed,
        Err(MulticallError::UnsupportedChain { chain_id: 424242 })
    ));

    let mut multicall = Multicall::with_registry(mock.clone(), registry());
    let error = multicall.init().await.unwrap_err();
    assert!(error.is_configuration());
    assert!(multicall.address().is_none());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_init_uses_provider_chain_id() {
    let mock = Arc::new(mock_with(2, &[]));
    let mut multicall = Multicall::with_registry(mock.clone(), registry());

    multicall.init().await.unwrap();
    multicall.init().await.unwrap();

    assert_eq!(multicall.chain_id(), Some(CHAIN_ID));
    assert_eq!(multicall.address(), Some(MULTICALL3_ADDRESS));
    assert_eq!(mock.chain_id_count(), 1);

    let calls = vec![supply(addr(1)), supply(addr(2))];
    assert!(multicall.all(&calls, None, None).await.unwrap().success);
}

#[tokio::test]
async fn test_registration_extends_supported_chains() {
    let registry = Arc::new(MulticallRegistry::new());
    let mock = Arc::new(mock_with(1, &[]));

    assert!(Multicall::with_registry(mock.clone(), registry.clone())
        .with_chain_id(CHAIN_ID)
        .is_err());

    registry.register(CHAIN_ID, MULTICALL3_ADDRESS);
    let multicall = Multicall::with_registry(mock.clone(), registry)
        .with_chain_id(CHAIN_ID)
        .unwrap();
    assert_eq!(multicall.address(), Some(MULTICALL3_ADDRESS));
}

#[tokio::test]
async fn test_default_batch_size_applies() {
    let mock = Arc::new(mock_with(5, &[]));
    let multicall = multicall(mock.clone()).with_batch_size(NonZeroUsize::new(2).unwrap());
    let calls: Vec<_> = (1..=5).map(|n| supply(addr(n))).collect();

    let results = multicall.try_all(&calls, None, None).await.unwrap();

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_block_reference_reaches_aggregation_call() {
    let mock = Arc::new(mock_with(1, &[]));
    let multicall = multicall(mock.clone());

    multicall
        .all(&[supply(addr(1))], Some(BlockId::number(50)), None)
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].address(), Some(MULTICALL3_ADDRESS));
    assert_eq!(requests[0].block, Some(BlockId::number(50)));
}

#[tokio::test]
async fn test_cached_provider_deduplicates_repeated_batches() {
    let mock = Arc::new(mock_with(4, &[]));
    let cache = Arc::new(CallCache::default());
    let cached = CachedCallProvider::with_cache(mock.clone(), cache, CacheMode::ByBlockTag);
    let multicall = Multicall::with_registry(cached, registry())
        .with_chain_id(CHAIN_ID)
        .unwrap();
    let calls: Vec<_> = (1..=4).map(|n| supply(addr(n))).collect();
    let block = Some(BlockId::number(50));

    let first = multicall.all(&calls, block, Some(2)).await.unwrap();
    let second = multicall.all(&calls, block, Some(2)).await.unwrap();

    assert!(first.success);
    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 2);
}
