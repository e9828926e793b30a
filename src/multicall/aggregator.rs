// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Batch execution through the aggregation contract
//!
//! Calls are split into ordered chunks of at most `batch_size`. Each chunk is
//! one `eth_call` to the aggregation contract, and chunks are dispatched
//! concurrently. Results are merged back in input order before decoding, so
//! the chunk size never changes what a caller observes.

use std::num::NonZeroUsize;
use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_eips::BlockId;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use futures::future::join_all;
use tracing::{debug, warn, Instrument};

use super::contracts::IMulticall3;
use super::{AggregateOutcome, MulticallCall, MulticallRegistry, TryCallResult};
use crate::config::constants::DEFAULT_BATCH_SIZE;
use crate::config::SemiocallConfig;
use crate::errors::MulticallError;
use crate::provider::{CallProvider, CallRequest};
use crate::tracing::spans;

#[derive(Debug, Clone, Copy)]
struct Deployment {
    chain_id: u64,
    address: Address,
}

/// Executes many read calls in few round trips
///
/// The aggregator needs to know which chain it talks to in order to find the
/// aggregation contract. Either pass the chain id up front with
/// [`Multicall::with_chain_id`], or call [`Multicall::init`] to ask the
/// provider. Both fail with [`MulticallError::UnsupportedChain`] when the
/// registry has no entry for the chain.
///
/// # Examples
///
/// ```rust,ignore
/// use semiocall::multicall::{Multicall, MulticallCall};
///
/// let multicall = Multicall::new(provider).with_chain_id(1)?;
///
/// let calls = vec![
///     MulticallCall::from_signature(usdc, "totalSupply()", Bytes::new(), "uint256")?,
///     MulticallCall::from_signature(weth, "totalSupply()", Bytes::new(), "uint256")?,
/// ];
///
/// let outcome = multicall.all(&calls, Some(BlockId::number(19_000_000)), None).await?;
/// if outcome.success {
///     println!("supplies: {:?}", outcome.results);
/// }
///
/// for result in multicall.try_all(&calls, None, Some(50)).await? {
///     println!("{} -> {:?}", result.success, result.value);
/// }
/// ```
pub struct Multicall<P> {
    provider: P,
    registry: Arc<MulticallRegistry>,
    batch_size: NonZeroUsize,
    deployment: Option<Deployment>,
}

impl<P> std::fmt::Debug for Multicall<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multicall")
            .field("batch_size", &self.batch_size)
            .field("deployment", &self.deployment)
            .finish_non_exhaustive()
    }
}

impl<P> Multicall<P>
where
    P: CallProvider,
{
    /// Create an uninitialized aggregator backed by the global registry
    pub fn new(provider: P) -> Self {
        Self::with_registry(provider, MulticallRegistry::global())
    }

    /// Create an uninitialized aggregator backed by `registry`
    pub fn with_registry(provider: P, registry: Arc<MulticallRegistry>) -> Self {
        Self {
            provider,
            registry,
            batch_size: DEFAULT_BATCH_SIZE,
            deployment: None,
        }
    }

    /// Bind the aggregator to `chain_id` without querying the provider
    ///
    /// # Errors
    ///
    /// Returns [`MulticallError::UnsupportedChain`] if the registry has no
    /// aggregation contract for the chain.
    pub fn with_chain_id(mut self, chain_id: u64) -> Result<Self, MulticallError> {
        let address = self.registry.resolve(chain_id)?;
        self.deployment = Some(Deployment { chain_id, address });
        Ok(self)
    }

    /// Set the default number of calls per aggregation call
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Take the default batch size from `config`
    #[must_use]
    pub fn with_config(self, config: &SemiocallConfig) -> Self {
        self.with_batch_size(config.batch_size)
    }

    /// Resolve the aggregation contract from the provider's chain id
    ///
    /// Does nothing if the aggregator is already bound to a chain.
    ///
    /// # Errors
    ///
    /// Returns [`MulticallError::Call`] if the chain id cannot be fetched and
    /// [`MulticallError::UnsupportedChain`] if the chain has no registered
    /// aggregation contract.
    pub async fn init(&mut self) -> Result<(), MulticallError> {
        if self.deployment.is_some() {
            return Ok(());
        }

        let span = spans::multicall_init();
        async {
            let chain_id = self.provider.chain_id().await?;
            tracing::Span::current().record("chain_id", chain_id);

            let address = self.registry.resolve(chain_id)?;
            debug!(chain_id = chain_id, address = %address, "Resolved aggregation contract");

            self.deployment = Some(Deployment { chain_id, address });
            Ok::<(), MulticallError>(())
        }
        .instrument(span)
        .await
    }

    /// Chain id the aggregator is bound to, if initialized
    pub fn chain_id(&self) -> Option<u64> {
        self.deployment.map(|d| d.chain_id)
    }

    /// Aggregation contract address, if initialized
    pub fn address(&self) -> Option<Address> {
        self.deployment.map(|d| d.address)
    }

    /// Default number of calls per aggregation call
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Execute all calls, requiring every one to succeed
    ///
    /// If any call fails, or any chunk cannot be executed at all, the outcome
    /// is unsuccessful and carries no results.
    ///
    /// # Errors
    ///
    /// Configuration errors, and [`MulticallError::Decode`] when a successful
    /// call's return data does not match its declared output shape.
    pub async fn all(
        &self,
        calls: &[MulticallCall],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<AggregateOutcome<DynSolValue>, MulticallError> {
        let calls: Vec<&MulticallCall> = calls.iter().collect();
        self.execute_all(&calls, block, batch_size).await
    }

    /// Execute all calls, reporting each call's success independently
    ///
    /// Failed calls, including every call of a chunk that could not be
    /// executed, are reported as [`TryCallResult::failed`].
    ///
    /// # Errors
    ///
    /// Configuration errors, and [`MulticallError::Decode`] when a successful
    /// call's return data does not match its declared output shape.
    pub async fn try_all(
        &self,
        calls: &[MulticallCall],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<Vec<TryCallResult>, MulticallError> {
        let calls: Vec<&MulticallCall> = calls.iter().collect();
        self.execute_try_all(&calls, block, batch_size).await
    }

    /// Like [`Multicall::all`], preserving the grouping of the input
    ///
    /// On success the results have exactly the shape of `groups`. On failure
    /// the result is empty.
    pub async fn group_all(
        &self,
        groups: &[Vec<MulticallCall>],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<AggregateOutcome<Vec<DynSolValue>>, MulticallError> {
        let calls: Vec<&MulticallCall> = groups.iter().flatten().collect();
        let outcome = self.execute_all(&calls, block, batch_size).await?;

        if !outcome.success {
            return Ok(AggregateOutcome::failed());
        }
        Ok(AggregateOutcome::succeeded(regroup(outcome.results, groups)))
    }

    /// Like [`Multicall::try_all`], preserving the grouping of the input
    pub async fn group_try_all(
        &self,
        groups: &[Vec<MulticallCall>],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<Vec<Vec<TryCallResult>>, MulticallError> {
        let calls: Vec<&MulticallCall> = groups.iter().flatten().collect();
        let results = self.execute_try_all(&calls, block, batch_size).await?;
        Ok(regroup(results, groups))
    }

    fn deployment(&self) -> Result<Deployment, MulticallError> {
        self.deployment.ok_or(MulticallError::NotInitialized)
    }

    fn effective_batch_size(&self, batch_size: Option<usize>) -> Result<usize, MulticallError> {
        match batch_size {
            None => Ok(self.batch_size.get()),
            Some(0) => Err(MulticallError::invalid_batch_size(
                "batch size must be at least 1",
            )),
            Some(n) => Ok(n),
        }
    }

    async fn execute_all(
        &self,
        calls: &[&MulticallCall],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<AggregateOutcome<DynSolValue>, MulticallError> {
        let deployment = self.deployment()?;
        let batch_size = self.effective_batch_size(batch_size)?;
        if calls.is_empty() {
            return Ok(AggregateOutcome::succeeded(Vec::new()));
        }

        async move {
            let chunks = calls
                .chunks(batch_size)
                .enumerate()
                .map(|(index, chunk)| self.aggregate_chunk(deployment.address, index, chunk, block));

            let mut returns = Vec::with_capacity(calls.len());
            for chunk in join_all(chunks).await {
                match chunk {
                    Some(data) => returns.extend(data),
                    None => return Ok(AggregateOutcome::failed()),
                }
            }

            let results = calls
                .iter()
                .zip(returns)
                .enumerate()
                .map(|(index, (call, data))| {
                    call.decode(&data)
                        .map_err(|source| MulticallError::Decode { index, source })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok::<_, MulticallError>(AggregateOutcome::succeeded(results))
        }
        .instrument(spans::aggregate(
            "all",
            deployment.address,
            calls.len(),
            batch_size,
        ))
        .await
    }

    async fn execute_try_all(
        &self,
        calls: &[&MulticallCall],
        block: Option<BlockId>,
        batch_size: Option<usize>,
    ) -> Result<Vec<TryCallResult>, MulticallError> {
        let deployment = self.deployment()?;
        let batch_size = self.effective_batch_size(batch_size)?;
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        async move {
            let chunks = calls.chunks(batch_size).enumerate().map(|(index, chunk)| {
                self.try_aggregate_chunk(deployment.address, index, chunk, block)
            });
            let raw: Vec<IMulticall3::Result> = join_all(chunks).await.into_iter().flatten().collect();

            calls
                .iter()
                .zip(raw)
                .enumerate()
                .map(|(index, (call, result))| {
                    if !result.success {
                        return Ok(TryCallResult::failed());
                    }
                    call.decode(&result.returnData)
                        .map(|value| TryCallResult {
                            success: true,
                            return_data: result.returnData,
                            value: Some(value),
                        })
                        .map_err(|source| MulticallError::Decode { index, source })
                })
                .collect::<Result<Vec<_>, MulticallError>>()
        }
        .instrument(spans::aggregate(
            "try_all",
            deployment.address,
            calls.len(),
            batch_size,
        ))
        .await
    }

    /// Run one chunk through `aggregate`; `None` if any call in it failed
    async fn aggregate_chunk(
        &self,
        aggregator: Address,
        index: usize,
        chunk: &[&MulticallCall],
        block: Option<BlockId>,
    ) -> Option<Vec<Bytes>> {
        let input = IMulticall3::aggregateCall {
            calls: encode_calls(chunk),
        }
        .abi_encode();
        let request = CallRequest::new(aggregator, input).with_block_opt(block);

        async move {
            let output = match self.provider.call(request).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(chunk = index, error = %e, "Aggregation call failed");
                    return None;
                }
            };

            match IMulticall3::aggregateCall::abi_decode_returns(&output) {
                Ok(decoded) if decoded.returnData.len() == chunk.len() => Some(decoded.returnData),
                Ok(decoded) => {
                    warn!(
                        chunk = index,
                        expected = chunk.len(),
                        returned = decoded.returnData.len(),
                        "Aggregation result count mismatch"
                    );
                    None
                }
                Err(e) => {
                    warn!(chunk = index, error = %e, "Malformed aggregation result");
                    None
                }
            }
        }
        .instrument(spans::aggregate_chunk(index, chunk.len()))
        .await
    }

    /// Run one chunk through `tryAggregate`; every call fails if the chunk does
    async fn try_aggregate_chunk(
        &self,
        aggregator: Address,
        index: usize,
        chunk: &[&MulticallCall],
        block: Option<BlockId>,
    ) -> Vec<IMulticall3::Result> {
        let input = IMulticall3::tryAggregateCall {
            requireSuccess: false,
            calls: encode_calls(chunk),
        }
        .abi_encode();
        let request = CallRequest::new(aggregator, input).with_block_opt(block);

        let failed = || {
            vec![
                IMulticall3::Result {
                    success: false,
                    returnData: Bytes::new(),
                };
                chunk.len()
            ]
        };

        async move {
            let output = match self.provider.call(request).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(chunk = index, error = %e, "Aggregation call failed");
                    return failed();
                }
            };

            match IMulticall3::tryAggregateCall::abi_decode_returns(&output) {
                Ok(results) if results.len() == chunk.len() => results,
                Ok(results) => {
                    warn!(
                        chunk = index,
                        expected = chunk.len(),
                        returned = results.len(),
                        "Aggregation result count mismatch"
                    );
                    failed()
                }
                Err(e) => {
                    warn!(chunk = index, error = %e, "Malformed aggregation result");
                    failed()
                }
            }
        }
        .instrument(spans::aggregate_chunk(index, chunk.len()))
        .await
    }
}

fn encode_calls(chunk: &[&MulticallCall]) -> Vec<IMulticall3::Call> {
    chunk
        .iter()
        .map(|call| IMulticall3::Call {
            target: call.target(),
            callData: call.calldata(),
        })
        .collect()
}

/// Split a flat result list back into the boundaries of `groups`
fn regroup<T, G>(flat: Vec<T>, groups: &[Vec<G>]) -> Vec<Vec<T>> {
    let mut flat = flat.into_iter();
    groups
        .iter()
        .map(|group| flat.by_ref().take(group.len()).collect())
        .collect()
}
