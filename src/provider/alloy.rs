// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`CallProvider`] implementation backed by an Alloy provider

use std::marker::PhantomData;

use alloy_network::{Ethereum, Network, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use async_trait::async_trait;
use tracing::trace;

use super::{CallProvider, CallRequest, CallTarget};
use crate::errors::CallError;

/// Adapts any Alloy [`Provider`] to the [`CallProvider`] interface
///
/// Calls are executed with `eth_call`, network identity with `eth_chainId`
/// and head lookups with `eth_blockNumber`. Named targets are not resolved
/// by this adapter.
///
/// # Example
///
/// ```rust,ignore
/// use alloy_provider::ProviderBuilder;
/// use semiocall::provider::AlloyCallProvider;
///
/// let provider = ProviderBuilder::new().connect_http(url);
/// let calls = AlloyCallProvider::new(provider);
/// ```
pub struct AlloyCallProvider<P, N = Ethereum> {
    provider: P,
    _network: PhantomData<fn() -> N>,
}

impl<P, N> AlloyCallProvider<P, N> {
    /// Wrap an Alloy provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _network: PhantomData,
        }
    }

    /// Get a reference to the wrapped provider
    pub fn inner(&self) -> &P {
        &self.provider
    }

    /// Unwrap the adapter, returning the Alloy provider
    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: Clone, N> Clone for AlloyCallProvider<P, N> {
    fn clone(&self) -> Self {
        Self::new(self.provider.clone())
    }
}

impl<P: std::fmt::Debug, N> std::fmt::Debug for AlloyCallProvider<P, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyCallProvider")
            .field("provider", &self.provider)
            .finish()
    }
}

#[async_trait]
impl<P, N> CallProvider for AlloyCallProvider<P, N>
where
    P: Provider<N>,
    N: Network,
{
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError> {
        let mut tx = N::TransactionRequest::default().with_input(request.input);
        if let Some(target) = &request.to {
            let to = self.resolve_target(target).await?;
            tx.set_to(to);
        }

        let mut call = self.provider.call(tx);
        if let Some(block) = request.block {
            call = call.block(block);
        }

        trace!(block = ?request.block, "eth_call");
        call.await.map_err(|e| CallError::upstream("eth_call", e))
    }

    async fn resolve_target(&self, target: &CallTarget) -> Result<Address, CallError> {
        match target {
            CallTarget::Address(address) => Ok(*address),
            CallTarget::Name(name) => Err(CallError::UnresolvedTarget { name: name.clone() }),
        }
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| CallError::upstream("eth_chainId", e))
    }

    async fn block_number(&self) -> Result<u64, CallError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| CallError::upstream("eth_blockNumber", e))
    }
}
