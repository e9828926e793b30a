// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Remote call provider abstraction
//!
//! The caching and batching layers only need a narrow slice of a node's query
//! interface: execute a read call, resolve a call target, and report the
//! network identity. [`CallProvider`] captures exactly that, so the cache
//! decorator and the multicall aggregator can be stacked on top of each other
//! and on top of any Alloy provider.
//!
//! # Examples
//!
//! ## Wrapping an Alloy provider
//!
//! ```rust,ignore
//! use semiocall::provider::{http_call_provider, ProviderConfig};
//! use semiocall::{CacheMode, CachedCallProvider};
//!
//! let provider = http_call_provider(ProviderConfig::new("https://eth.llamarpc.com"))?;
//! let cached = CachedCallProvider::new(provider, CacheMode::ByBlockTag);
//! ```
//!
//! ## Issuing a call
//!
//! ```rust,ignore
//! use semiocall::provider::{CallProvider, CallRequest};
//! use alloy_eips::BlockId;
//!
//! let request = CallRequest::new(token, calldata).with_block(BlockId::number(19_000_000));
//! let output = cached.call(request).await?;
//! ```

mod alloy;
mod config;
mod factory;

pub use alloy::AlloyCallProvider;
pub use config::ProviderConfig;
pub use factory::{http_call_provider, http_call_provider_with_counter, HttpCallProvider};

use std::fmt;
use std::sync::Arc;

use alloy_eips::BlockId;
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::errors::CallError;

/// Destination of a read call
///
/// Either a concrete address or a name that the provider must resolve
/// before the call can be executed or cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallTarget {
    /// A concrete contract address
    Address(Address),
    /// A name (e.g. an ENS name) that the provider resolves to an address
    Name(String),
}

impl From<Address> for CallTarget {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A read-only call against a remote node
///
/// `to` is absent for calls without a destination (e.g. deployment
/// simulation). `block` is absent when the caller wants the provider's
/// default, which nodes treat as `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Call destination
    pub to: Option<CallTarget>,
    /// ABI-encoded call payload
    pub input: Bytes,
    /// Block the call is evaluated against
    pub block: Option<BlockId>,
}

impl CallRequest {
    /// Create a call to `to` with the given payload against the default block
    pub fn new(to: impl Into<CallTarget>, input: impl Into<Bytes>) -> Self {
        Self {
            to: Some(to.into()),
            input: input.into(),
            block: None,
        }
    }

    /// Create a call with no destination
    pub fn without_target(input: impl Into<Bytes>) -> Self {
        Self {
            to: None,
            input: input.into(),
            block: None,
        }
    }

    /// Evaluate the call against a specific block
    #[must_use]
    pub fn with_block(mut self, block: impl Into<BlockId>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Set the block from an optional value
    #[must_use]
    pub fn with_block_opt(mut self, block: Option<BlockId>) -> Self {
        self.block = block;
        self
    }

    /// Returns the destination address if it is already concrete
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        match &self.to {
            Some(CallTarget::Address(address)) => Some(*address),
            _ => None,
        }
    }
}

/// Capability to execute read calls against a remote node
///
/// Implementations must be safe to share across tasks. The caching and
/// batching types in this crate implement the trait themselves, so they can
/// be used anywhere a provider is expected.
#[async_trait]
pub trait CallProvider: Send + Sync {
    /// Execute a read call, returning the raw output bytes
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError>;

    /// Resolve a call target to a concrete address
    ///
    /// Addresses resolve to themselves. The default implementation cannot
    /// resolve names.
    async fn resolve_target(&self, target: &CallTarget) -> Result<Address, CallError> {
        match target {
            CallTarget::Address(address) => Ok(*address),
            CallTarget::Name(name) => Err(CallError::UnresolvedTarget { name: name.clone() }),
        }
    }

    /// Chain id of the network the provider is connected to
    async fn chain_id(&self) -> Result<u64, CallError>;

    /// Current head block number
    async fn block_number(&self) -> Result<u64, CallError>;
}

#[async_trait]
impl<P: CallProvider + ?Sized> CallProvider for Arc<P> {
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError> {
        (**self).call(request).await
    }

    async fn resolve_target(&self, target: &CallTarget) -> Result<Address, CallError> {
        (**self).resolve_target(target).await
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        (**self).chain_id().await
    }

    async fn block_number(&self) -> Result<u64, CallError> {
        (**self).block_number().await
    }
}

#[async_trait]
impl<P: CallProvider + ?Sized> CallProvider for &P {
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError> {
        (**self).call(request).await
    }

    async fn resolve_target(&self, target: &CallTarget) -> Result<Address, CallError> {
        (**self).resolve_target(target).await
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        (**self).chain_id().await
    }

    async fn block_number(&self) -> Result<u64, CallError> {
        (**self).block_number().await
    }
}
