// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for batched call execution.

use super::CallError;

/// Errors that can occur while batching calls through an aggregation contract.
///
/// Configuration errors ([`MulticallError::UnsupportedChain`],
/// [`MulticallError::NotInitialized`]) are fatal and never retried.
/// [`MulticallError::Decode`] means the declared output shape does not match
/// what the target returned; it is a caller-side contract mismatch, not a
/// network condition.
///
/// Upstream failures of the aggregation call itself are not errors here:
/// `all` reports them as an unsuccessful outcome and `try_all` as per-call
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum MulticallError {
    /// No aggregation contract is registered for this chain.
    #[error("Unsupported chain id: {chain_id}")]
    UnsupportedChain {
        /// The chain id that has no registered aggregation address
        chain_id: u64,
    },

    /// The aggregator was used before its chain id was resolved.
    ///
    /// Construct it with a chain id or call `init()` first.
    #[error("Multicall aggregator is not initialized; call init() first")]
    NotInitialized,

    /// The requested chunk size is not usable.
    #[error("Invalid batch size: {reason}")]
    InvalidBatchSize {
        /// Why the batch size was rejected
        reason: String,
    },

    /// A call description could not be built from its signature or output shape.
    #[error("Invalid call signature: {reason}")]
    InvalidSignature {
        /// Why the signature was rejected
        reason: String,
    },

    /// Return data did not match the declared output shape.
    #[error("Failed to decode output of call {index}")]
    Decode {
        /// Position of the call in the flattened batch
        index: usize,
        /// The underlying ABI decoding error
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// The provider failed while resolving the network identity during `init()`.
    #[error("Provider call failed: {0}")]
    Call(#[from] CallError),
}

impl MulticallError {
    /// Helper to create an `InvalidBatchSize` error.
    pub fn invalid_batch_size(reason: impl Into<String>) -> Self {
        MulticallError::InvalidBatchSize {
            reason: reason.into(),
        }
    }

    /// Helper to create an `InvalidSignature` error.
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        MulticallError::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnsupportedChain { .. } | Self::NotInitialized)
    }
}
