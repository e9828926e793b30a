// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the semiocall library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`CallError`],
//!   [`MulticallError`])
//! - **Unified error type** ([`SemiocallError`]) for convenience when you don't
//!   need to distinguish between error sources
//!
//! # Examples
//!
//! ```rust,ignore
//! use semiocall::{Multicall, MulticallError};
//!
//! match Multicall::new(provider).with_chain_id(424242) {
//!     Ok(multicall) => { /* ... */ }
//!     Err(MulticallError::UnsupportedChain { chain_id }) => {
//!         eprintln!("No Multicall3 deployment known for chain {chain_id}");
//!     }
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```

mod call;
mod multicall;

pub use call::CallError;
pub use multicall::MulticallError;

/// Unified error type for all semiocall operations.
///
/// Module-specific errors convert into `SemiocallError` via `From`, so `?`
/// works across both the caching and the batching APIs.
#[derive(Debug, thiserror::Error)]
pub enum SemiocallError {
    /// Error from a (possibly cached) provider call.
    #[error("Call error: {0}")]
    Call(#[from] CallError),

    /// Error from batched call execution.
    #[error("Multicall error: {0}")]
    Multicall(#[from] MulticallError),

    /// The provider could not be constructed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),
}
