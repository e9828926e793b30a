// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by remote call providers.
//!
//! A cached call hands the same outcome to every waiter sharing its key, so
//! [`CallError`] is `Clone`: the underlying provider error is kept behind an
//! [`Arc`] rather than a `Box`.

use std::sync::Arc;

/// Errors that can occur while executing a read call against a provider.
///
/// # Examples
///
/// ```rust
/// use semiocall::CallError;
///
/// let error = CallError::UnresolvedTarget {
///     name: "vitalik.eth".to_string(),
/// };
/// assert_eq!(error.to_string(), "Cannot resolve call target: vitalik.eth");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
    /// The upstream provider failed to execute an operation.
    ///
    /// Covers network errors, node-side errors and reverted calls. When the
    /// call was cached, every caller sharing the key receives a clone of this
    /// error until the entry is evicted or cleared.
    #[error("Upstream provider failed during {operation}")]
    Upstream {
        /// Description of the operation that failed (e.g., "eth_call")
        operation: String,
        /// The underlying provider error
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A named call target could not be resolved to an address.
    #[error("Cannot resolve call target: {name}")]
    UnresolvedTarget {
        /// The name that failed to resolve
        name: String,
    },
}

impl CallError {
    /// Helper to create an `Upstream` error from any error type.
    pub fn upstream(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CallError::Upstream {
            operation: operation.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true if the error came from the upstream provider.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
