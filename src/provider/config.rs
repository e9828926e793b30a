// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider configuration options

/// Configuration for creating HTTP call providers
///
/// # Example
///
/// ```rust
/// use semiocall::provider::ProviderConfig;
///
/// let config = ProviderConfig::new("https://eth.llamarpc.com").with_logging();
/// assert!(config.logging_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Whether outbound requests are logged via `tracing`
    pub logging_enabled: bool,
}

impl ProviderConfig {
    /// Create a new provider configuration with the specified URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            logging_enabled: false,
        }
    }

    /// Log every outbound request
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.logging_enabled = true;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
