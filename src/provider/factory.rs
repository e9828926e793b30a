// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Factory functions for HTTP-backed call providers

use alloy_network::Ethereum;
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_rpc_client::ClientBuilder;

use crate::errors::SemiocallError;
use crate::transport::{LoggingLayer, OutboundCounter};

use super::{AlloyCallProvider, ProviderConfig};

/// HTTP call provider over an Ethereum-typed root provider
pub type HttpCallProvider = AlloyCallProvider<RootProvider<Ethereum>, Ethereum>;

/// Create an HTTP call provider with the given configuration
///
/// # Examples
///
/// ```rust,ignore
/// use semiocall::provider::{http_call_provider, ProviderConfig};
///
/// let provider = http_call_provider(
///     ProviderConfig::new("https://eth.llamarpc.com").with_logging()
/// )?;
/// ```
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn http_call_provider(config: ProviderConfig) -> Result<HttpCallProvider, SemiocallError> {
    build(config, None)
}

/// Create an HTTP call provider that counts every outbound request
///
/// Logging is installed regardless of `config.logging_enabled`, since the
/// counter lives in the logging layer.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn http_call_provider_with_counter(
    config: ProviderConfig,
    counter: OutboundCounter,
) -> Result<HttpCallProvider, SemiocallError> {
    build(config, Some(counter))
}

fn build(
    config: ProviderConfig,
    counter: Option<OutboundCounter>,
) -> Result<HttpCallProvider, SemiocallError> {
    let url: url::Url = config
        .url
        .parse()
        .map_err(|e| SemiocallError::ProviderUrlInvalid(format!("{e}")))?;

    // Fillers are disabled to keep a RootProvider: read calls need none of them
    let provider = match (counter, config.logging_enabled) {
        (Some(counter), _) => {
            let client = ClientBuilder::default()
                .layer(LoggingLayer::new().with_counter(counter))
                .http(url);
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_client(client)
        }
        (None, true) => {
            let client = ClientBuilder::default()
                .layer(LoggingLayer::new())
                .http(url);
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_client(client)
        }
        (None, false) => ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url),
    };

    Ok(AlloyCallProvider::new(provider))
}
