// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for Alloy providers.
//!
//! The caching and batching layers exist to reduce outbound traffic. The
//! [`LoggingLayer`] is installed on the RPC client underneath them and makes
//! that traffic visible: each request is logged and, optionally, counted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use semiocall::transport::{LoggingLayer, OutboundCounter};
//! use alloy_rpc_client::ClientBuilder;
//! use alloy_provider::ProviderBuilder;
//!
//! let counter = OutboundCounter::new();
//! let client = ClientBuilder::default()
//!     .layer(LoggingLayer::new().with_counter(counter.clone()))
//!     .http(rpc_url);
//!
//! let provider = ProviderBuilder::new().connect_client(client);
//! ```

mod logging;

pub use logging::{LoggingLayer, LoggingService, OutboundCounter};
