// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain id → aggregation contract registry
//!
//! The registry is read on every aggregator construction and `init()`, and
//! written only through explicit registration. Registration merges into the
//! existing entries; a later registration for the same chain id replaces the
//! earlier one.
//!
//! # Examples
//!
//! ```rust
//! use alloy_primitives::address;
//! use semiocall::multicall::MulticallRegistry;
//!
//! let registry = MulticallRegistry::new();
//! registry.register(31337, address!("5fbdb2315678afecb367f032d93f642f64180aa3"));
//!
//! assert!(registry.get(31337).is_some());
//! assert!(registry.resolve(1).is_err());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use tracing::debug;

use crate::config::constants::MULTICALL3_ADDRESS;
use crate::errors::MulticallError;

static GLOBAL: LazyLock<Arc<MulticallRegistry>> =
    LazyLock::new(|| Arc::new(MulticallRegistry::with_defaults()));

/// Chains where Multicall3 is deployed at [`MULTICALL3_ADDRESS`]
const MULTICALL3_CHAINS: &[NamedChain] = &[
    NamedChain::Mainnet,
    NamedChain::Sepolia,
    NamedChain::Holesky,
    NamedChain::Optimism,
    NamedChain::OptimismSepolia,
    NamedChain::Base,
    NamedChain::BaseSepolia,
    NamedChain::Arbitrum,
    NamedChain::ArbitrumSepolia,
    NamedChain::ArbitrumNova,
    NamedChain::Polygon,
    NamedChain::PolygonAmoy,
    NamedChain::BinanceSmartChain,
    NamedChain::Avalanche,
    NamedChain::Gnosis,
    NamedChain::Linea,
    NamedChain::Scroll,
    NamedChain::Blast,
    NamedChain::Mode,
    NamedChain::Fraxtal,
    NamedChain::Zora,
    NamedChain::Sonic,
];

/// Thread-safe mapping from chain id to aggregation contract address
#[derive(Debug, Default)]
pub struct MulticallRegistry {
    entries: RwLock<HashMap<u64, Address>>,
}

impl MulticallRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the canonical Multicall3
    /// deployment on well-known chains
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_all(
            MULTICALL3_CHAINS
                .iter()
                .map(|chain| (u64::from(*chain), MULTICALL3_ADDRESS)),
        );
        registry
    }

    /// The default process-wide registry
    pub fn global() -> Arc<MulticallRegistry> {
        GLOBAL.clone()
    }

    /// Register the aggregation contract for a chain, replacing any previous entry
    pub fn register(&self, chain_id: u64, address: Address) {
        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain_id, address);

        debug!(
            chain_id = chain_id,
            address = %address,
            replaced = previous.is_some(),
            "Registered aggregation contract"
        );
    }

    /// Register many entries at once
    pub fn register_all(&self, entries: impl IntoIterator<Item = (u64, Address)>) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.extend(entries);

        debug!(
            added = guard.len() - before,
            total = guard.len(),
            "Registered aggregation contracts"
        );
    }

    /// Look up the aggregation contract for a chain
    pub fn get(&self, chain_id: u64) -> Option<Address> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain_id)
            .copied()
    }

    /// Look up the aggregation contract for a chain, failing if none is registered
    pub fn resolve(&self, chain_id: u64) -> Result<Address, MulticallError> {
        self.get(chain_id)
            .ok_or(MulticallError::UnsupportedChain { chain_id })
    }

    /// Returns true if the chain has a registered aggregation contract
    pub fn contains(&self, chain_id: u64) -> bool {
        self.get(chain_id).is_some()
    }

    /// All registered chain ids in ascending order
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered chains
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no chain is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
