//! Read-call caching and batching for EVM providers.
//!
//! - [`CachedCallProvider`] deduplicates `eth_call`s pinned to a block
//! - [`Multicall`] folds many read calls into a few aggregation calls

pub mod cache;
pub mod config;
pub mod errors;
pub mod multicall;
pub mod provider;
mod tracing;
pub mod transport;

pub use cache::{CacheMode, CacheRegion, CacheStats, CachedCallProvider, CallCache};
pub use config::{SemiocallConfig, SemiocallConfigBuilder};
pub use errors::{CallError, MulticallError, SemiocallError};
pub use multicall::{AggregateOutcome, Multicall, MulticallCall, MulticallRegistry, TryCallResult};
pub use provider::{CallProvider, CallRequest, CallTarget};
