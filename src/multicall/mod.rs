// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Batched read calls through an on-chain aggregation contract
//!
//! [`Multicall`] combines many independent read calls into a few `eth_call`s
//! against Multicall3. It holds no cache of its own; wrap its provider in a
//! [`CachedCallProvider`](crate::CachedCallProvider) to deduplicate repeated
//! batches pinned to the same block.
//!
//! Two execution modes are available:
//!
//! - [`Multicall::all`] requires every call to succeed and reports nothing
//!   but failure otherwise
//! - [`Multicall::try_all`] reports success per call
//!
//! Both have grouped variants ([`Multicall::group_all`],
//! [`Multicall::group_try_all`]) that return results in the same nested
//! shape as their input.

mod aggregator;
mod call;
pub mod contracts;
mod registry;

pub use aggregator::Multicall;
pub use call::{AggregateOutcome, MulticallCall, TryCallResult};
pub use registry::MulticallRegistry;
