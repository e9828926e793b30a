// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for semiocall integration tests
//!
//! Provides a mock call provider so caching and batching can be tested
//! without a real node.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use semiocall::multicall::contracts::IMulticall3;
use semiocall::{CallError, CallProvider, CallRequest};

type Response = Result<Bytes, String>;

/// Mock CallProvider that counts calls and answers from a table
///
/// Responses are keyed by (target, calldata). When an aggregation address is
/// set, calls to it are decoded as Multicall3 `aggregate`/`tryAggregate` and
/// answered per inner call, the way the contract would:
///
/// - `aggregate` reverts if any inner call fails
/// - `tryAggregate(false, ..)` reports each inner call's success
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockCallProvider::new(1)
///     .with_response(token, calldata, uint(42))
///     .with_failure(other, calldata, "execution reverted")
///     .with_delay(Duration::from_millis(20));
/// ```
pub struct MockCallProvider {
    chain_id: u64,
    responses: HashMap<(Address, Bytes), Response>,
    aggregator: Option<Address>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    chain_id_calls: AtomicUsize,
    requests: Mutex<Vec<CallRequest>>,
}

impl MockCallProvider {
    /// Create a mock reporting `chain_id` with no responses
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            responses: HashMap::new(),
            aggregator: None,
            delay: None,
            calls: AtomicUsize::new(0),
            chain_id_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer calls to `target` with `input` by returning `output`
    pub fn with_response(
        mut self,
        target: Address,
        input: impl Into<Bytes>,
        output: impl Into<Bytes>,
    ) -> Self {
        self.responses
            .insert((target, input.into()), Ok(output.into()));
        self
    }

    /// Answer calls to `target` with `input` by failing
    pub fn with_failure(mut self, target: Address, input: impl Into<Bytes>, message: &str) -> Self {
        self.responses
            .insert((target, input.into()), Err(message.to_string()));
        self
    }

    /// Emulate Multicall3 at `address`
    pub fn with_aggregator(mut self, address: Address) -> Self {
        self.aggregator = Some(address);
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `call` invocations that reached this provider
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `chain_id` invocations that reached this provider
    pub fn chain_id_count(&self) -> usize {
        self.chain_id_calls.load(Ordering::SeqCst)
    }

    /// Every request received, in arrival order
    pub fn requests(&self) -> Vec<CallRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, target: Address, input: &Bytes) -> Response {
        self.responses
            .get(&(target, input.clone()))
            .cloned()
            .unwrap_or_else(|| Err(format!("no response for {target}")))
    }

    fn aggregate(&self, input: &[u8]) -> Response {
        if let Ok(call) = IMulticall3::aggregateCall::abi_decode(input) {
            let mut return_data = Vec::with_capacity(call.calls.len());
            for inner in &call.calls {
                return_data.push(self.lookup(inner.target, &inner.callData)?);
            }
            let output = IMulticall3::aggregateCall::abi_encode_returns(&IMulticall3::aggregateReturn {
                blockNumber: U256::from(1u64),
                returnData: return_data,
            });
            return Ok(output.into());
        }

        if let Ok(call) = IMulticall3::tryAggregateCall::abi_decode(input) {
            let results: Vec<IMulticall3::Result> = call
                .calls
                .iter()
                .map(|inner| match self.lookup(inner.target, &inner.callData) {
                    Ok(data) => IMulticall3::Result {
                        success: true,
                        returnData: data,
                    },
                    Err(_) => IMulticall3::Result {
                        success: false,
                        returnData: Bytes::new(),
                    },
                })
                .collect();
            return Ok(IMulticall3::tryAggregateCall::abi_encode_returns(&results).into());
        }

        Err("unknown aggregation selector".to_string())
    }
}

#[async_trait]
impl CallProvider for MockCallProvider {
    async fn call(&self, request: CallRequest) -> Result<Bytes, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let target = request.address().ok_or_else(|| {
            CallError::upstream("eth_call", std::io::Error::other("missing target"))
        })?;

        let response = match self.aggregator {
            Some(aggregator) if aggregator == target => self.aggregate(&request.input),
            _ => self.lookup(target, &request.input),
        };

        response.map_err(|message| CallError::upstream("eth_call", std::io::Error::other(message)))
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64, CallError> {
        Ok(100)
    }
}

/// ABI-encode a uint256 return value
pub fn uint(value: u64) -> Bytes {
    U256::from(value).abi_encode().into()
}

/// Address whose last byte is `n`
pub fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::from(bytes)
}

/// Initialize a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
