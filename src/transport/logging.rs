// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for outbound RPC requests.
//!
//! The layer sits below the cache and the aggregator, so what it sees is the
//! traffic that actually leaves the process. An optional [`OutboundCounter`]
//! tallies those requests per JSON-RPC method.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument, Span};

/// Shared per-method tally of outbound JSON-RPC requests.
///
/// Clones share the same counts.
#[derive(Clone, Debug, Default)]
pub struct OutboundCounter {
    counts: Arc<Mutex<HashMap<String, u64>>>,
}

impl OutboundCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    fn counts(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, method: &str) {
        *self.counts().entry(method.to_string()).or_default() += 1;
    }

    /// Number of requests sent for `method`.
    pub fn count(&self, method: &str) -> u64 {
        self.counts().get(method).copied().unwrap_or_default()
    }

    /// Number of requests sent across all methods.
    pub fn total(&self) -> u64 {
        self.counts().values().sum()
    }

    /// Copy of the current per-method counts.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts().clone()
    }
}

/// A Tower layer that adds logging/tracing to outbound RPC requests.
///
/// # Example
///
/// ```rust,ignore
/// use semiocall::transport::{LoggingLayer, OutboundCounter};
/// use alloy_rpc_client::ClientBuilder;
///
/// let counter = OutboundCounter::new();
/// let client = ClientBuilder::default()
///     .layer(LoggingLayer::new().with_counter(counter.clone()))
///     .http(rpc_url);
///
/// // ... later
/// println!("eth_call requests sent: {}", counter.count("eth_call"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    /// Whether to log request payloads (can be verbose)
    log_requests: bool,
    /// Whether to log response payloads (can be verbose)
    log_responses: bool,
    counter: Option<OutboundCounter>,
}

impl LoggingLayer {
    /// Creates a new logging layer with default settings.
    ///
    /// By default, only timing and errors are logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables logging of request payloads.
    pub fn with_request_logging(mut self) -> Self {
        self.log_requests = true;
        self
    }

    /// Enables logging of response payloads.
    pub fn with_response_logging(mut self) -> Self {
        self.log_responses = true;
        self
    }

    /// Records every outbound request in `counter`.
    pub fn with_counter(mut self, counter: OutboundCounter) -> Self {
        self.counter = Some(counter);
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            log_requests: self.log_requests,
            log_responses: self.log_responses,
            counter: self.counter.clone(),
        }
    }
}

/// A Tower service that logs outbound RPC requests and responses.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    log_requests: bool,
    log_responses: bool,
    counter: Option<OutboundCounter>,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_requests = self.log_requests;
        let log_responses = self.log_responses;
        let mut service = self.service.clone();

        if let Some(counter) = &self.counter {
            for method in request_methods(&request) {
                counter.record(method);
            }
        }

        let method = describe(&request);

        let span = tracing::info_span!(
            "semiocall.outbound_rpc",
            method = %method,
            duration_ms = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let start = Instant::now();

                if log_requests {
                    trace!(request = ?request, "RPC request");
                } else {
                    debug!("RPC request: {method}");
                }

                let result = service.call(request).await;
                let duration = start.elapsed();

                Span::current().record("duration_ms", duration.as_millis() as u64);

                match &result {
                    Ok(response) => {
                        if log_responses {
                            trace!(
                                response = ?response,
                                duration_ms = %duration.as_millis(),
                                "RPC response"
                            );
                        } else {
                            debug!(duration_ms = %duration.as_millis(), "RPC response: {method}");
                        }
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            duration_ms = %duration.as_millis(),
                            "RPC error: {method}"
                        );
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Method names of every request in a packet.
fn request_methods(request: &RequestPacket) -> Vec<&str> {
    match request {
        RequestPacket::Single(req) => vec![req.method()],
        RequestPacket::Batch(reqs) => reqs.iter().map(|req| req.method()).collect(),
    }
}

/// Short description of a packet for log lines.
fn describe(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [single] => single.method().to_string(),
            _ => format!("batch({} calls)", reqs.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_layer_default() {
        let layer = LoggingLayer::new();
        assert!(!layer.log_requests);
        assert!(!layer.log_responses);
        assert!(layer.counter.is_none());
    }

    #[test]
    fn test_logging_layer_with_counter_shares_counts() {
        let counter = OutboundCounter::new();
        let layer = LoggingLayer::new().with_counter(counter.clone());

        layer.counter.as_ref().unwrap().record("eth_call");
        layer.counter.as_ref().unwrap().record("eth_call");
        layer.counter.as_ref().unwrap().record("eth_chainId");

        assert_eq!(counter.count("eth_call"), 2);
        assert_eq!(counter.count("eth_chainId"), 1);
        assert_eq!(counter.count("eth_blockNumber"), 0);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_counter_snapshot() {
        let counter = OutboundCounter::new();
        counter.record("eth_call");

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["eth_call"], 1);
    }

    #[test]
    fn test_counter_keeps_counting_after_panic() {
        let counter = OutboundCounter::new();
        counter.record("eth_call");

        let poisoner = counter.clone();
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.counts.lock().unwrap();
            panic!("panicked while holding the counter");
        })
        .join();
        assert!(joined.is_err());
        assert!(counter.counts.is_poisoned());

        counter.record("eth_call");
        assert_eq!(counter.count("eth_call"), 2);
        assert_eq!(counter.total(), 2);
        assert_eq!(counter.snapshot()["eth_call"], 2);
    }
}
