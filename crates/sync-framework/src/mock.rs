//! # Mock Gateway & Testing Guide
//!
//! `MockGateway` implements [`Gateway`] entirely in memory. Tests script the
//! responses the backend should give, run real actors, coordinators and debouncers
//! against it, and afterwards inspect which requests went out.
//!
//! ## Scripting responses
//!
//! Expectations are consumed strictly in order. Each names the method and path it
//! expects; a request that does not match the head of the queue fails with a
//! [`GatewayError::Transport`] and is remembered, so [`MockGateway::verify`] panics
//! on it later.
//!
//! ```rust
//! use serde_json::json;
//! use sync_framework::mock::MockGateway;
//! use sync_framework::{GatewayRequest, Gateway, Method};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockGateway::new();
//!     mock.expect(Method::Get, "/classes").return_ok(json!([{ "id": "c-1" }]));
//!
//!     let reply = mock.request(GatewayRequest::get("/classes")).await.unwrap();
//!     assert_eq!(reply, json!([{ "id": "c-1" }]));
//!     mock.verify();
//! }
//! ```
//!
//! ## Controlling completion order
//!
//! [`ExpectationBuilder::defer`] hands back a [`Responder`]. The matching request
//! stays pending until the test answers it, which lets a test complete two fetches
//! in the opposite order from the one they were issued in.
//!
//! ```rust
//! use serde_json::json;
//! use sync_framework::mock::MockGateway;
//! use sync_framework::{GatewayRequest, Gateway, Method};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockGateway::new();
//!     let responder = mock.expect(Method::Get, "/roles").defer();
//!
//!     let gateway = mock.clone();
//!     let pending = tokio::spawn(async move {
//!         gateway.request(GatewayRequest::get("/roles")).await
//!     });
//!
//!     mock.wait_for_requests(1).await;
//!     responder.respond_ok(json!([]));
//!     assert_eq!(pending.await.unwrap().unwrap(), json!([]));
//! }
//! ```

use crate::gateway::{Gateway, GatewayError, GatewayRequest, Method, SharedGateway};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, Notify};

type Reply = Result<Value, GatewayError>;

enum Response {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// One scripted request.
struct Expectation {
    method: Method,
    path: String,
    response: Response,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    requests: Vec<GatewayRequest>,
    unexpected: Vec<String>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<MockState>,
    notify: Notify,
}

/// In-memory [`Gateway`] with scripted responses and a request log.
#[derive(Clone, Default)]
pub struct MockGateway {
    shared: Arc<Shared>,
}

impl MockGateway {
    /// Creates a mock gateway with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same mock behind the type coordinators take.
    pub fn shared(&self) -> SharedGateway {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Expects a request with `method` on `path`.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            shared: self.shared.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.lock().requests.clone()
    }

    /// Waits until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            let notified = self.shared.notify.notified();
            if self.lock().requests.len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                remaining
            );
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn request(&self, request: GatewayRequest) -> Result<Value, GatewayError> {
        let label = format!("{} {}", request.method, request.path);
        let response = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            let next = state.expectations.pop_front();
            match next {
                Some(exp) if exp.method == request.method && exp.path == request.path => {
                    Some(exp.response)
                }
                Some(exp) => {
                    state.unexpected.push(format!(
                        "{label} (expected {} {})",
                        exp.method, exp.path
                    ));
                    None
                }
                None => {
                    state.unexpected.push(label.clone());
                    None
                }
            }
        };
        self.shared.notify.notify_waiters();

        match response {
            Some(Response::Ready(reply)) => reply,
            Some(Response::Deferred(receiver)) => receiver.await.unwrap_or_else(|_| {
                Err(GatewayError::Transport(format!(
                    "responder for {label} dropped"
                )))
            }),
            None => Err(GatewayError::Transport(format!(
                "unexpected request {label}"
            ))),
        }
    }
}

/// Builder for one expectation; consumed by one of the `return_*` calls or `defer`.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    shared: Arc<Shared>,
}

impl ExpectationBuilder {
    fn push(self, response: Response) {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            method: self.method,
            path: self.path,
            response,
        });
    }

    /// Sets the expectation to return a successful payload.
    pub fn return_ok(self, value: Value) {
        self.push(Response::Ready(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: GatewayError) {
        self.push(Response::Ready(Err(error)));
    }

    /// Leaves the matching request pending until the returned responder answers it.
    pub fn defer(self) -> Responder {
        let (sender, receiver) = oneshot::channel();
        self.push(Response::Deferred(receiver));
        Responder { sender }
    }
}

/// Answers a deferred request.
pub struct Responder {
    sender: oneshot::Sender<Reply>,
}

impl Responder {
    pub fn respond_ok(self, value: Value) {
        let _ = self.sender.send(Ok(value));
    }

    pub fn respond_err(self, error: GatewayError) {
        let _ = self.sender.send(Err(error));
    }
}
