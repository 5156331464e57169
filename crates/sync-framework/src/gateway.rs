//! # Remote Call Gateway
//!
//! The seam between the sync layer and the network. A gateway performs one
//! authenticated request and either hands back the JSON payload or a classified
//! [`GatewayError`]. Transport, auth headers and timeouts all live behind this trait;
//! the sync layer imposes none of its own.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::{self, Display};
use std::sync::Arc;

/// HTTP verbs used by the uniform REST shape of every console resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A single request handed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl GatewayRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Classified failure returned by a gateway.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GatewayError {
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Performs authenticated requests against the console API.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    async fn request(&self, request: GatewayRequest) -> Result<Value, GatewayError>;
}

/// Gateway handle shared by every coordinator of a system.
pub type SharedGateway = Arc<dyn Gateway>;

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn request(&self, request: GatewayRequest) -> Result<Value, GatewayError> {
        (**self).request(request).await
    }
}
