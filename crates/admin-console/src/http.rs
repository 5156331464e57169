//! # HTTP Gateway
//!
//! [`Gateway`] implementation over `reqwest`. Every request carries the bearer
//! token (when configured) and the configured timeout; responses are classified
//! into [`GatewayError`] variants so callers can tell an expired session from a
//! validation failure.

use crate::config::ApiConfig;
use crate::error::ConsoleError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretBox};
use serde_json::Value;
use sync_framework::{Gateway, GatewayError, GatewayRequest, Method};
use tracing::{debug, warn};

/// Talks to the console REST API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<SecretBox<String>>,
}

impl HttpGateway {
    pub fn new(api: &ApiConfig) -> Result<Self, ConsoleError> {
        let client = Client::builder()
            .timeout(api.timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: api.token().map(|t| SecretBox::new(Box::new(t.to_string()))),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn request(&self, request: GatewayRequest) -> Result<Value, GatewayError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = self.url(&request.path);
        debug!(method = %request.method, %url, query = ?request.query, "HTTP request");

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "HTTP response");

        classify(status, &body).inspect_err(|e| warn!(%url, error = %e, "HTTP request failed"))
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport(format!("request timed out: {e}"))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Maps a status and raw body to the gateway result.
fn classify(status: StatusCode, body: &str) -> Result<Value, GatewayError> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()));
    }

    let message = error_message(status, body);
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        _ => GatewayError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

// Prefer the API's own `message`, then the raw body, then the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('<')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        })
}
