// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for outbound HTTP calls.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production
//! - Mock transports for unit testing
//!
//! A transport performs exactly one attempt. Timeouts, retries and failure
//! classification are layered on top in [`super::request`].

use std::future::Future;
use std::pin::Pin;

use outbox_core::{Method, QueryParams, SyncTask};
use serde_json::Value;

/// Error type for transport operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No response was received (DNS, refused connection, reset, TLS).
    #[error("connection failed: {0}")]
    Connection(String),

    /// A response was received with a non-success status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: Value },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// An outbound mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Value,
    pub params: QueryParams,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>, body: Value, params: QueryParams) -> Self {
        Request {
            method,
            url: url.into(),
            body,
            params,
        }
    }
}

impl From<&SyncTask> for Request {
    fn from(task: &SyncTask) -> Self {
        Request {
            method: task.method,
            url: task.url.clone(),
            body: task.body.clone(),
            params: task.params.clone(),
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Decoded JSON body. Non-JSON bodies are kept as a string, empty bodies are `null`.
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Response { status, body }
    }

    /// Deserializes the body into a typed value.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.body)
    }
}

/// Transport trait for one-shot request execution.
///
/// This trait abstracts over the actual HTTP client, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Execute a single attempt of the request.
    fn execute<'a>(
        &'a self,
        request: &'a Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + 'a>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    fn execute<'a>(
        &'a self,
        request: &'a Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + 'a>> {
        Box::pin(async move {
            let builder = match request.method {
                Method::Post => self.client.post(&request.url),
                Method::Put => self.client.put(&request.url),
            };

            let builder = builder.json(&request.body);
            let builder = if request.params.is_empty() {
                builder
            } else {
                builder.query(request.params.pairs())
            };

            let http_request = builder
                .build()
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

            let response = self
                .client
                .execute(http_request)
                .await
                .map_err(|e| TransportError::Connection(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Connection(e.to_string()))?;
            let body = decode_body(&bytes);

            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(Response::new(status.as_u16(), body))
        })
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
