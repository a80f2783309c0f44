// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded request execution.
//!
//! Wraps a [`Transport`] with a per-attempt timeout and a fixed number of
//! retries, then classifies the terminal failure as either recoverable
//! (worth queueing) or a backend rejection (worth reporting).

use std::time::Duration;

use serde_json::Value;

use super::connectivity::Connectivity;
use super::transport::{Request, Response, Transport, TransportError};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);
/// Default number of additional attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Timeout and retry budget for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Hard limit for each attempt.
    pub timeout: Duration,
    /// Additional attempts after the first; total attempts = 1 + max_retries.
    pub max_retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Why a failure is considered local rather than the backend's fault.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecoverableCause {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("offline")]
    Offline,
}

/// A response (or request) the backend side refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    /// HTTP status, if a response was received.
    pub status: Option<u16>,
    pub message: String,
    /// Response body, `null` if there was none.
    pub body: Value,
}

/// Terminal failure of a request after all attempts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifiedError {
    #[error("recoverable failure: {0}")]
    Recoverable(RecoverableCause),

    #[error("backend error: {0}")]
    Backend(BackendError),
}

impl ClassifiedError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClassifiedError::Recoverable(_))
    }
}

/// Outcome of a single attempt that did not succeed.
#[derive(Debug)]
enum AttemptFailure {
    Timeout,
    Transport(TransportError),
}

/// Sends `request` with the policy's timeout and retry budget.
///
/// Every failure is retried, including timeouts and error statuses. Only
/// the last failure is classified.
pub async fn send<T, C>(
    transport: &T,
    connectivity: &C,
    request: &Request,
    policy: &RetryPolicy,
) -> Result<Response, ClassifiedError>
where
    T: Transport + ?Sized,
    C: Connectivity + ?Sized,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let failure =
            match tokio::time::timeout(policy.timeout, transport.execute(request)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => AttemptFailure::Transport(e),
                Err(_) => AttemptFailure::Timeout,
            };

        if attempt >= attempts {
            return Err(classify(failure, connectivity));
        }

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            attempt,
            attempts,
            failure = ?failure,
            "request attempt failed, retrying"
        );

        if !policy.retry_delay.is_zero() {
            tokio::time::sleep(policy.retry_delay).await;
        }
    }
}

/// Order: timeout, connection fault, oracle offline, then backend.
fn classify<C: Connectivity + ?Sized>(failure: AttemptFailure, connectivity: &C) -> ClassifiedError {
    let error = match failure {
        AttemptFailure::Timeout => return ClassifiedError::Recoverable(RecoverableCause::Timeout),
        AttemptFailure::Transport(TransportError::Connection(msg)) => {
            return ClassifiedError::Recoverable(RecoverableCause::Connection(msg))
        }
        AttemptFailure::Transport(e) => e,
    };

    if !connectivity.is_online() {
        return ClassifiedError::Recoverable(RecoverableCause::Offline);
    }

    let message = error.to_string();
    match error {
        TransportError::Status { status, body } => ClassifiedError::Backend(BackendError {
            status: Some(status),
            message,
            body,
        }),
        _ => ClassifiedError::Backend(BackendError {
            status: None,
            message,
            body: Value::Null,
        }),
    }
}
