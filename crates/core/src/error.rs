// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid task id: {0}")]
    InvalidTaskId(String),

    #[error("invalid method: '{0}'\n  hint: valid methods are: post, put")]
    InvalidMethod(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
