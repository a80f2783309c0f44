// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{BackendError, StoreError, SyncError};

/// All possible errors that can occur in the outbox CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("queue store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rejected: {}", describe_rejection(.0))]
    Rejected(BackendError),

    #[error("{failed} queued request(s) failed to replay\n  hint: failed requests stay queued; run 'outbox sync' again once the backend recovers")]
    ReplayFailed { failed: usize },

    #[error("the queue in {0} is being replayed by another process\n  hint: is 'outbox watch' running? stop it first, or use a different --state-dir")]
    WatcherRunning(String),

    #[error("no state directory could be determined\n  hint: pass --state-dir or set OUTBOX_STATE_DIR")]
    NoStateDir,
}

fn describe_rejection(err: &BackendError) -> String {
    if err.body.is_null() {
        err.to_string()
    } else {
        format!("{err}: {}", err.body)
    }
}

/// A specialized Result type for outbox operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
