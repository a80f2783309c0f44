// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred write requests.
//!
//! A [`SyncTask`] records everything needed to resend one mutation after
//! connectivity returns. Tasks are identified by their [`TaskId`], never
//! by comparing payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::TaskId;
use crate::params::QueryParams;

/// HTTP verb of a queued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "post",
            Method::Put => "put",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// One durably queued request awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTask {
    /// Identifier used to remove the task once it has been replayed.
    pub id: TaskId,
    pub method: Method,
    /// Destination URL, stored verbatim.
    pub url: String,
    /// Request payload.
    pub body: Value,
    #[serde(default)]
    pub params: QueryParams,
    /// When the request was deferred.
    pub queued_at: DateTime<Utc>,
}

impl SyncTask {
    /// Creates a task queued now.
    pub fn new(
        id: TaskId,
        method: Method,
        url: impl Into<String>,
        body: Value,
        params: QueryParams,
    ) -> Self {
        SyncTask {
            id,
            method,
            url: url.into(),
            body,
            params,
            queued_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
