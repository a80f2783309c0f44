// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: Shared data model for the outbox request queue
//!
//! This crate provides the deferred request record ([`SyncTask`]), its
//! identifiers, the canonical query-parameter encoding, and the JSONL
//! primitives used by the durable queue stores.

pub mod error;
pub mod id;
pub mod jsonl;
pub mod params;
pub mod task;

pub use error::{Error, Result};
pub use id::{ClockSource, SystemClock, TaskId, TaskIdClock};
pub use params::QueryParams;
pub use task::{Method, SyncTask};
