// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resilient write-request queue.
//!
//! Proxies POST/PUT requests, defers the ones that cannot reach their
//! destination into a durable queue, and replays the queue in order once
//! connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Service   │────►│   request   │────►│  Transport  │
//! │(SyncService)│◄────│(retry+class)│◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌──────────────┐
//! │ QueueStore  │     │ Connectivity │
//! │   (trait)   │     │   (trait)    │
//! └─────────────┘     └──────────────┘
//! ```
//!
//! # Features
//!
//! - Per-attempt timeout with a fixed retry budget
//! - Recoverable vs backend failure classification
//! - Explicit `Applied` / `Deferred` / `Rejected` outcomes
//! - Shared in-flight execution for cloned request handles
//! - Ordered replay with per-task removal and persistence
//! - Injectable transport, store and connectivity traits for testing

mod connectivity;
mod replay;
mod request;
mod service;
mod store;
mod transport;
mod watch;

pub use connectivity::{Connectivity, ConnectivitySwitch, TcpProbe};
pub use replay::ReplayReport;
pub use request::{
    send, BackendError, ClassifiedError, RecoverableCause, RetryPolicy, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT,
};
pub use service::{
    PendingRequest, ReplayPolicy, RequestOutcome, SyncConfig, SyncError, SyncResult, SyncService,
    DEFAULT_QUEUE_KEY,
};
pub use store::{JsonlStore, MemoryStore, QueueStore, SqliteStore, StoreError, StoreResult};
pub use transport::{HttpTransport, Request, Response, Transport, TransportError};
pub use watch::{replay_on_reconnect, DEFAULT_RECONNECT_DELAY};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod connectivity_tests;




#[cfg(test)]
mod service_tests;
