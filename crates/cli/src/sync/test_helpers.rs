// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use chrono::{DateTime, Duration, Utc};
use outbox_core::{Method, QueryParams, SyncTask, TaskId};
use serde_json::{json, Value};

use super::connectivity::ConnectivitySwitch;
use super::service::{SyncConfig, SyncService};
use super::store::MemoryStore;
use super::transport_tests::MockTransport;

pub type TestService = SyncService<MockTransport, MemoryStore, ConnectivitySwitch>;

/// A todo payload numbered `n`.
pub fn todo(n: u32) -> Value {
    json!({
        "id": n,
        "title": format!("Todo {n}"),
        "body": "Revolutionize the App industry",
        "userId": 2323
    })
}

/// Fixed queue time so separately built fixtures compare equal.
fn queued_at(n: u32) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::seconds(1_700_000_000 + i64::from(n))
}

/// A queued task numbered `n`, targeting `https://api.test/todos/{n}`.
pub fn make_task(n: u32) -> SyncTask {
    let mut task = SyncTask::new(
        TaskId::new(1000, n),
        Method::Post,
        format!("https://api.test/todos/{n}"),
        todo(n),
        QueryParams::new().with("n", n.to_string()),
    );
    task.queued_at = queued_at(n);
    task
}

/// A queued task numbered `n` whose body and params exercise the edges of
/// JSON and query encoding.
pub fn rich_task(n: u32) -> SyncTask {
    let scale = f64::from(n) + 1.0;
    let mut task = SyncTask::new(
        TaskId::new(2000, n),
        if n % 2 == 0 { Method::Post } else { Method::Put },
        format!("https://api.test/notes/{n}?draft=1"),
        json!({
            "ratio": 1.0715660391465826e-75 * scale,
            "tiny": -1.81996730402717e-179,
            "huge": -1.603964615428183e143 / scale,
            "third": 1.0 / 3.0,
            "max_u64": u64::MAX,
            "min_i64": i64::MIN,
            "title": format!("Café №{n} ☕ 日本語"),
            "escapes": "quote \" slash \\ newline \n tab \t",
            "nested": {
                "list": [[1, 2.5, [null, true]], {"deep": {"deeper": []}}],
                "empty": {}
            }
        }),
        QueryParams::new()
            .with("q", "a&b=c")
            .with("sum", "1+1 = 2")
            .with("pct", "100%")
            .with("name", format!("zoë {n}"))
            .with("q", "repeat"),
    );
    task.queued_at = queued_at(n);
    task
}

/// Build a service over fresh test doubles; returns handles to all of them.
pub fn make_service() -> (TestService, MockTransport, MemoryStore, ConnectivitySwitch) {
    make_service_with(SyncConfig::default())
}

pub fn make_service_with(
    config: SyncConfig,
) -> (TestService, MockTransport, MemoryStore, ConnectivitySwitch) {
    let transport = MockTransport::new();
    let store = MemoryStore::new();
    let switch = ConnectivitySwitch::new(true);
    let service = SyncService::new(config, transport.clone(), store.clone(), switch.clone());
    (service, transport, store, switch)
}

/// Tasks currently stored under the default queue key.
pub fn stored(store: &MemoryStore) -> Vec<SyncTask> {
    store
        .snapshot(super::service::DEFAULT_QUEUE_KEY)
        .unwrap_or_default()
}
