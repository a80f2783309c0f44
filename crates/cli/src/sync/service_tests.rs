// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for try_post / try_put.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::request::RetryPolicy;
use super::service::{RequestOutcome, SyncConfig, SyncError};
use super::test_helpers::{make_service, make_service_with, stored, todo};
use super::transport::{Request, Response};
use super::transport_tests::MockReply;
use outbox_core::{Method, QueryParams, TaskId};
use serde_json::json;
use std::collections::HashMap;
use yare::parameterized;

#[parameterized(
    object = { json!({"id": 23, "title": "Make an awesome app"}) },
    array = { json!([1, 2, 3]) },
    string = { json!("plain") },
    null = { json!(null) },
)]
#[test_macro(tokio::test)]
async fn test_post_applied_when_transport_succeeds(payload: serde_json::Value) {
    let (service, transport, store, _) = make_service();
    let response = Response::new(201, json!({"id": 101}));
    transport.set_default(MockReply::Ok(response.clone()));

    let outcome = service
        .try_post("https://api.test/todos", &payload, QueryParams::new())
        .await
        .unwrap();

    assert_eq!(outcome, RequestOutcome::Applied(response));
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.requests()[0].body, payload);
    assert!(stored(&store).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_post_deferred_on_timeout() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Hang);
    let params = QueryParams::new().with("userId", "2323");

    let outcome = service
        .try_post("https://api.test/todos", &todo(23), params.clone())
        .await
        .unwrap();

    let tasks = stored(&store);
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(outcome, RequestOutcome::Deferred(task.id));
    assert_eq!(task.url, "https://api.test/todos");
    assert_eq!(task.body, todo(23));
    assert_eq!(task.params, params);
    assert_eq!(task.method, Method::Post);
    assert_eq!(serde_json::to_value(task).unwrap()["params"], "userId=2323");
}

#[tokio::test]
async fn test_put_deferred_on_connection_fault() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Connection);

    let outcome = service
        .try_put("https://api.test/todos/1", &json!({"done": true}), QueryParams::new())
        .await
        .unwrap();

    assert!(outcome.is_deferred());
    let tasks = stored(&store);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].method, Method::Put);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_deferred_task_is_appended_at_end() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Connection);

    service
        .try_post("https://api.test/first", &todo(1), QueryParams::new())
        .await
        .unwrap();
    service
        .try_post("https://api.test/second", &todo(2), QueryParams::new())
        .await
        .unwrap();

    let urls: Vec<_> = stored(&store).into_iter().map(|t| t.url).collect();
    assert_eq!(urls, vec!["https://api.test/first", "https://api.test/second"]);
}

#[tokio::test]
async fn test_identical_failed_calls_are_not_deduplicated() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Connection);

    let a = service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();
    let b = service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();

    let tasks = stored(&store);
    assert_eq!(tasks.len(), 2);
    assert_ne!(tasks[0].id, tasks[1].id);
    assert!(tasks[0].id < tasks[1].id);
    assert_eq!(a, RequestOutcome::Deferred(tasks[0].id));
    assert_eq!(b, RequestOutcome::Deferred(tasks[1].id));
}

#[tokio::test]
async fn test_backend_error_is_rejected_not_queued() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Status(400));

    let outcome = service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();

    match outcome {
        RequestOutcome::Rejected(err) => assert_eq!(err.status, Some(400)),
        other => unreachable!("expected rejection, got {other:?}"),
    }
    assert!(stored(&store).is_empty());
}

#[tokio::test]
async fn test_backend_error_while_offline_is_deferred() {
    let (service, transport, store, switch) = make_service();
    transport.set_default(MockReply::Status(503));
    switch.set_online(false);

    let outcome = service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();

    assert!(outcome.is_deferred());
    assert_eq!(stored(&store).len(), 1);
}

#[tokio::test]
async fn test_offline_oracle_still_attempts_transport() {
    let (service, transport, store, switch) = make_service();
    switch.set_online(false);

    let outcome = service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();

    assert!(outcome.is_applied());
    assert_eq!(transport.calls(), 1);
    assert!(stored(&store).is_empty());
}

#[tokio::test]
async fn test_shared_request_executes_once() {
    let (service, transport, _, _) = make_service();

    let request = service.try_post("https://api.test/todos", &todo(1), QueryParams::new());
    let observer = request.clone();
    let (first, second) = tokio::join!(request, observer);

    assert_eq!(transport.calls(), 1);
    assert_eq!(first.unwrap(), second.unwrap());
}

#[tokio::test]
async fn test_shared_request_defers_once() {
    let (service, transport, store, _) = make_service();
    transport.set_default(MockReply::Connection);

    let request = service.try_post("https://api.test/todos", &todo(1), QueryParams::new());
    let observers = vec![request.clone(), request.clone(), request];
    let outcomes = futures_util::future::join_all(observers).await;

    assert_eq!(transport.calls(), 3);
    assert_eq!(stored(&store).len(), 1);
    let id = stored(&store)[0].id;
    for outcome in outcomes {
        assert_eq!(outcome.unwrap(), RequestOutcome::Deferred(id));
    }
}

#[tokio::test]
async fn test_request_is_lazy() {
    let (service, transport, _, _) = make_service();

    let request = service.try_post("https://api.test/todos", &todo(1), QueryParams::new());
    assert_eq!(transport.calls(), 0);

    drop(request);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_unserializable_payload_is_an_error() {
    let (service, transport, store, _) = make_service();
    // JSON object keys must be strings.
    let mut payload = HashMap::new();
    payload.insert((1, 2), "tuple key");

    let result = service
        .try_post("https://api.test/todos", &payload, QueryParams::new())
        .await;

    assert!(matches!(result, Err(SyncError::Payload(_))));
    assert_eq!(transport.calls(), 0);
    assert!(stored(&store).is_empty());
}

#[tokio::test]
async fn test_enqueue_continues_after_stored_ids() {
    let (service, _, store, _) = make_service();
    let future_id = TaskId::new(u64::MAX / 2, 5);
    let mut existing = super::test_helpers::make_task(1);
    existing.id = future_id;
    super::store::QueueStore::set(&store, super::service::DEFAULT_QUEUE_KEY, &[existing])
        .await
        .unwrap();

    let request = Request::new(Method::Post, "https://api.test/x", json!({}), QueryParams::new());
    let id = service.enqueue(request).await.unwrap();

    assert_eq!(id, TaskId::new(u64::MAX / 2, 6));
    assert_eq!(service.pending_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_custom_queue_key() {
    let config = SyncConfig {
        queue_key: "pendingTodos".to_string(),
        retry: RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        },
        ..SyncConfig::default()
    };
    let (service, transport, store, _) = make_service_with(config);
    transport.set_default(MockReply::Connection);

    service
        .try_post("https://api.test/todos", &todo(1), QueryParams::new())
        .await
        .unwrap();

    assert_eq!(transport.calls(), 1);
    assert!(stored(&store).is_empty());
    assert_eq!(store.snapshot("pendingTodos").unwrap().len(), 1);
}
