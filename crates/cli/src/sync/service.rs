// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync service: the write-request proxy.
//!
//! Provides a high-level interface for:
//! - Sending POST/PUT requests with timeout and retry
//! - Deferring requests that fail for connectivity reasons into the queue
//! - Reporting backend rejections to the caller
//! - Replaying the queue once connectivity returns (see [`super::replay`])

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use outbox_core::{Method, QueryParams, SyncTask, TaskId, TaskIdClock};
use serde::{Deserialize, Serialize};

use super::connectivity::Connectivity;
use super::request::{self, BackendError, ClassifiedError, RetryPolicy};
use super::store::{QueueStore, StoreError};
use super::transport::{Request, Response, Transport};

/// Default storage key of the pending-request queue.
pub const DEFAULT_QUEUE_KEY: &str = "pending_requests";

/// What a replay pass does when a task fails terminally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// End the pass at the first failure. The failed task and everything
    /// after it stay queued.
    #[default]
    StopOnFailure,
    /// Keep the failed task queued and continue with the next one.
    SkipFailed,
}

/// Configuration for the sync service.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Storage key of the queue.
    pub queue_key: String,
    /// Timeout and retry budget, shared by live requests and replay.
    pub retry: RetryPolicy,
    pub replay_policy: ReplayPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
            retry: RetryPolicy::default(),
            replay_policy: ReplayPolicy::default(),
        }
    }
}

/// Error type for sync service operations.
///
/// `Clone` so a shared in-flight request can hand the same error to every
/// observer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// Queue store error.
    #[error("queue store error: {0}")]
    Store(Arc<StoreError>),

    /// Payload could not be converted to JSON.
    #[error("payload is not serializable: {0}")]
    Payload(Arc<serde_json::Error>),

    /// A queued task failed during replay.
    #[error("replay of task {task_id} failed: {source}")]
    Replay {
        task_id: TaskId,
        source: ClassifiedError,
    },

    /// Another replay pass is still running.
    #[error("a replay is already in progress")]
    ReplayInProgress,
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(Arc::new(e))
    }
}

/// Result type for sync service operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Resolution of a proxied write request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The request reached the backend and succeeded.
    Applied(Response),
    /// The request could not reach the backend and was queued for replay.
    Deferred(TaskId),
    /// The backend refused the request. Nothing was queued.
    Rejected(BackendError),
}

impl RequestOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RequestOutcome::Applied(_))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, RequestOutcome::Deferred(_))
    }
}

/// A proxied request that has not necessarily been sent yet.
///
/// Like any future it does nothing until awaited. Clones share a single
/// execution: however many clones are awaited, the request is sent (and
/// possibly queued) once and every clone resolves to the same outcome.
#[derive(Clone)]
#[must_use = "requests are only sent when awaited"]
pub struct PendingRequest<'a> {
    inner: Shared<BoxFuture<'a, SyncResult<RequestOutcome>>>,
}

impl Future for PendingRequest<'_> {
    type Output = SyncResult<RequestOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

/// Write-request proxy with a durable deferral queue.
pub struct SyncService<T, S, C> {
    pub(super) transport: T,
    pub(super) store: S,
    pub(super) connectivity: C,
    pub(super) config: SyncConfig,
    ids: TaskIdClock,
    /// Serializes every read-modify-write of the stored queue.
    pub(super) queue_lock: tokio::sync::Mutex<()>,
    pub(super) replaying: AtomicBool,
}

impl<T, S, C> SyncService<T, S, C>
where
    T: Transport,
    S: QueueStore,
    C: Connectivity,
{
    pub fn new(config: SyncConfig, transport: T, store: S, connectivity: C) -> Self {
        SyncService {
            transport,
            store,
            connectivity,
            config,
            ids: TaskIdClock::new(),
            queue_lock: tokio::sync::Mutex::new(()),
            replaying: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Proxy a POST request.
    pub fn try_post<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
        params: QueryParams,
    ) -> PendingRequest<'_> {
        self.dispatch(Method::Post, url, payload, params)
    }

    /// Proxy a PUT request.
    pub fn try_put<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
        params: QueryParams,
    ) -> PendingRequest<'_> {
        self.dispatch(Method::Put, url, payload, params)
    }

    fn dispatch<P: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        payload: &P,
        params: QueryParams,
    ) -> PendingRequest<'_> {
        let body = serde_json::to_value(payload).map_err(|e| SyncError::Payload(Arc::new(e)));
        let url = url.to_string();

        let fut = async move {
            let request = Request::new(method, url, body?, params);
            self.execute(request).await
        };

        PendingRequest {
            inner: fut.boxed().shared(),
        }
    }

    async fn execute(&self, request: Request) -> SyncResult<RequestOutcome> {
        match request::send(&self.transport, &self.connectivity, &request, &self.config.retry).await
        {
            Ok(response) => Ok(RequestOutcome::Applied(response)),
            Err(ClassifiedError::Recoverable(cause)) => {
                let id = self.enqueue(request).await?;
                tracing::info!(
                    task_id = %id,
                    cause = %cause,
                    "request deferred until connectivity returns"
                );
                Ok(RequestOutcome::Deferred(id))
            }
            Err(ClassifiedError::Backend(err)) => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    status = ?err.status,
                    "backend rejected request: {}",
                    err
                );
                Ok(RequestOutcome::Rejected(err))
            }
        }
    }

    /// Append a request to the queue without attempting it.
    pub async fn enqueue(&self, request: Request) -> SyncResult<TaskId> {
        let _guard = self.queue_lock.lock().await;
        let key = self.config.queue_key.as_str();

        let mut tasks = self.store.get(key).await?.unwrap_or_default();
        if let Some(newest) = tasks.iter().map(|t| t.id).max() {
            self.ids.observe(newest);
        }

        let id = self.ids.next();
        tasks.push(SyncTask::new(
            id,
            request.method,
            request.url,
            request.body,
            request.params,
        ));
        self.store.set(key, &tasks).await?;

        Ok(id)
    }

    /// Snapshot of the queued tasks, in replay order.
    pub async fn pending(&self) -> SyncResult<Vec<SyncTask>> {
        Ok(self
            .store
            .get(&self.config.queue_key)
            .await?
            .unwrap_or_default())
    }

    /// Number of queued tasks.
    pub async fn pending_count(&self) -> SyncResult<usize> {
        Ok(self.pending().await?.len())
    }

    /// Remove one task by id from the stored queue.
    ///
    /// Re-reads the queue under the lock so that tasks appended since the
    /// caller's snapshot are kept.
    pub(super) async fn remove(&self, id: TaskId) -> SyncResult<()> {
        let _guard = self.queue_lock.lock().await;
        let key = self.config.queue_key.as_str();

        let mut tasks = self.store.get(key).await?.unwrap_or_default();
        tasks.retain(|t| t.id != id);
        self.store.set(key, &tasks).await?;
        Ok(())
    }
}
