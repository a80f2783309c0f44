// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue replay.
//!
//! A replay pass walks a snapshot of the queue in stored order and resends
//! each task, strictly one at a time: tasks may depend on each other
//! (create, then update). Each success is removed from the store before
//! the next task is sent, so an interrupted pass never resends a task that
//! already went through.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::{self, Stream, StreamExt};
use outbox_core::SyncTask;

use super::connectivity::Connectivity;
use super::request;
use super::service::{ReplayPolicy, SyncError, SyncResult, SyncService};
use super::store::QueueStore;
use super::transport::{Request, Transport};

/// Summary of a drained replay pass.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Tasks replayed successfully, in replay order.
    pub synced: Vec<SyncTask>,
    /// Failures, in the order they occurred.
    pub failed: Vec<SyncError>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Clears the in-progress flag when the pass ends or its stream is dropped.
struct ReplayGuard<'a>(&'a AtomicBool);

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum ReplayState<'a> {
    Start(ReplayGuard<'a>),
    Running {
        guard: ReplayGuard<'a>,
        remaining: VecDeque<SyncTask>,
    },
    Done,
}

impl<T, S, C> SyncService<T, S, C>
where
    T: Transport,
    S: QueueStore,
    C: Connectivity,
{
    /// Replay every queued task, in order.
    ///
    /// Yields `Ok(task)` for each task that was sent and removed from the
    /// queue, and `Err(SyncError::Replay { .. })` for each terminal failure.
    /// Under [`ReplayPolicy::StopOnFailure`] the stream ends after the first
    /// failure. Starting a pass while another one is running yields a single
    /// [`SyncError::ReplayInProgress`].
    pub fn sync(&self) -> impl Stream<Item = SyncResult<SyncTask>> + Send + '_ {
        let state = match self
            .replaying
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Some(ReplayState::Start(ReplayGuard(&self.replaying))),
            Err(_) => None,
        };

        let rejected = state.is_none();
        let busy = stream::iter(rejected.then(|| Err(SyncError::ReplayInProgress)));
        let pass = stream::unfold(state.unwrap_or(ReplayState::Done), move |state| {
            self.step(state)
        });

        busy.chain(pass)
    }

    /// Replay the queue and collect the results.
    pub async fn sync_all(&self) -> ReplayReport {
        let mut report = ReplayReport::default();
        let mut results = std::pin::pin!(self.sync());

        while let Some(result) = results.next().await {
            match result {
                Ok(task) => report.synced.push(task),
                Err(e) => report.failed.push(e),
            }
        }

        report
    }

    async fn step<'a>(
        &'a self,
        state: ReplayState<'a>,
    ) -> Option<(SyncResult<SyncTask>, ReplayState<'a>)> {
        let (guard, mut remaining) = match state {
            ReplayState::Done => return None,
            ReplayState::Start(guard) => match self.pending().await {
                Ok(tasks) => {
                    tracing::info!(count = tasks.len(), "starting replay");
                    (guard, VecDeque::from(tasks))
                }
                Err(e) => return Some((Err(e), ReplayState::Done)),
            },
            ReplayState::Running { guard, remaining } => (guard, remaining),
        };

        let task = match remaining.pop_front() {
            Some(task) => task,
            None => {
                tracing::info!("replay finished");
                return None;
            }
        };

        let request = Request::from(&task);
        match request::send(&self.transport, &self.connectivity, &request, &self.config.retry).await
        {
            Ok(_) => {
                if let Err(e) = self.remove(task.id).await {
                    return Some((Err(e), ReplayState::Done));
                }
                tracing::info!(task_id = %task.id, method = %task.method, url = %task.url, "task replayed");
                let next = ReplayState::Running { guard, remaining };
                Some((Ok(task), next))
            }
            Err(source) => {
                tracing::warn!(task_id = %task.id, url = %task.url, "replay failed: {}", source);
                let err = SyncError::Replay {
                    task_id: task.id,
                    source,
                };
                let next = match self.config.replay_policy {
                    ReplayPolicy::StopOnFailure => ReplayState::Done,
                    ReplayPolicy::SkipFailed => ReplayState::Running { guard, remaining },
                };
                Some((Err(err), next))
            }
        }
    }
}
