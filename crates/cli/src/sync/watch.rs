// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect trigger: replays the queue when connectivity comes back.

use std::future::Future;
use std::time::Duration;

use futures_util::StreamExt;

use super::connectivity::Connectivity;
use super::replay::ReplayReport;
use super::service::{SyncResult, SyncService};
use super::store::QueueStore;
use super::transport::Transport;

/// Default delay between regaining connectivity and starting a replay.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(4000);

/// Replays the queue after every offline → online flip.
///
/// After a flip the watcher waits `debounce`, re-checks the oracle, and
/// only then runs a full pass. If the oracle already reports online when
/// the watcher starts and tasks are queued, one pass runs immediately.
/// Returns the number of passes run once `shutdown` resolves or the
/// status stream ends.
pub async fn replay_on_reconnect<T, S, C, F>(
    service: &SyncService<T, S, C>,
    debounce: Duration,
    shutdown: F,
) -> SyncResult<usize>
where
    T: Transport,
    S: QueueStore,
    C: Connectivity,
    F: Future<Output = ()>,
{
    let connectivity = service.connectivity();
    let mut changes = connectivity.status_changes();
    let mut online = connectivity.is_online();
    let mut passes = 0;

    if online && service.pending_count().await? > 0 {
        log_report(&service.sync_all().await);
        passes += 1;
    }

    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        let status = tokio::select! {
            _ = &mut shutdown => break,
            status = changes.next() => status,
        };

        let Some(now_online) = status else {
            break;
        };

        let regained = now_online && !online;
        online = now_online;
        tracing::info!(online, "connectivity status changed");

        if !regained {
            continue;
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(debounce) => {}
        }

        if !connectivity.is_online() {
            tracing::debug!("connectivity lost again before replay");
            continue;
        }

        log_report(&service.sync_all().await);
        passes += 1;
    }

    Ok(passes)
}

fn log_report(report: &ReplayReport) {
    for task in &report.synced {
        tracing::info!(task_id = %task.id, url = %task.url, "synced task");
    }
    for err in &report.failed {
        tracing::warn!("sync failure: {}", err);
    }
}
