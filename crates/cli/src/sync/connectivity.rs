// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity oracle.
//!
//! The orchestrator only needs a point-in-time "is online" answer and a
//! stream of flips. Detection is advisory: a recoverable transport failure
//! defers the request even when the oracle reports online.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Source of online/offline state.
pub trait Connectivity: Send + Sync {
    /// Current state. Must be cheap and side-effect free.
    fn is_online(&self) -> bool;

    /// Yields the new state each time connectivity flips.
    ///
    /// Every call returns an independent subscription that starts at the
    /// next flip. The stream only ends when the source itself goes away.
    fn status_changes(&self) -> BoxStream<'static, bool>;
}

/// Manually driven oracle backed by a `watch` channel.
///
/// Clones share state, so one handle can be given to a [`TcpProbe`] (or a
/// test) while another is owned by the sync service.
#[derive(Debug, Clone)]
pub struct ConnectivitySwitch {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivitySwitch {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        ConnectivitySwitch { tx: Arc::new(tx) }
    }

    /// Sets the state. Returns `true` if this was a flip (and was broadcast).
    pub fn set_online(&self, online: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        })
    }
}

impl Default for ConnectivitySwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivitySwitch {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn status_changes(&self) -> BoxStream<'static, bool> {
        let rx = self.tx.subscribe();
        stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let online = *rx.borrow_and_update();
            Some((online, rx))
        })
        .boxed()
    }
}

/// Periodic TCP reachability check feeding a [`ConnectivitySwitch`].
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    interval: Duration,
    timeout: Duration,
}

impl TcpProbe {
    /// `addr` is a `host:port` pair.
    pub fn new(addr: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        TcpProbe {
            addr: addr.into(),
            interval,
            timeout,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Attempts one connection within the probe timeout.
    pub async fn check(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        )
    }

    /// Probes forever, writing each result into `switch`.
    pub async fn run(&self, switch: &ConnectivitySwitch) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let online = self.check().await;
            if switch.set_online(online) {
                tracing::info!(addr = %self.addr, online, "connectivity changed");
            }
        }
    }

    /// Runs the probe on a background task.
    pub fn spawn(self, switch: ConnectivitySwitch) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(&switch).await })
    }
}
