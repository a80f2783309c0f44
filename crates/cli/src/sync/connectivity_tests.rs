// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the connectivity module.

#![allow(clippy::unwrap_used)]

use super::connectivity::{Connectivity, ConnectivitySwitch, TcpProbe};
use futures_util::StreamExt;
use std::time::Duration;

#[test]
fn test_switch_reports_initial_state() {
    assert!(ConnectivitySwitch::new(true).is_online());
    assert!(!ConnectivitySwitch::new(false).is_online());
    assert!(ConnectivitySwitch::default().is_online());
}

#[test]
fn test_switch_set_online_reports_flips_only() {
    let switch = ConnectivitySwitch::new(true);

    assert!(!switch.set_online(true));
    assert!(switch.set_online(false));
    assert!(!switch.set_online(false));
    assert!(!switch.is_online());
}

#[tokio::test]
async fn test_status_changes_yields_each_flip() {
    let switch = ConnectivitySwitch::new(true);
    let mut changes = switch.status_changes();

    switch.set_online(false);
    assert_eq!(changes.next().await, Some(false));

    switch.set_online(true);
    assert_eq!(changes.next().await, Some(true));
}

#[tokio::test]
async fn test_status_changes_are_independent_per_subscriber() {
    let switch = ConnectivitySwitch::new(true);
    let mut first = switch.status_changes();

    switch.set_online(false);
    assert_eq!(first.next().await, Some(false));

    // A later subscriber starts from the next flip, not from history.
    let mut second = switch.status_changes();
    switch.set_online(true);

    assert_eq!(first.next().await, Some(true));
    assert_eq!(second.next().await, Some(true));
}

#[tokio::test]
async fn test_clones_share_state() {
    let switch = ConnectivitySwitch::new(true);
    let handle = switch.clone();
    let mut changes = switch.status_changes();

    handle.set_online(false);

    assert!(!switch.is_online());
    assert_eq!(changes.next().await, Some(false));
}

#[tokio::test]
async fn test_probe_detects_listening_port() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let probe = TcpProbe::new(addr.to_string(), Duration::from_millis(50), Duration::from_secs(1));
    assert!(probe.check().await);
}

#[tokio::test]
async fn test_probe_detects_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let probe = TcpProbe::new(addr.to_string(), Duration::from_millis(50), Duration::from_secs(1));
    assert!(!probe.check().await);
}

#[tokio::test]
async fn test_probe_drives_switch() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let switch = ConnectivitySwitch::new(true);
    let mut changes = switch.status_changes();
    let probe = TcpProbe::new(addr.to_string(), Duration::from_millis(20), Duration::from_secs(1));
    let handle = probe.spawn(switch.clone());

    let flipped = tokio::time::timeout(Duration::from_secs(5), changes.next())
        .await
        .unwrap();
    assert_eq!(flipped, Some(false));
    assert!(!switch.is_online());

    handle.abort();
}
