// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `outbox` bound to a state directory, with a clean environment.
pub fn outbox(state_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("outbox");
    cmd.arg("--state-dir")
        .arg(state_dir.path())
        .env_remove("OUTBOX_STATE_DIR")
        .env_remove("OUTBOX_LOG");
    cmd
}

/// A localhost URL nothing is listening on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/todos")
}

/// Write `config.toml` into the state directory.
pub fn write_config(state_dir: &TempDir, content: &str) {
    std::fs::write(state_dir.path().join("config.toml"), content).unwrap();
}

/// Number of requests listed by `outbox status -o json`.
pub fn pending_count(state_dir: &TempDir) -> usize {
    let output = outbox(state_dir)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    tasks.as_array().unwrap().len()
}
