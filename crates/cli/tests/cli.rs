// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod common;
use common::*;

#[test]
fn status_on_empty_queue() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("no pending requests"));
}

#[test]
fn status_json_on_empty_queue() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .args(["status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn post_to_refused_port_is_deferred() {
    let temp = TempDir::new().unwrap();
    let url = refused_url();

    outbox(&temp)
        .args(["post", &url, "-d", r#"{"title":"Ship it"}"#, "-p", "userId=2323"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("deferred "));

    outbox(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pending request(s)"))
        .stdout(predicate::str::contains("POST"))
        .stdout(predicate::str::contains("userId=2323"));
}

#[test]
fn deferred_requests_keep_order() {
    let temp = TempDir::new().unwrap();
    let url = refused_url();

    outbox(&temp).args(["post", &url]).assert().success();
    outbox(&temp)
        .args(["put", &format!("{url}/1"), "-d", "{}"])
        .assert()
        .success();

    let output = outbox(&temp)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tasks[0]["method"], "post");
    assert_eq!(tasks[1]["method"], "put");
    assert_eq!(tasks[1]["url"], format!("{url}/1"));
}

#[test]
fn sqlite_store_from_config() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "store = \"sqlite\"\nmax_retries = 0\n");

    outbox(&temp)
        .args(["post", &refused_url()])
        .assert()
        .success();

    assert!(temp.path().join("queue.db").exists());
    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn invalid_json_data_fails() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .args(["post", "http://127.0.0.1:9/todos", "-d", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid input"));

    assert_eq!(pending_count(&temp), 0);
}

#[test]
fn invalid_url_fails() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .args(["post", "ftp://example.com/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported URL scheme"));
}

#[test]
fn invalid_param_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .args(["post", "http://127.0.0.1:9/todos", "-p", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn bad_config_fails() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "timeout_ms = 0\n");

    outbox(&temp)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: config error"));
}

#[test]
fn sync_on_empty_queue() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("no pending requests"));
}

#[test]
fn sync_failure_keeps_queue_and_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "max_retries = 0\n");
    outbox(&temp)
        .args(["post", &refused_url()])
        .assert()
        .success();

    outbox(&temp)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to replay"));

    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn completions_bash() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("outbox"));
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();

    outbox(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("post"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("watch"));
}
