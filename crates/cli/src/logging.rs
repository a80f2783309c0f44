// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for the binary.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env;

const DEFAULT_FILTER: &str = "warn";

/// Log file used by `outbox watch`.
pub const WATCH_LOG_NAME: &str = "watch.log";

fn filter() -> EnvFilter {
    env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, writing to stderr.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the global subscriber, appending to `<state_dir>/watch.log`.
///
/// Falls back to stderr if the file cannot be opened.
pub fn init_watch(state_dir: &Path) {
    let log_path = state_dir.join(WATCH_LOG_NAME);
    let file = fs::create_dir_all(state_dir).and_then(|()| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });

    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(file)
                .with_ansi(false)
                .try_init();
        }
        Err(_) => init_stderr(),
    }
}
