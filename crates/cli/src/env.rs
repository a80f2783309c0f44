// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::{Path, PathBuf};

/// Environment variable names.
pub mod vars {
    pub const OUTBOX_STATE_DIR: &str = "OUTBOX_STATE_DIR";
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
    pub const OUTBOX_LOG: &str = "OUTBOX_LOG";
}

/// Returns the value of `OUTBOX_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::OUTBOX_STATE_DIR).map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(vars::XDG_STATE_HOME).map(PathBuf::from)
}

/// Returns the log filter directive from `OUTBOX_LOG` if set.
pub fn log_filter() -> Option<String> {
    non_empty(vars::OUTBOX_LOG)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve the state directory.
///
/// Precedence: explicit flag, `OUTBOX_STATE_DIR`, `$XDG_STATE_HOME/outbox`,
/// then `~/.local/state/outbox`.
pub fn resolve_state_dir(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = flag {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = state_dir() {
        return Some(dir);
    }
    if let Some(base) = xdg_state_home() {
        return Some(base.join("outbox"));
    }
    dirs::home_dir().map(|home| home.join(".local").join("state").join("outbox"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
