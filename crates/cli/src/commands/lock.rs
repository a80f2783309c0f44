// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay lock: one replaying process per state directory.

use std::fs;
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

/// Lock filename inside the state directory.
pub const LOCK_NAME: &str = "watch.lock";

/// Take the replay lock. It is held until the returned file is dropped.
pub fn acquire(state_dir: &Path) -> Result<fs::File> {
    fs::create_dir_all(state_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(state_dir.join(LOCK_NAME))?;
    file.try_lock_exclusive()
        .map_err(|_| Error::WatcherRunning(state_dir.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
