// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic identifiers for queued tasks.
//!
//! A [`TaskId`] pairs a wall clock reading with a counter so that ids stay
//! strictly increasing even when several tasks are queued within the same
//! millisecond or the wall clock steps backwards.
//!
//! Format: `{wall_ms}-{counter}`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Identifier assigned to a [`SyncTask`](crate::SyncTask) when it is queued.
///
/// Ordering follows `wall_ms`, then `counter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Tiebreaker for ids issued at the same wall time.
    pub counter: u32,
}

impl TaskId {
    /// Creates a task id with the given components.
    pub fn new(wall_ms: u64, counter: u32) -> Self {
        TaskId { wall_ms, counter }
    }

    /// Parses a task id from its string representation.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wall_ms, self.counter)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (wall, counter) = s.split_once('-').ok_or_else(|| {
            Error::InvalidTaskId(format!("expected format 'wall_ms-counter', got '{s}'"))
        })?;

        let wall_ms = wall
            .parse::<u64>()
            .map_err(|_| Error::InvalidTaskId(format!("invalid wall_ms '{wall}' in '{s}'")))?;
        let counter = counter
            .parse::<u32>()
            .map_err(|_| Error::InvalidTaskId(format!("invalid counter '{counter}' in '{s}'")))?;

        Ok(TaskId::new(wall_ms, counter))
    }
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// Generator of strictly increasing [`TaskId`]s.
///
/// Ids read back from storage should be passed to [`observe`](Self::observe)
/// before generating new ones, so a restarted process never reissues an id
/// that is still queued.
pub struct TaskIdClock<C: ClockSource = SystemClock> {
    clock: C,
    last: Mutex<TaskId>,
}

impl TaskIdClock<SystemClock> {
    /// Creates a clock backed by the system wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TaskIdClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> TaskIdClock<C> {
    /// Creates a clock with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        TaskIdClock {
            clock,
            last: Mutex::new(TaskId::new(0, 0)),
        }
    }

    /// Generates a new id greater than every id issued or observed so far.
    pub fn next(&self) -> TaskId {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let id = if physical > last.wall_ms {
            TaskId::new(physical, 0)
        } else {
            TaskId::new(last.wall_ms, last.counter.saturating_add(1))
        };

        *last = id;
        id
    }

    /// Advances the clock past an externally issued id.
    pub fn observe(&self, id: TaskId) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if id > *last {
            *last = id;
        }
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
