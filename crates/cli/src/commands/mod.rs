// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod lock;
pub mod send;
pub mod status;
pub mod sync;
pub mod watch;

use std::fs;
use std::path::PathBuf;

use crate::config::{Config, StoreKind};
use crate::error::Result;
use crate::sync::{
    ConnectivitySwitch, HttpTransport, JsonlStore, QueueStore, SqliteStore, SyncService,
};

/// Service type used by every command.
pub type CliService = SyncService<HttpTransport, Box<dyn QueueStore>, ConnectivitySwitch>;

/// Resolved state directory, configuration and global flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
    pub offline: bool,
}

impl Context {
    /// Load `config.toml` from `state_dir`.
    pub fn load(state_dir: PathBuf, offline: bool) -> Result<Self> {
        let config = Config::load(&state_dir)?;
        Ok(Context {
            state_dir,
            config,
            offline,
        })
    }

    /// Open the configured queue store, creating the state directory.
    pub fn open_store(&self) -> Result<Box<dyn QueueStore>> {
        fs::create_dir_all(&self.state_dir)?;
        let store: Box<dyn QueueStore> = match self.config.store {
            StoreKind::Jsonl => Box::new(JsonlStore::open(&self.state_dir)?),
            StoreKind::Sqlite => Box::new(SqliteStore::open(&Config::sqlite_path(
                &self.state_dir,
            ))?),
        };
        Ok(store)
    }

    /// Build a service whose oracle follows `--offline`.
    pub fn service(&self) -> Result<CliService> {
        self.service_with(ConnectivitySwitch::new(!self.offline))
    }

    /// Build a service driven by an externally controlled switch.
    pub fn service_with(&self, switch: ConnectivitySwitch) -> Result<CliService> {
        Ok(SyncService::new(
            self.config.sync_config(),
            HttpTransport::new(),
            self.open_store()?,
            switch,
        ))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
