// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox - resilient write requests with a durable replay queue.
//!
//! This crate provides the core functionality for the `outbox` CLI tool:
//! POST and PUT requests are sent with a timeout and retry budget, and the
//! ones that cannot reach their destination are stored under the state
//! directory and replayed in order once connectivity returns.
//!
//! # Main Components
//!
//! - [`sync::SyncService`] - write-request proxy with a durable queue
//! - [`sync::QueueStore`] - JSONL, SQLite and in-memory queue storage
//! - [`Config`] - `config.toml` in the state directory
//! - [`Error`] - Error types for all CLI operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use outbox::sync::{ConnectivitySwitch, HttpTransport, JsonlStore, SyncConfig, SyncService};
//! use outbox_core::QueryParams;
//!
//! let store = JsonlStore::open(Path::new("/var/lib/app/outbox"))?;
//! let service = SyncService::new(
//!     SyncConfig::default(),
//!     HttpTransport::new(),
//!     store,
//!     ConnectivitySwitch::new(true),
//! );
//! let outcome = service.try_post("https://api.example.com/todos", &todo, QueryParams::new()).await?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, RequestArgs};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;
use outbox_core::Method;

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "outbox", &mut std::io::stdout());
        return Ok(());
    }

    let state_dir = env::resolve_state_dir(cli.state_dir.as_deref()).ok_or(Error::NoStateDir)?;
    if cli.command.is_watch() {
        logging::init_watch(&state_dir);
    } else {
        logging::init_stderr();
    }

    let ctx = commands::Context::load(state_dir, cli.offline)?;
    match cli.command {
        Command::Post(args) => commands::send::run(&ctx, Method::Post, args).await,
        Command::Put(args) => commands::send::run(&ctx, Method::Put, args).await,
        Command::Sync => commands::sync::run(&ctx).await,
        Command::Status { output } => commands::status::run(&ctx, output).await,
        Command::Watch { probe } => commands::watch::run(&ctx, probe).await,
        Command::Completions { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
