// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::RequestArgs;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send write requests now, or queue them and replay when the network returns")]
#[command(
    long_about = "Send write requests now, or queue them and replay when the network returns.\n\n\
    POST and PUT requests that time out or cannot connect are stored in a durable queue \
    under the state directory and replayed in order by `outbox sync` or `outbox watch`."
)]
pub struct Cli {
    /// State directory holding the queue, config and logs
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Treat the network as unreachable
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a POST request, queueing it if the backend is unreachable
    #[command(after_help = "\
Examples:
  outbox post https://api.example.com/todos -d '{\"title\":\"Ship it\"}'
  outbox post https://api.example.com/todos -d '{}' -p userId=2323")]
    Post(RequestArgs),

    /// Send a PUT request, queueing it if the backend is unreachable
    #[command(after_help = "\
Examples:
  outbox put https://api.example.com/todos/1 -d '{\"done\":true}'")]
    Put(RequestArgs),

    /// Replay the queue once, in order
    Sync,

    /// List queued requests
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay the queue whenever connectivity returns (until Ctrl-C)
    #[command(after_help = "\
Examples:
  outbox watch                        Use the [probe] table from config.toml
  outbox watch --probe 1.1.1.1:443    Probe a specific address")]
    Watch {
        /// Address to probe for connectivity (host:port)
        #[arg(long, value_name = "host:port")]
        probe: Option<String>,
    },

    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Whether this command runs as a long-lived watcher.
    pub fn is_watch(&self) -> bool {
        matches!(self, Command::Watch { .. })
    }
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
