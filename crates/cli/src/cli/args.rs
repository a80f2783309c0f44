// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;

/// Parse a `key=value` query parameter.
fn key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err("parameter name cannot be empty".to_string()),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Arguments shared by `post` and `put`.
#[derive(Args, Clone, Debug)]
pub struct RequestArgs {
    /// Target URL
    pub url: String,

    /// JSON request body
    #[arg(long, short, value_name = "json", default_value = "{}")]
    pub data: String,

    /// Query parameter (repeatable)
    #[arg(long = "param", short = 'p', value_name = "key=value", value_parser = key_value)]
    pub params: Vec<(String, String)>,
}
