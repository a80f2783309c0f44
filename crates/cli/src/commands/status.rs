// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox status`: list queued requests.

use outbox_core::SyncTask;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::Result;

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let tasks = ctx.service()?.pending().await?;
    println!("{}", render(&tasks, output)?);
    Ok(())
}

fn render(tasks: &[SyncTask], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tasks)?),
        OutputFormat::Text => Ok(render_text(tasks)),
    }
}

fn render_text(tasks: &[SyncTask]) -> String {
    if tasks.is_empty() {
        return "no pending requests".to_string();
    }

    let mut out = format!("{} pending request(s):", tasks.len());
    for task in tasks {
        out.push_str(&format!(
            "\n  {}  {:<4} {}",
            task.id,
            task.method.as_str().to_uppercase(),
            display_url(task)
        ));
    }
    out
}

pub(super) fn display_url(task: &SyncTask) -> String {
    if task.params.is_empty() {
        task.url.clone()
    } else {
        format!("{}?{}", task.url, task.params)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
