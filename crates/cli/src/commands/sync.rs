// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox sync`: one replay pass.

use futures_util::StreamExt;
use outbox_core::SyncTask;

use super::status::display_url;
use super::{lock, Context};
use crate::error::{Error, Result};

pub async fn run(ctx: &Context) -> Result<()> {
    let _lock = lock::acquire(&ctx.state_dir)?;
    let service = ctx.service()?;

    let mut synced = 0;
    let mut failed = 0;
    let mut results = std::pin::pin!(service.sync());
    while let Some(result) = results.next().await {
        match result {
            Ok(task) => {
                synced += 1;
                println!("{}", synced_line(&task));
            }
            Err(e) => {
                failed += 1;
                eprintln!("failed: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(Error::ReplayFailed { failed });
    }
    if synced == 0 {
        println!("no pending requests");
    }
    Ok(())
}

fn synced_line(task: &SyncTask) -> String {
    format!(
        "synced {} {} {}",
        task.id,
        task.method.as_str().to_uppercase(),
        display_url(task)
    )
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
