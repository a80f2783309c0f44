// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox watch`: replay on reconnect until Ctrl-C.

use super::{lock, Context};
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::sync::{replay_on_reconnect, ConnectivitySwitch, TcpProbe};

pub async fn run(ctx: &Context, probe: Option<String>) -> Result<()> {
    let _lock = lock::acquire(&ctx.state_dir)?;

    let switch = ConnectivitySwitch::new(!ctx.offline);
    let prober = match probe_config(ctx, probe) {
        Some(probe) if !ctx.offline => {
            tracing::info!(addr = %probe.addr, "starting connectivity probe");
            Some(TcpProbe::new(probe.addr.clone(), probe.interval(), probe.timeout()).spawn(switch.clone()))
        }
        _ => None,
    };
    let service = ctx.service_with(switch)?;

    println!("watching {} (Ctrl-C to stop)", ctx.state_dir.display());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
        }
    };

    let passes = replay_on_reconnect(&service, ctx.config.reconnect_delay(), shutdown).await;

    if let Some(handle) = prober {
        handle.abort();
    }

    let passes = passes?;
    tracing::info!(passes, "watcher stopped");
    println!("stopped after {passes} replay pass(es)");
    Ok(())
}

/// `--probe` overrides the configured address; interval and timeout still
/// come from the `[probe]` table when present.
fn probe_config(ctx: &Context, flag: Option<String>) -> Option<ProbeConfig> {
    let configured = ctx.config.probe.clone();
    match (flag, configured) {
        (Some(addr), Some(configured)) => Some(ProbeConfig { addr, ..configured }),
        (Some(addr), None) => Some(ProbeConfig::new(addr)),
        (None, configured) => configured,
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
