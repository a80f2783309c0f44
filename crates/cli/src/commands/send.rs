// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `outbox post` / `outbox put`.

use outbox_core::{Method, QueryParams};
use serde_json::Value;

use super::Context;
use crate::cli::RequestArgs;
use crate::error::{Error, Result};
use crate::sync::RequestOutcome;

pub async fn run(ctx: &Context, method: Method, args: RequestArgs) -> Result<()> {
    let url = parse_url(&args.url)?;
    let payload = parse_payload(&args.data)?;
    let params: QueryParams = args.params.into_iter().collect();

    let service = ctx.service()?;
    let request = match method {
        Method::Post => service.try_post(&url, &payload, params),
        Method::Put => service.try_put(&url, &payload, params),
    };

    println!("{}", render(request.await?)?);
    Ok(())
}

fn parse_url(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| Error::InvalidInput(format!("invalid URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(Error::InvalidInput(format!(
            "unsupported URL scheme '{scheme}'\n  hint: use an http:// or https:// URL"
        ))),
    }
}

fn parse_payload(data: &str) -> Result<Value> {
    serde_json::from_str(data)
        .map_err(|e| Error::InvalidInput(format!("--data is not valid JSON: {e}")))
}

/// Text printed for an outcome. A rejection is returned as an error.
fn render(outcome: RequestOutcome) -> Result<String> {
    match outcome {
        RequestOutcome::Applied(response) if response.body.is_null() => {
            Ok(format!("applied {}", response.status))
        }
        RequestOutcome::Applied(response) => {
            Ok(format!("applied {}\n{:#}", response.status, response.body))
        }
        RequestOutcome::Deferred(id) => Ok(format!("deferred {id}")),
        RequestOutcome::Rejected(err) => Err(Error::Rejected(err)),
    }
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
