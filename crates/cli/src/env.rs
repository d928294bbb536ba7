// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::time::Duration;

use gw_adapters::PlatformConfig;
use gw_core::UnknownPolicy;

use crate::exit_error::ExitError;

/// Base URL of the hosted platform. Required by every networked command.
pub fn api_url() -> Result<String, ExitError> {
    std::env::var("GW_API_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExitError::new(crate::exit_error::FAILURE, "GW_API_URL is not set"))
}

pub fn api_key() -> Option<String> {
    std::env::var("GW_API_KEY").ok().filter(|s| !s.is_empty())
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

/// Poll interval override (`GW_POLL_INTERVAL_MS`)
pub fn poll_interval() -> Option<Duration> {
    millis("GW_POLL_INTERVAL_MS")
}

/// Per-request timeout (default 10s, configurable via `GW_HTTP_TIMEOUT_MS`).
pub fn http_timeout() -> Duration {
    millis("GW_HTTP_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// `GW_UNKNOWN_POLICY`: `fresh-start` or `ask`. Unrecognised values fall back
/// to the default.
pub fn unknown_policy() -> UnknownPolicy {
    match non_empty("GW_UNKNOWN_POLICY").as_deref() {
        Some("ask") => UnknownPolicy::AskUser,
        Some("fresh-start") | None => UnknownPolicy::FreshStart,
        Some(other) => {
            tracing::warn!(value = other, "ignoring unrecognised GW_UNKNOWN_POLICY");
            UnknownPolicy::FreshStart
        }
    }
}

/// Assemble platform settings from `GW_*` variables.
pub fn platform() -> Result<PlatformConfig, ExitError> {
    let mut config = PlatformConfig::new(api_url()?);
    config.api_key = api_key();
    if let Some(table) = non_empty("GW_STATUS_TABLE") {
        config.table = table;
    }
    if let Some(column) = non_empty("GW_STATUS_COLUMN") {
        config.column = column;
    }
    if let Some(function) = non_empty("GW_TRIGGER_FUNCTION") {
        config.function = function;
    }
    config.timeout = http_timeout();
    Ok(config)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
