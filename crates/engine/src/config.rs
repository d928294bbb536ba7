// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller configuration

use gw_core::UnknownPolicy;
use std::time::Duration;

/// Interval between status reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Floor applied to the poll interval; a zero period would spin.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub poll_interval: Duration,
    pub unknown_policy: UnknownPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, unknown_policy: UnknownPolicy::default() }
    }
}

impl ControllerConfig {
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }
}

/// Parse a duration like `500ms`, `5s`, `2m`, `1h`, or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str.parse().map_err(|_| format!("invalid number in duration: {}", s))?;

    let scale = match suffix.trim() {
        "ms" | "millis" => return Ok(Duration::from_millis(num)),
        "" | "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 3600,
        other => return Err(format!("unknown duration suffix: {}", other)),
    };
    let secs = num.checked_mul(scale).ok_or_else(|| format!("duration too large: {}", s))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        millis    = { "500ms", Duration::from_millis(500) },
        seconds   = { "5s",    Duration::from_secs(5) },
        bare      = { "30",    Duration::from_secs(30) },
        minutes   = { "2m",    Duration::from_secs(120) },
        hours     = { "1h",    Duration::from_secs(3600) },
        padded    = { " 5 s ", Duration::from_secs(5) },
    )]
    fn parse_duration_valid(input: &str, expected: Duration) {
        assert_eq!(parse_duration(input).unwrap(), expected);
    }

    #[yare::parameterized(
        empty  = { "" },
        suffix = { "5x" },
        number = { "fast" },
    )]
    fn parse_duration_invalid(input: &str) {
        assert!(parse_duration(input).is_err());
    }

    #[yare::parameterized(
        minutes = { "9999999999999999999m" },
        hours   = { "18446744073709551615h" },
    )]
    fn parse_duration_overflow_is_an_error(input: &str) {
        assert_eq!(parse_duration(input), Err(format!("duration too large: {}", input)));
    }

    #[test]
    fn default_polls_every_five_seconds() {
        let config = ControllerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.unknown_policy, UnknownPolicy::FreshStart);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = ControllerConfig::default().poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
    }
}
