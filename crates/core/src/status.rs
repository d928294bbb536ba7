// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of the job record's free-text status column.
//!
//! The generation pipeline writes human-readable strings such as
//! `"Step 3 - Generating Financials"` or `"Step 2 Market Sizing - Fail"`.
//! [`JobStatus::parse`] is the only place those strings are interpreted;
//! everything downstream matches on the structured variant.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `Step <N> <label> - Fail`, with an optional suffix after `fail` (e.g. `Failed`).
#[allow(clippy::expect_used)]
static FAILED_STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*step\s*([0-9]+)\s*(.*?)\s*-\s*fail\w*\s*$")
        .expect("constant regex pattern is valid")
});

/// Leading `Step <N>` of an in-flight status.
#[allow(clippy::expect_used)]
static STEP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*step\s*([0-9]+)").expect("constant regex pattern is valid")
});

/// Coarse category of a job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preparing,
    InProgress,
    Completed,
    Failed,
    Unknown,
}

crate::simple_display! {
    Phase {
        Preparing => "preparing",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
        Unknown => "unknown",
    }
}

/// Structured view of the raw status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum JobStatus {
    /// No work has started (absent, empty or `preparing`).
    Preparing,
    /// The pipeline is executing `step`.
    InProgress { step: u32 },
    /// The pipeline reported a failure. Step info is present only when the
    /// string followed the `Step <N> <label> - Fail` shape.
    Failed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Completed,
    /// Anything the parser does not recognise.
    Unknown,
}

impl JobStatus {
    /// Raw value written back to the record when a failed job is retried.
    pub const PREPARING: &'static str = "preparing";

    /// Classify a raw status value. Total: malformed input becomes `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return JobStatus::Preparing;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::PREPARING) {
            return JobStatus::Preparing;
        }
        if trimmed.eq_ignore_ascii_case("completed") {
            return JobStatus::Completed;
        }

        let lower = trimmed.to_lowercase();
        if lower.contains("fail") {
            return parse_failure(trimmed);
        }
        if lower.starts_with("step") {
            return match leading_step(trimmed) {
                Some(step) => JobStatus::InProgress { step },
                None => JobStatus::Unknown,
            };
        }
        JobStatus::Unknown
    }

    pub fn phase(&self) -> Phase {
        match self {
            JobStatus::Preparing => Phase::Preparing,
            JobStatus::InProgress { .. } => Phase::InProgress,
            JobStatus::Failed { .. } => Phase::Failed,
            JobStatus::Completed => Phase::Completed,
            JobStatus::Unknown => Phase::Unknown,
        }
    }

    pub fn step(&self) -> Option<u32> {
        match self {
            JobStatus::InProgress { step } => Some(*step),
            JobStatus::Failed { step, .. } => *step,
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            JobStatus::Failed { label, .. } => label.as_deref(),
            _ => None,
        }
    }

    /// Phases after which automatic polling has nothing left to learn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::InProgress { step } => write!(f, "in_progress (step {})", step),
            JobStatus::Failed { step: Some(step), label: Some(label) } => {
                write!(f, "failed (step {}: {})", step, label)
            }
            JobStatus::Failed { step: Some(step), label: None } => {
                write!(f, "failed (step {})", step)
            }
            other => write!(f, "{}", other.phase()),
        }
    }
}

fn parse_failure(raw: &str) -> JobStatus {
    let Some(caps) = FAILED_STEP.captures(raw) else {
        return JobStatus::Failed { step: None, label: None };
    };
    let Some(step) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
        return JobStatus::Failed { step: None, label: None };
    };
    let label = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|label| !label.is_empty());
    JobStatus::Failed { step: Some(step), label }
}

fn leading_step(raw: &str) -> Option<u32> {
    STEP_PREFIX.captures(raw)?.get(1)?.as_str().parse::<u32>().ok()
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
