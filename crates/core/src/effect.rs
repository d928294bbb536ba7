// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent side effects the controller needs to perform

use crate::id::JobId;
use serde::{Deserialize, Serialize};

/// Why the controller handed control back to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Generation finished; show the finished report.
    Completed,
    /// The user abandoned a failed job to edit their input.
    ReturnToInput,
}

crate::simple_display! {
    ExitReason {
        Completed => "completed",
        ReturnToInput => "return_to_input",
    }
}

/// Effects that need to be executed against the adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Start the remote pipeline, or resume it when `resume_from` is set.
    Trigger {
        job_id: JobId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resume_from: Option<u32>,
    },

    /// Overwrite the record's raw status with `preparing`.
    ResetStatus { job_id: JobId },

    /// One-time celebration for a finished job.
    Celebrate { job_id: JobId },

    /// Navigate away from the controller's view.
    Exit { job_id: JobId, reason: ExitReason },
}

impl Effect {
    /// Effect name for log spans (e.g., "trigger", "reset_status")
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Trigger { .. } => "trigger",
            Effect::ResetStatus { .. } => "reset_status",
            Effect::Celebrate { .. } => "celebrate",
            Effect::Exit { .. } => "exit",
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Trigger { job_id, resume_from } => vec![
                ("job", job_id.to_string()),
                ("resume_from", resume_from.map(|s| s.to_string()).unwrap_or_else(|| "-".into())),
            ],
            Effect::ResetStatus { job_id } | Effect::Celebrate { job_id } => {
                vec![("job", job_id.to_string())]
            }
            Effect::Exit { job_id, reason } => {
                vec![("job", job_id.to_string()), ("reason", reason.to_string())]
            }
        }
    }
}
