// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use clap::ValueEnum;
use gw_core::{JobId, JobStatus, SessionView};
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One classified read of a job record
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub job_id: JobId,
    /// Raw column value; `None` when the column is null
    pub raw: Option<String>,
    pub status: JobStatus,
}

/// Single progress line for a controller view.
pub fn write_view(out: &mut impl Write, view: &SessionView) -> std::io::Result<()> {
    write!(out, "{}  {}", color::header(view.job_id.as_str()), color::state(&view.state))?;
    if let Some(status) = &view.status {
        write!(out, "  {}", color::context(&status.to_string()))?;
    }
    if let Some(error) = &view.last_error {
        write!(out, "  (last error: {})", error)?;
    }
    writeln!(out)
}

pub fn write_status(
    out: &mut impl Write,
    report: &StatusReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} {}", color::header("Job:"), report.job_id)?;
            writeln!(out, "{} {}", color::header("Raw:"), report.raw.as_deref().unwrap_or("(none)"))?;
            writeln!(out, "{} {}", color::header("Phase:"), report.status.phase())?;
            if let Some(step) = report.status.step() {
                writeln!(out, "{} {}", color::header("Step:"), step)?;
            }
            if let Some(label) = report.status.label() {
                writeln!(out, "{} {}", color::header("Label:"), label)?;
            }
        }
    }
    Ok(())
}
