// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status command handler

use anyhow::Result;
use gw_adapters::{HttpPlatform, RecordStore};
use gw_core::{JobId, JobStatus};

use crate::env;
use crate::output::{write_status, OutputFormat, StatusReport};

/// Read and classify the job's status once.
pub async fn handle(job: String, format: OutputFormat) -> Result<()> {
    let store = HttpPlatform::new(env::platform()?)?.store();
    let job_id = JobId::new(job);
    let raw = store.read_status(&job_id).await?;
    let report = StatusReport { status: JobStatus::parse(raw.as_deref()), raw, job_id };
    write_status(&mut std::io::stdout(), &report, format)
}
