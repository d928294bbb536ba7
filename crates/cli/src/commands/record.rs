// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot writes against the job record: reset and trigger

use anyhow::Result;
use gw_adapters::{HttpPlatform, JobTrigger, RecordStore};
use gw_core::{JobId, JobStatus};

use crate::color;
use crate::env;

pub async fn reset(job: String) -> Result<()> {
    let store = HttpPlatform::new(env::platform()?)?.store();
    let job_id = JobId::new(job);
    store.reset_status(&job_id).await?;
    println!("Reset {} to {}", color::header(job_id.as_str()), JobStatus::PREPARING);
    Ok(())
}

pub async fn trigger(job: String, from_step: Option<u32>) -> Result<()> {
    let trigger = HttpPlatform::new(env::platform()?)?.trigger();
    let job_id = JobId::new(job);
    trigger.trigger(&job_id, from_step).await?;
    match from_step {
        Some(step) => {
            println!("Triggered {} from step {}", color::header(job_id.as_str()), step)
        }
        None => println!("Triggered {}", color::header(job_id.as_str())),
    }
    Ok(())
}
