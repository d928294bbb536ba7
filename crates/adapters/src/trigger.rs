// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job trigger: starts or resumes the remote generation pipeline

use async_trait::async_trait;
use gw_core::JobId;
use thiserror::Error;

/// Errors from trigger calls
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Fire-and-forget entry point of the generation pipeline.
///
/// Not idempotent on the remote side; callers must not issue duplicates.
#[async_trait]
pub trait JobTrigger: Clone + Send + Sync + 'static {
    /// Start the pipeline; `resume_from` skips steps before it.
    async fn trigger(&self, job_id: &JobId, resume_from: Option<u32>) -> Result<(), TriggerError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{JobTrigger, TriggerError};
    use crate::store::{Call, CallLog};
    use async_trait::async_trait;
    use gw_core::JobId;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Fake trigger that records calls and can be told to fail or stall
    #[derive(Clone, Default)]
    pub struct FakeJobTrigger {
        calls: Arc<Mutex<Vec<(JobId, Option<u32>)>>>,
        fail: Arc<Mutex<bool>>,
        delay: Arc<Mutex<Option<Duration>>>,
        log: CallLog,
    }

    impl FakeJobTrigger {
        pub fn new(log: CallLog) -> Self {
            Self { log, ..Self::default() }
        }

        pub fn fail(&self, fail: bool) {
            *self.fail.lock() = fail;
        }

        /// Hold each call open for `delay` after recording it
        pub fn delay(&self, delay: Duration) {
            *self.delay.lock() = Some(delay);
        }

        /// All `(job, resume_from)` pairs, failed calls included
        pub fn calls(&self) -> Vec<(JobId, Option<u32>)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl JobTrigger for FakeJobTrigger {
        async fn trigger(
            &self,
            job_id: &JobId,
            resume_from: Option<u32>,
        ) -> Result<(), TriggerError> {
            self.calls.lock().push((job_id.clone(), resume_from));
            self.log.push(Call::Trigger { resume_from });
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if *self.fail.lock() {
                return Err(TriggerError::Status { status: 500, body: "pipeline down".to_string() });
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeJobTrigger;
