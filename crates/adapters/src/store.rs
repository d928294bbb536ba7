// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record store: where the job's raw status lives

use async_trait::async_trait;
use gw_core::JobId;
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Read access to a job's status plus the single reset write.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Fetch the raw status. `None` means the column is empty.
    async fn read_status(&self, job_id: &JobId) -> Result<Option<String>, StoreError>;

    /// Overwrite the raw status with `preparing` before a retry.
    async fn reset_status(&self, job_id: &JobId) -> Result<(), StoreError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{RecordStore, StoreError};
    use async_trait::async_trait;
    use gw_core::{JobId, JobStatus};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::watch;

    /// One recorded collaborator call, in the order it completed.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Read,
        Reset,
        Trigger { resume_from: Option<u32> },
    }

    /// Call log shared between fakes so tests can assert cross-adapter ordering.
    #[derive(Debug, Clone, Default)]
    pub struct CallLog {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl CallLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, call: Call) {
            self.calls.lock().push(call);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        /// Calls other than status reads.
        pub fn writes(&self) -> Vec<Call> {
            self.calls.lock().iter().filter(|c| **c != Call::Read).cloned().collect()
        }
    }

    struct FakeStoreState {
        status: Option<String>,
        script: VecDeque<Result<Option<String>, String>>,
        fail_resets: bool,
        reads_started: usize,
        reads: usize,
    }

    /// In-memory record store with scripted reads and failure injection
    #[derive(Clone)]
    pub struct FakeRecordStore {
        inner: Arc<Mutex<FakeStoreState>>,
        paused: Arc<watch::Sender<bool>>,
        log: CallLog,
    }

    impl Default for FakeRecordStore {
        fn default() -> Self {
            Self::new(CallLog::new())
        }
    }

    impl FakeRecordStore {
        pub fn new(log: CallLog) -> Self {
            let (paused, _) = watch::channel(false);
            Self {
                inner: Arc::new(Mutex::new(FakeStoreState {
                    status: None,
                    script: VecDeque::new(),
                    fail_resets: false,
                    reads_started: 0,
                    reads: 0,
                })),
                paused: Arc::new(paused),
                log,
            }
        }

        /// Set the status returned once the script is exhausted
        pub fn set_status(&self, status: Option<&str>) {
            self.inner.lock().status = status.map(str::to_string);
        }

        /// Queue a one-off read result ahead of the steady status
        pub fn script(&self, result: Result<Option<&str>, &str>) {
            self.inner
                .lock()
                .script
                .push_back(result.map(|s| s.map(str::to_string)).map_err(str::to_string));
        }

        pub fn fail_resets(&self, fail: bool) {
            self.inner.lock().fail_resets = fail;
        }

        /// Block reads until [`FakeRecordStore::resume_reads`] is called
        pub fn pause_reads(&self) {
            self.paused.send_replace(true);
        }

        pub fn resume_reads(&self) {
            self.paused.send_replace(false);
        }

        pub fn reads_started(&self) -> usize {
            self.inner.lock().reads_started
        }

        /// Reads that returned (successfully or not)
        pub fn reads(&self) -> usize {
            self.inner.lock().reads
        }

        pub fn status(&self) -> Option<String> {
            self.inner.lock().status.clone()
        }

        pub fn log(&self) -> &CallLog {
            &self.log
        }
    }

    #[async_trait]
    impl RecordStore for FakeRecordStore {
        async fn read_status(&self, _job_id: &JobId) -> Result<Option<String>, StoreError> {
            self.inner.lock().reads_started += 1;
            let mut paused = self.paused.subscribe();
            let _ = paused.wait_for(|p| !*p).await;

            self.log.push(Call::Read);
            let mut state = self.inner.lock();
            state.reads += 1;
            match state.script.pop_front() {
                Some(Ok(status)) => Ok(status),
                Some(Err(e)) => Err(StoreError::Request(e)),
                None => Ok(state.status.clone()),
            }
        }

        async fn reset_status(&self, _job_id: &JobId) -> Result<(), StoreError> {
            self.log.push(Call::Reset);
            let mut state = self.inner.lock();
            if state.fail_resets {
                return Err(StoreError::Status { status: 503, body: "unavailable".to_string() });
            }
            state.status = Some(JobStatus::PREPARING.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{Call, CallLog, FakeRecordStore};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
