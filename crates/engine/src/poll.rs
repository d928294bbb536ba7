// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll loop: periodic status reads for one job.
//!
//! Reads are strictly sequential (the next read is not issued until the
//! previous one returns), so observations arrive in real-time order. A read
//! failure is logged and the loop waits for the next tick. Cancelling the
//! loop drops any in-flight read, so nothing read after teardown is ever
//! delivered.

use crate::config::MIN_POLL_INTERVAL;
use gw_adapters::RecordStore;
use gw_core::{JobId, JobStatus};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Handle to a running poll task. Dropping it stops polling.
pub struct PollLoop {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollLoop {
    /// Start polling immediately, then every `interval`.
    ///
    /// Polling ends on its own after a `Completed` observation, when the
    /// receiving side of `tx` is dropped, or when `parent` is cancelled.
    pub fn spawn<S: RecordStore>(
        store: S,
        job_id: JobId,
        interval: Duration,
        tx: mpsc::Sender<JobStatus>,
        parent: &CancellationToken,
    ) -> Self {
        let token = parent.child_token();
        let handle = tokio::spawn(run(store, job_id, interval, tx, token.clone()));
        Self { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the poll task to exit.
    pub async fn stopped(&mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<S: RecordStore>(
    store: S,
    job_id: JobId,
    interval: Duration,
    tx: mpsc::Sender<JobStatus>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::debug!(job = %job_id, interval_ms = interval.as_millis() as u64, "polling started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(job = %job_id, "in-flight read dropped on teardown");
                break;
            }
            result = store.read_status(&job_id) => result,
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(job = %job_id, error = %e, "status read failed, retrying next interval");
                continue;
            }
        };

        let status = JobStatus::parse(raw.as_deref());
        tracing::debug!(job = %job_id, phase = %status.phase(), raw = ?raw, "status observed");
        let completed = status == JobStatus::Completed;

        let delivered = tokio::select! {
            biased;
            _ = token.cancelled() => false,
            sent = tx.send(status) => sent.is_ok(),
        };
        if !delivered {
            break;
        }
        if completed {
            tracing::info!(job = %job_id, "job completed, polling stopped");
            break;
        }
    }
    tracing::debug!(job = %job_id, "polling ended");
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
