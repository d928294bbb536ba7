// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Celebration side effect fired once when a report finishes

use async_trait::async_trait;
use gw_core::JobId;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for the one-time "report ready" celebration
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn celebrate(&self, job_id: &JobId) -> Result<(), NotifyError>;
}

/// Desktop notification via notify-rust.
///
/// On macOS the first notification otherwise runs an AppleScript bundle
/// lookup that can block forever in a process without Automation
/// permissions, so the bundle identifier is pre-set at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn celebrate(&self, job_id: &JobId) -> Result<(), NotifyError> {
        let job = job_id.clone();
        let body = format!("Your validation report {} is ready.", job_id.short(12));
        // show() is synchronous on macOS; fire-and-forget on the blocking pool
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary("Report ready").body(&body).show() {
                Ok(_) => tracing::info!(job = %job, "desktop notification sent"),
                Err(e) => tracing::warn!(job = %job, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}

/// Notifier for headless hosts
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifyAdapter;

#[async_trait]
impl NotifyAdapter for NoopNotifyAdapter {
    async fn celebrate(&self, job_id: &JobId) -> Result<(), NotifyError> {
        tracing::debug!(job = %job_id, "celebration skipped (no notifier)");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use gw_core::JobId;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Fake notifier for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        celebrated: Arc<Mutex<Vec<JobId>>>,
        fail: Arc<Mutex<bool>>,
        delay: Arc<Mutex<Option<Duration>>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail(&self, fail: bool) {
            *self.fail.lock() = fail;
        }

        /// Stall each celebration for `delay` before it is recorded
        pub fn delay(&self, delay: Duration) {
            *self.delay.lock() = Some(delay);
        }

        /// Celebrations that ran to completion
        pub fn celebrated(&self) -> Vec<JobId> {
            self.celebrated.lock().clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn celebrate(&self, job_id: &JobId) -> Result<(), NotifyError> {
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.celebrated.lock().push(job_id.clone());
            if *self.fail.lock() {
                return Err(NotifyError::SendFailed("no display".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;
