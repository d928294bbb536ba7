// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Navigation callback supplied by the host application

use async_trait::async_trait;
use gw_core::{ExitReason, JobId};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("host is no longer listening for navigation")]
    Closed,
}

/// Hands control back to the host once the controller is done with a job.
#[async_trait]
pub trait Navigator: Clone + Send + Sync + 'static {
    async fn exit(&self, job_id: &JobId, reason: ExitReason) -> Result<(), NavigateError>;
}

/// Navigator that forwards exits over a channel to whoever owns the view.
#[derive(Clone, Debug)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<(JobId, ExitReason)>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(JobId, ExitReason)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Navigator for ChannelNavigator {
    async fn exit(&self, job_id: &JobId, reason: ExitReason) -> Result<(), NavigateError> {
        self.tx.send((job_id.clone(), reason)).map_err(|_| NavigateError::Closed)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NavigateError, Navigator};
    use async_trait::async_trait;
    use gw_core::{ExitReason, JobId};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake navigator recording every exit
    #[derive(Clone, Default)]
    pub struct FakeNavigator {
        exits: Arc<Mutex<Vec<(JobId, ExitReason)>>>,
    }

    impl FakeNavigator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn exits(&self) -> Vec<(JobId, ExitReason)> {
            self.exits.lock().clone()
        }
    }

    #[async_trait]
    impl Navigator for FakeNavigator {
        async fn exit(&self, job_id: &JobId, reason: ExitReason) -> Result<(), NavigateError> {
            self.exits.lock().push((job_id.clone(), reason));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNavigator;
