// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::ControllerDeps;
use gw_adapters::{
    JobTrigger, NavigateError, Navigator, NotifyAdapter, NotifyError, RecordStore, StoreError,
    TriggerError,
};
use gw_core::Effect;
use thiserror::Error;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("trigger error: {0}")]
    Trigger(#[from] TriggerError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("navigation error: {0}")]
    Navigate(#[from] NavigateError),
}

/// Executes effects using the configured adapters
#[derive(Clone)]
pub struct Executor<S, T, N, V> {
    store: S,
    trigger: T,
    notifier: N,
    navigator: V,
}

impl<S, T, N, V> Executor<S, T, N, V>
where
    S: RecordStore,
    T: JobTrigger,
    N: NotifyAdapter,
    V: Navigator,
{
    pub fn new(deps: ControllerDeps<S, T, N, V>) -> Self {
        Self {
            store: deps.store,
            trigger: deps.trigger,
            notifier: deps.notifier,
            navigator: deps.navigator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<(), ExecuteError> {
        let info = effect
            .fields()
            .into_iter()
            .map(|(key, val)| format!("{}={}", key, val))
            .collect::<Vec<_>>()
            .join(" ");
        let op = effect.name();

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => tracing::info!(elapsed_ms, "executed effect={} {}", op, info),
            Err(e) => tracing::error!(error = %e, elapsed_ms, "error effect={} {}", op, info),
        }
        result
    }

    async fn execute_inner(&self, effect: Effect) -> Result<(), ExecuteError> {
        match effect {
            Effect::Trigger { job_id, resume_from } => {
                self.trigger.trigger(&job_id, resume_from).await?;
            }
            Effect::ResetStatus { job_id } => {
                self.store.reset_status(&job_id).await?;
            }
            Effect::Celebrate { job_id } => {
                self.notifier.celebrate(&job_id).await?;
            }
            Effect::Exit { job_id, reason } => {
                self.navigator.exit(&job_id, reason).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
