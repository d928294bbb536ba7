// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller task: one per observed job.
//!
//! The task owns the session and is the only thing that mutates it. Poll
//! observations and user commands are consumed from one `select!` loop, so
//! reactions to them never interleave.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::executor::Executor;
use crate::poll::PollLoop;
use crate::ControllerDeps;
use gw_adapters::{JobTrigger, Navigator, NotifyAdapter, RecordStore};
use gw_core::{Choice, ControllerState, Effect, JobId, JobStatus, Session, SessionView};
use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// How long a finished controller lets detached celebrations run on.
const CELEBRATION_GRACE: Duration = Duration::from_secs(2);

type Reply = oneshot::Sender<Result<(), ControllerError>>;

enum Command {
    Choose(Choice, Reply),
    Retry(Reply),
    ReturnToInput(Reply),
}

/// How a controller session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The completion gate fired and the host was sent to the finished view.
    Completed,
    /// The user abandoned a failed job.
    ReturnedToInput,
    /// Torn down before reaching either of the above.
    Stopped,
}

gw_core::simple_display! {
    Outcome {
        Completed => "completed",
        ReturnedToInput => "returned_to_input",
        Stopped => "stopped",
    }
}

pub struct Controller<S, T, N, V> {
    session: Session,
    executor: Executor<S, T, N, V>,
    config: ControllerConfig,
    poll: Option<PollLoop>,
    observations: mpsc::Receiver<JobStatus>,
    commands: mpsc::Receiver<Command>,
    view: watch::Sender<SessionView>,
    /// Cancelled by the handle; parent of every poll loop's token.
    shutdown: CancellationToken,
    /// Best-effort effects running alongside the session
    background: JoinSet<()>,
}

impl<S, T, N, V> Controller<S, T, N, V>
where
    S: RecordStore,
    T: JobTrigger,
    N: NotifyAdapter,
    V: Navigator,
{
    /// Start observing `job_id` on the current tokio runtime.
    pub fn spawn(
        job_id: JobId,
        deps: ControllerDeps<S, T, N, V>,
        config: ControllerConfig,
    ) -> ControllerHandle {
        let session = Session::new(job_id, config.unknown_policy);
        let (view, view_rx) = watch::channel(session.view());
        let (command_tx, commands) = mpsc::channel(8);
        // Replaced by start_polling before the first select
        let (_, observations) = mpsc::channel(1);
        let shutdown = CancellationToken::new();

        let controller = Self {
            session,
            executor: Executor::new(deps),
            config,
            poll: None,
            observations,
            commands,
            view,
            shutdown: shutdown.clone(),
            background: JoinSet::new(),
        };
        let task = tokio::spawn(controller.run());
        ControllerHandle { commands: command_tx, view: view_rx, shutdown, task }
    }

    async fn run(mut self) -> Outcome {
        tracing::info!(job = %self.session.job_id(), "controller started");
        self.start_polling();

        let shutdown = self.shutdown.clone();
        let outcome = loop {
            let finished = tokio::select! {
                biased;
                _ = shutdown.cancelled() => false,
                command = self.commands.recv() => match command {
                    Some(command) => {
                        unless_stopped(&shutdown, self.handle_command(command)).await
                    }
                    None => false,
                },
                Some(status) = self.observations.recv() => {
                    unless_stopped(&shutdown, self.handle_observation(status)).await
                }
            };
            if !finished {
                break Outcome::Stopped;
            }

            match self.session.state() {
                ControllerState::Completed => break Outcome::Completed,
                ControllerState::ReturnedToInput => break Outcome::ReturnedToInput,
                _ => {}
            }
        };

        self.stop_polling();
        if outcome != Outcome::Stopped {
            self.settle_background().await;
        }
        tracing::info!(job = %self.session.job_id(), %outcome, "controller stopped");
        outcome
    }

    fn start_polling(&mut self) {
        let (tx, rx) = mpsc::channel(4);
        // Swapping the receiver discards anything a previous loop still had queued
        self.observations = rx;
        self.poll = Some(PollLoop::spawn(
            self.executor.store().clone(),
            self.session.job_id().clone(),
            self.config.poll_interval,
            tx,
            &self.shutdown,
        ));
    }

    fn stop_polling(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.session.view());
    }

    async fn handle_observation(&mut self, status: JobStatus) {
        let effects = self.session.observe(status);
        self.apply(effects).await;
        if !self.session.state().wants_polling() {
            self.stop_polling();
        }
        self.publish();
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Choose(choice, reply) => {
                let result = match self.session.choose(choice) {
                    Ok(effects) => {
                        self.apply(effects).await;
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                };
                self.publish();
                let _ = reply.send(result);
            }
            Command::Retry(reply) => {
                let result = self.retry().await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::ReturnToInput(reply) => {
                let result = match self.session.return_to_input() {
                    Ok(effects) => {
                        self.apply(effects).await;
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                };
                self.publish();
                let _ = reply.send(result);
            }
        }
    }

    /// Reset the record to `preparing`, then start over with a fresh session.
    ///
    /// Nothing is triggered here: the fresh session's first observation
    /// takes the fresh-start path. A failed reset leaves the failure view
    /// untouched apart from `last_error`.
    async fn retry(&mut self) -> Result<(), ControllerError> {
        let reset = self.session.retry()?;
        if let Err(e) = self.executor.execute(reset).await {
            self.session.record_error(format!("reset failed: {}", e));
            return Err(ControllerError::ResetFailed(e));
        }

        tracing::info!(job = %self.session.job_id(), "status reset, restarting session");
        self.stop_polling();
        self.session = self.session.fresh();
        self.start_polling();
        Ok(())
    }

    /// Execute effects in order. Failures are recorded on the session rather
    /// than propagated: the pipeline's own status is the failure signal.
    ///
    /// Celebration runs detached so the exit that follows it never waits.
    async fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if matches!(effect, Effect::Celebrate { .. }) {
                let executor = self.executor.clone();
                // Already logged by the executor
                self.background.spawn(async move {
                    let _ = executor.execute(effect).await;
                });
                continue;
            }
            let name = effect.name();
            let is_trigger = matches!(effect, Effect::Trigger { .. });
            match self.executor.execute(effect).await {
                Ok(()) if is_trigger => self.session.clear_error(),
                Ok(()) => {}
                Err(e) => self.session.record_error(format!("{} failed: {}", name, e)),
            }
        }
    }

    /// Give detached effects a bounded window to finish; the rest are aborted
    /// when the set is dropped.
    async fn settle_background(&mut self) {
        let background = &mut self.background;
        let drained = tokio::time::timeout(CELEBRATION_GRACE, async {
            while background.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(job = %self.session.job_id(), "abandoning unfinished celebration");
        }
    }
}

/// Run `work` unless `shutdown` fires first. Returns false if it was cut short.
async fn unless_stopped(shutdown: &CancellationToken, work: impl Future<Output = ()>) -> bool {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => false,
        _ = work => true,
    }
}

/// Host-side handle to a running controller.
///
/// Dropping the handle tears the controller down.
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<SessionView>,
    shutdown: CancellationToken,
    task: JoinHandle<Outcome>,
}

impl ControllerHandle {
    /// Latest published view
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Wait until the published view satisfies `pred`.
    ///
    /// Fails with [`ControllerError::Stopped`] if the controller exits first.
    pub async fn wait_for(
        &self,
        mut pred: impl FnMut(&SessionView) -> bool,
    ) -> Result<SessionView, ControllerError> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(|v| pred(v)).await.map_err(|_| ControllerError::Stopped)?;
        Ok(view.clone())
    }

    /// Resolve a resume/restart prompt.
    pub async fn choose(&self, choice: Choice) -> Result<(), ControllerError> {
        self.request(|reply| Command::Choose(choice, reply)).await
    }

    /// Retry a failed job from scratch.
    pub async fn retry(&self) -> Result<(), ControllerError> {
        self.request(Command::Retry).await
    }

    /// Abandon a failed job and return to the input stage.
    pub async fn return_to_input(&self) -> Result<(), ControllerError> {
        self.request(Command::ReturnToInput).await
    }

    /// Tear the controller down. Takes effect immediately, even while an
    /// effect is in flight, which is abandoned. Idempotent.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the controller to end on its own.
    pub async fn join(mut self) -> Result<Outcome, ControllerError> {
        (&mut self.task).await.map_err(|e| ControllerError::Task(e.to_string()))
    }

    async fn request(&self, command: impl FnOnce(Reply) -> Command) -> Result<(), ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| ControllerError::Stopped)?;
        rx.await.map_err(|_| ControllerError::Stopped)?
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
