// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller session: the decision state machine for one observed job.
//!
//! A session is created when the controller starts watching a job and is
//! discarded when it stops. It never does I/O; every decision comes back as
//! a list of [`Effect`]s for the executor to carry out.
//!
//! The first observation selects the initial action (fresh start, prompt,
//! failure view, or exit). After that only the completion watch runs, so a
//! status that wanders through intermediate strings cannot re-open the
//! initial decision and issue a second trigger.

use crate::effect::{Effect, ExitReason};
use crate::gate::CompletionGate;
use crate::id::JobId;
use crate::status::JobStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with an initial status the parser could not classify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownPolicy {
    /// Start the pipeline from the beginning.
    #[default]
    FreshStart,
    /// Ask the user first; only Restart is on offer.
    AskUser,
}

crate::simple_display! {
    UnknownPolicy {
        FreshStart => "fresh-start",
        AskUser => "ask",
    }
}

/// Resolution of an `AwaitingUserChoice` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// Continue from the step that was in flight.
    Resume,
    /// Throw away progress and start over.
    Restart,
}

crate::simple_display! {
    Choice {
        Resume => "resume",
        Restart => "restart",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControllerState {
    /// No successful observation yet.
    Uninitialized,
    /// A trigger has been issued (or the job was found mid-flight and the
    /// user chose how to continue); waiting for completion.
    Running,
    /// The job looked mid-flight on arrival. `resume_step` is `None` only
    /// for unclassifiable statuses under [`UnknownPolicy::AskUser`].
    AwaitingUserChoice {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resume_step: Option<u32>,
    },
    /// The pipeline reported a failure.
    Failed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// The completion gate fired.
    Completed,
    /// The user left the failure view to edit their input.
    ReturnedToInput,
}

crate::simple_display! {
    ControllerState {
        Uninitialized => "uninitialized",
        Running => "running",
        AwaitingUserChoice { .. } => "awaiting_user_choice",
        Failed { .. } => "failed",
        Completed => "completed",
        ReturnedToInput => "returned_to_input",
    }
}

impl ControllerState {
    /// Whether further observations can still change anything.
    pub fn wants_polling(&self) -> bool {
        matches!(
            self,
            ControllerState::Uninitialized
                | ControllerState::Running
                | ControllerState::AwaitingUserChoice { .. }
        )
    }
}

/// Errors from user-initiated session transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no in-flight step to resume; restart instead")]
    NothingToResume,
    #[error("job is not in a failed state (state: {0})")]
    NotFailed(String),
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub job_id: JobId,
    #[serde(flatten)]
    pub state: ControllerState,
    /// Latest successful observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    /// Most recent action failure (trigger, reset), for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    job_id: JobId,
    policy: UnknownPolicy,
    state: ControllerState,
    has_decided: bool,
    gate: CompletionGate,
    status: Option<JobStatus>,
    last_error: Option<String>,
}

impl Session {
    pub fn new(job_id: JobId, policy: UnknownPolicy) -> Self {
        Self {
            job_id,
            policy,
            state: ControllerState::Uninitialized,
            has_decided: false,
            gate: CompletionGate::new(),
            status: None,
            last_error: None,
        }
    }

    /// A brand-new session for the same job, as after a page reload.
    pub fn fresh(&self) -> Self {
        Self::new(self.job_id.clone(), self.policy)
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn has_decided(&self) -> bool {
        self.has_decided
    }

    pub fn has_celebrated(&self) -> bool {
        self.gate.has_fired()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            job_id: self.job_id.clone(),
            state: self.state.clone(),
            status: self.status.clone(),
            last_error: self.last_error.clone(),
        }
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Feed one successful status observation into the state machine.
    pub fn observe(&mut self, status: JobStatus) -> Vec<Effect> {
        self.status = Some(status.clone());
        if self.has_decided {
            self.watch(status)
        } else {
            self.decide(status)
        }
    }

    /// Resolve a pending resume/restart prompt.
    ///
    /// Returns no effects when nothing is pending, so a second resolution is
    /// a no-op.
    pub fn choose(&mut self, choice: Choice) -> Result<Vec<Effect>, SessionError> {
        let ControllerState::AwaitingUserChoice { resume_step } = self.state else {
            tracing::debug!(job = %self.job_id, %choice, state = %self.state, "no choice pending");
            return Ok(Vec::new());
        };
        let resume_from = match choice {
            Choice::Resume => Some(resume_step.ok_or(SessionError::NothingToResume)?),
            Choice::Restart => None,
        };
        tracing::info!(job = %self.job_id, %choice, ?resume_from, "user resolved prompt");
        self.has_decided = true;
        self.state = ControllerState::Running;
        Ok(vec![Effect::Trigger { job_id: self.job_id.clone(), resume_from }])
    }

    /// First half of a failed-step retry: the reset write.
    ///
    /// The caller replaces this session with [`Session::fresh`] only after
    /// the reset succeeds; the fresh session's first observation then
    /// takes the fresh-start path.
    pub fn retry(&self) -> Result<Effect, SessionError> {
        match self.state {
            ControllerState::Failed { .. } => {
                Ok(Effect::ResetStatus { job_id: self.job_id.clone() })
            }
            ref other => Err(SessionError::NotFailed(other.to_string())),
        }
    }

    /// Leave the failure view for the input-collection stage.
    pub fn return_to_input(&mut self) -> Result<Vec<Effect>, SessionError> {
        if !matches!(self.state, ControllerState::Failed { .. }) {
            return Err(SessionError::NotFailed(self.state.to_string()));
        }
        self.state = ControllerState::ReturnedToInput;
        Ok(vec![Effect::Exit { job_id: self.job_id.clone(), reason: ExitReason::ReturnToInput }])
    }

    fn decide(&mut self, status: JobStatus) -> Vec<Effect> {
        self.has_decided = true;
        tracing::info!(job = %self.job_id, phase = %status.phase(), step = ?status.step(), "initial decision");
        match status {
            JobStatus::Preparing => self.fresh_start(),
            JobStatus::Unknown => match self.policy {
                UnknownPolicy::FreshStart => self.fresh_start(),
                UnknownPolicy::AskUser => {
                    self.state = ControllerState::AwaitingUserChoice { resume_step: None };
                    Vec::new()
                }
            },
            JobStatus::InProgress { step } => {
                self.state = ControllerState::AwaitingUserChoice { resume_step: Some(step) };
                Vec::new()
            }
            JobStatus::Failed { step, label } => {
                self.state = ControllerState::Failed { step, label };
                Vec::new()
            }
            JobStatus::Completed => self.complete(),
        }
    }

    fn watch(&mut self, status: JobStatus) -> Vec<Effect> {
        match status {
            JobStatus::Completed => self.complete(),
            JobStatus::Failed { step, label } if self.state.wants_polling() => {
                tracing::warn!(job = %self.job_id, ?step, ?label, "pipeline reported failure");
                self.state = ControllerState::Failed { step, label };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn fresh_start(&mut self) -> Vec<Effect> {
        self.state = ControllerState::Running;
        vec![Effect::Trigger { job_id: self.job_id.clone(), resume_from: None }]
    }

    fn complete(&mut self) -> Vec<Effect> {
        if !self.gate.try_fire() {
            return Vec::new();
        }
        tracing::info!(job = %self.job_id, "job completed");
        self.state = ControllerState::Completed;
        vec![
            Effect::Celebrate { job_id: self.job_id.clone() },
            Effect::Exit { job_id: self.job_id.clone(), reason: ExitReason::Completed },
        ]
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
