// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller error types

use crate::executor::ExecuteError;
use gw_core::SessionError;
use thiserror::Error;

/// Errors returned to callers of a [`crate::ControllerHandle`]
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("status reset failed, retry not started: {0}")]
    ResetFailed(#[source] ExecuteError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error("controller is no longer running")]
    Stopped,
    #[error("controller task failed: {0}")]
    Task(String),
}
