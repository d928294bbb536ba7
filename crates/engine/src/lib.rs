// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-engine: Drives one report-generation job to completion
//!
//! A [`Controller`] owns a [`gw_core::Session`], a [`PollLoop`] feeding it
//! observations, and an [`Executor`] carrying out the session's effects.

pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod poll;

pub use config::{parse_duration, ControllerConfig, DEFAULT_POLL_INTERVAL};
pub use controller::{Controller, ControllerHandle, Outcome};
pub use error::ControllerError;
pub use executor::{ExecuteError, Executor};
pub use poll::PollLoop;

/// The external collaborators a controller talks to
#[derive(Clone)]
pub struct ControllerDeps<S, T, N, V> {
    pub store: S,
    pub trigger: T,
    pub notifier: N,
    pub navigator: V,
}
