// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-core: Domain model for the genwatch report-generation controller

pub mod macros;

pub mod effect;
pub mod gate;
pub mod id;
pub mod session;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use effect::{Effect, ExitReason};
pub use gate::CompletionGate;
pub use id::JobId;
pub use session::{Choice, ControllerState, Session, SessionError, SessionView, UnknownPolicy};
pub use status::{JobStatus, Phase};
