// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-adapters: The external collaborators the controller talks to
//!
//! Each collaborator is an async trait with a real implementation and, under
//! the `test-support` feature, a recording fake.

pub mod http;
pub mod navigate;
pub mod notify;
pub mod store;
pub mod trigger;

pub use http::{HttpJobTrigger, HttpPlatform, HttpRecordStore, PlatformConfig};
pub use navigate::{ChannelNavigator, NavigateError, Navigator};
pub use notify::{DesktopNotifyAdapter, NoopNotifyAdapter, NotifyAdapter, NotifyError};
pub use store::{RecordStore, StoreError};
pub use trigger::{JobTrigger, TriggerError};

#[cfg(any(test, feature = "test-support"))]
pub use navigate::FakeNavigator;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use store::{Call, CallLog, FakeRecordStore};
#[cfg(any(test, feature = "test-support"))]
pub use trigger::FakeJobTrigger;
