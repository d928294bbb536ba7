// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot latch guarding the "job finished" side effects.

/// Fires at most once per controller session.
///
/// Not synchronized: the session that owns it processes observations one at
/// a time, so a plain check-and-set is atomic with respect to that stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompletionGate {
    fired: bool,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once; every later call returns `false`.
    pub fn try_fire(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
