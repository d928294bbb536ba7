// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{JobId, JobStatus};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for raw and classified status values.
pub mod strategies {
    use crate::JobStatus;
    use proptest::prelude::*;

    /// `step` in a random letter case.
    fn arb_step_word() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<bool>(), 4).prop_map(|upper| {
            "step"
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    /// An in-flight raw status and the step number it carries.
    ///
    /// The suffix never starts with a digit, so the generated number is the
    /// whole leading integer.
    pub fn arb_in_progress_raw() -> impl Strategy<Value = (String, u32)> {
        (arb_step_word(), "[ \t]{0,3}", any::<u32>(), "( [A-Za-z ]{0,24})?")
            .prop_filter("suffix must not mention failure", |(_, _, _, suffix)| {
                !suffix.to_lowercase().contains("fail")
            })
            .prop_map(|(word, ws, step, suffix)| (format!("{}{}{}{}", word, ws, step, suffix), step))
    }

    /// A raw status that mentions failure somewhere.
    pub fn arb_failing_raw() -> impl Strategy<Value = String> {
        (".{0,16}", prop_oneof![Just("fail"), Just("FAIL"), Just("Fail"), Just("fAiLeD")], ".{0,16}")
            .prop_map(|(head, fail, tail)| format!("{}{}{}", head, fail, tail))
    }

    /// Any raw status value, including absent.
    pub fn arb_raw_status() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some("preparing".to_string())),
            Just(Some("completed".to_string())),
            arb_in_progress_raw().prop_map(|(raw, _)| Some(raw)),
            arb_failing_raw().prop_map(Some),
            ".{0,24}".prop_map(Some),
        ]
    }

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Preparing),
            (1u32..12).prop_map(|step| JobStatus::InProgress { step }),
            (proptest::option::of(1u32..12), proptest::option::of("[A-Za-z ]{1,12}"))
                .prop_map(|(step, label)| JobStatus::Failed { step, label }),
            Just(JobStatus::Completed),
            Just(JobStatus::Unknown),
        ]
    }
}

// ── Factory functions ─────────────────────────────────────────────────

pub fn job_id(id: &str) -> JobId {
    JobId::new(id)
}

pub fn in_progress(step: u32) -> JobStatus {
    JobStatus::InProgress { step }
}

pub fn failed_at(step: u32, label: &str) -> JobStatus {
    JobStatus::Failed { step: Some(step), label: Some(label.to_string()) }
}
