//! `gw watch` end to end against a stub platform

use crate::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn row(status: &str) -> String {
    serde_json::json!([{ "status": status }]).to_string()
}

#[test]
fn completed_job_exits_zero_without_trigger() {
    let stub = StubPlatform::with_status("completed");
    cli()
        .platform(&stub)
        .args(&["watch", "rpt-1", "--no-notify"])
        .passes()
        .stdout_has("Report rpt-1 is ready");
    assert!(stub.writes().is_empty());
}

#[test]
fn fresh_job_is_triggered_once_then_completes() {
    let triggered = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&triggered);
    let stub = StubPlatform::serve(move |req| match req.method.as_str() {
        "POST" => {
            seen.store(true, Ordering::SeqCst);
            (200, "{}".to_string())
        }
        _ if seen.load(Ordering::SeqCst) => (200, row("completed")),
        _ => (200, row("preparing")),
    });

    cli().platform(&stub).args(&["watch", "rpt-1", "--no-notify"]).passes().stdout_has("is ready");

    assert_eq!(stub.writes(), vec!["POST /functions/v1/generate-report".to_string()]);
    let post = stub.requests().into_iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(post.body, r#"{"reportId":"rpt-1"}"#);
}

#[test]
fn interrupted_job_resumes_from_step_when_asked_in_advance() {
    let triggered = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&triggered);
    let stub = StubPlatform::serve(move |req| match req.method.as_str() {
        "POST" => {
            seen.store(true, Ordering::SeqCst);
            (200, "{}".to_string())
        }
        _ if seen.load(Ordering::SeqCst) => (200, row("completed")),
        _ => (200, row("Step 3 - Generating Financials")),
    });

    cli()
        .platform(&stub)
        .args(&["watch", "rpt-1", "--no-notify", "--on-resume", "resume"])
        .passes();

    let post = stub.requests().into_iter().find(|r| r.method == "POST").unwrap();
    let body: serde_json::Value = serde_json::from_str(&post.body).unwrap();
    assert_eq!(body["resumeFromStep"], 3);
}

#[test]
fn interrupted_job_prompts_on_stdin() {
    let triggered = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&triggered);
    let stub = StubPlatform::serve(move |req| match req.method.as_str() {
        "POST" => {
            seen.store(true, Ordering::SeqCst);
            (200, "{}".to_string())
        }
        _ if seen.load(Ordering::SeqCst) => (200, row("completed")),
        _ => (200, row("Step 3 - Generating Financials")),
    });

    cli()
        .platform(&stub)
        .args(&["watch", "rpt-1", "--no-notify"])
        .stdin("s\n")
        .passes()
        .stderr_has("interrupted at step 3");

    let post = stub.requests().into_iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(post.body, r#"{"reportId":"rpt-1"}"#);
}

#[test]
fn failed_job_returns_to_input_with_code_two() {
    let stub = StubPlatform::with_status("Step 2 SomeStep - Fail");
    cli()
        .platform(&stub)
        .args(&["watch", "rpt-1", "--no-notify"])
        .stdin("b\n")
        .exits_with(2)
        .stdout_has("failed")
        .stdout_has("Returning to input for rpt-1")
        .stderr_has("Generation failed at step 2 (SomeStep)");
    assert!(stub.writes().is_empty());
}

#[test]
fn failed_job_retry_resets_before_triggering() {
    let reset = Arc::new(AtomicBool::new(false));
    let triggered = Arc::new(AtomicBool::new(false));
    let (reset_seen, trigger_seen) = (Arc::clone(&reset), Arc::clone(&triggered));
    let stub = StubPlatform::serve(move |req| match req.method.as_str() {
        "PATCH" => {
            reset_seen.store(true, Ordering::SeqCst);
            (200, String::new())
        }
        "POST" => {
            trigger_seen.store(true, Ordering::SeqCst);
            (200, "{}".to_string())
        }
        _ if trigger_seen.load(Ordering::SeqCst) => (200, row("completed")),
        _ if reset_seen.load(Ordering::SeqCst) => (200, row("preparing")),
        _ => (200, row("Step 2 SomeStep - Fail")),
    });

    cli().platform(&stub).args(&["watch", "rpt-1", "--no-notify"]).stdin("r\n").passes();

    assert_eq!(
        stub.writes(),
        vec![
            "PATCH /rest/v1/reports?id=eq.rpt-1".to_string(),
            "POST /functions/v1/generate-report".to_string(),
        ]
    );
}

#[test]
fn failed_job_without_answer_is_an_error() {
    let stub = StubPlatform::with_status("Generation failed");
    cli()
        .platform(&stub)
        .args(&["watch", "rpt-1", "--no-notify"])
        .exits_with(1)
        .stderr_has("no answer on stdin");
}
