//! `gw status`, `gw reset` and `gw trigger` against a stub platform

use crate::prelude::*;

#[test]
fn status_classifies_failed_step() {
    let stub = StubPlatform::with_status("Step 2 Market Sizing - Fail");
    cli()
        .platform(&stub)
        .args(&["status", "rpt-1"])
        .passes()
        .stdout_has("Phase: failed")
        .stdout_has("Step: 2")
        .stdout_has("Label: Market Sizing");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/rest/v1/reports?id=eq.rpt-1&select=status");
}

#[test]
fn status_json_output() {
    let stub = StubPlatform::with_status("Step 3 - Generating Financials");
    let run = cli().platform(&stub).args(&["status", "rpt-1", "-o", "json"]).passes();
    let value: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(value["status"]["phase"], "in_progress");
    assert_eq!(value["status"]["step"], 3);
}

#[test]
fn status_honours_table_and_column() {
    let stub = StubPlatform::serve(|_| (200, r#"[{"state":"completed"}]"#.to_string()));
    cli()
        .platform(&stub)
        .env("GW_STATUS_TABLE", "validation_reports")
        .env("GW_STATUS_COLUMN", "state")
        .args(&["status", "rpt-1"])
        .passes()
        .stdout_has("Phase: completed");
    assert_eq!(stub.requests()[0].path, "/rest/v1/validation_reports?id=eq.rpt-1&select=state");
}

#[test]
fn missing_job_is_an_error() {
    let stub = StubPlatform::serve(|_| (200, "[]".to_string()));
    cli().platform(&stub).args(&["status", "nope"]).exits_with(1).stderr_has("nope");
}

#[test]
fn reset_patches_status_to_preparing() {
    let stub = StubPlatform::with_status("Step 2 - Fail");
    cli().platform(&stub).args(&["reset", "rpt-1"]).passes().stdout_has("preparing");

    let requests = stub.requests();
    assert_eq!(requests[0].method, "PATCH");
    assert_eq!(requests[0].body, r#"{"status":"preparing"}"#);
}

#[test]
fn trigger_posts_resume_step() {
    let stub = StubPlatform::with_status("");
    cli()
        .platform(&stub)
        .args(&["trigger", "rpt-1", "--from-step", "4"])
        .passes()
        .stdout_has("from step 4");

    let requests = stub.requests();
    assert_eq!(requests[0].path, "/functions/v1/generate-report");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "reportId": "rpt-1", "resumeFromStep": 4 }));
}

#[test]
fn trigger_failure_exits_nonzero() {
    let stub = StubPlatform::serve(|_| (500, "pipeline down".to_string()));
    cli().platform(&stub).args(&["trigger", "rpt-1"]).exits_with(1).stderr_has("500");
}
