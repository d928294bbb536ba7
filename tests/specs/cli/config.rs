//! Configuration errors surface before any network traffic

use crate::prelude::*;

#[test]
fn status_requires_api_url() {
    cli().args(&["status", "rpt-1"]).exits_with(1).stderr_has("GW_API_URL is not set");
}

#[test]
fn watch_requires_api_url() {
    cli().args(&["watch", "rpt-1"]).exits_with(1).stderr_has("GW_API_URL is not set");
}

#[test]
fn watch_rejects_bad_interval() {
    cli()
        .args(&["watch", "rpt-1", "--interval", "soon"])
        .exits_with(2)
        .stderr_has("invalid number in duration");
}

#[test]
fn unreachable_platform_is_an_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    cli()
        .env("GW_API_URL", &url)
        .env("GW_HTTP_TIMEOUT_MS", "2000")
        .args(&["status", "rpt-1"])
        .exits_with(1)
        .stderr_has("error:");
}
