//! Shared helpers for CLI specs
//!
//! `cli()` runs the `gw` binary with a scrubbed environment; `StubPlatform`
//! answers the REST and function endpoints from an axum server on a
//! background thread.

#![allow(dead_code)]

use std::process::Output;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;

pub use assert_cmd::Command;

const GW_VARS: &[&str] = &[
    "GW_API_URL",
    "GW_API_KEY",
    "GW_STATUS_TABLE",
    "GW_STATUS_COLUMN",
    "GW_TRIGGER_FUNCTION",
    "GW_POLL_INTERVAL_MS",
    "GW_HTTP_TIMEOUT_MS",
    "GW_UNKNOWN_POLICY",
];

pub fn cli() -> Cli {
    #[allow(clippy::expect_used)]
    let mut cmd = Command::cargo_bin("gw").expect("gw binary is built");
    for var in GW_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").timeout(std::time::Duration::from_secs(30));
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Point the binary at a stub platform with a fast poll interval.
    pub fn platform(self, stub: &StubPlatform) -> Self {
        self.env("GW_API_URL", &stub.url).env("GW_POLL_INTERVAL_MS", "20")
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    fn output(mut self) -> Output {
        #[allow(clippy::expect_used)]
        self.cmd.output().expect("gw runs")
    }

    pub fn passes(self) -> Run {
        let run = Run { output: self.output() };
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    pub fn exits_with(self, code: i32) -> Run {
        let run = Run { output: self.output() };
        assert_eq!(run.output.status.code(), Some(code), "unexpected exit code\n{}", run.describe());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    fn describe(&self) -> String {
        format!("--- stdout ---\n{}\n--- stderr ---\n{}", self.stdout(), self.stderr())
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {:?}\n{}", needle, self.describe());
        self
    }
}

/// One request received by the stub
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

type Responder = dyn Fn(&Request) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct Stub {
    respond: Arc<Responder>,
    requests: Arc<Mutex<Vec<Request>>>,
}

#[allow(clippy::unwrap_used)]
async fn answer(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or(uri.path()).to_string();
    let request = Request { method: method.to_string(), path, body };
    let (status, body) = (stub.respond)(&request);
    stub.requests.lock().unwrap().push(request);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// HTTP server standing in for the hosted platform.
pub struct StubPlatform {
    pub url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl StubPlatform {
    #[allow(clippy::unwrap_used)]
    pub fn serve(respond: impl Fn(&Request) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stub = Stub { respond: Arc::new(respond), requests: Arc::clone(&requests) };

        // Own runtime so specs stay plain #[test]s; the thread dies with the test binary
        std::thread::spawn(move || {
            let runtime =
                tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().fallback(answer).with_state(stub);
                let _ = axum::serve(listener, app).await;
            });
        });
        Self { url, requests }
    }

    /// Serve a fixed status string for every read and accept every write.
    pub fn with_status(status: &str) -> Self {
        let row = serde_json::json!([{ "status": status }]).to_string();
        Self::serve(move |req| match req.method.as_str() {
            "GET" => (200, row.clone()),
            _ => (200, String::new()),
        })
    }

    #[allow(clippy::unwrap_used)]
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than status reads, as `METHOD path`.
    pub fn writes(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}
