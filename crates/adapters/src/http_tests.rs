// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;

/// A request as the stub platform saw it
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    /// Path and query
    uri: String,
    headers: HeaderMap,
    body: String,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn answer(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    stub.seen.lock().push(Seen {
        method,
        uri: uri.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    (stub.status, stub.body)
}

/// Serve every request with `status` and `body`, recording what arrives.
async fn serve(status: u16, body: &'static str) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub { status: StatusCode::from_u16(status).unwrap(), body, seen: seen.clone() };
    let app = Router::new().fallback(answer).with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    (format!("http://{}", addr), seen)
}

fn only(seen: &Arc<Mutex<Vec<Seen>>>) -> Seen {
    let seen = seen.lock();
    assert_eq!(seen.len(), 1, "expected one request, got {:?}", *seen);
    seen[0].clone()
}

fn platform(base_url: String) -> HttpPlatform {
    HttpPlatform::new(config(base_url)).unwrap()
}

fn config(base_url: String) -> PlatformConfig {
    let mut config = PlatformConfig::new(base_url);
    config.api_key = Some("anon-key".to_string());
    config
}

fn job() -> JobId {
    JobId::new("8f14e45f")
}

#[tokio::test]
async fn read_status_queries_row_and_column() {
    let (url, seen) = serve(200, r#"[{"status":"Step 3 - Generating Financials"}]"#).await;
    let store = platform(url).store();

    let status = store.read_status(&job()).await.unwrap();
    assert_eq!(status.as_deref(), Some("Step 3 - Generating Financials"));

    let request = only(&seen);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.uri, "/rest/v1/reports?id=eq.8f14e45f&select=status");
    assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    assert_eq!(request.header("apikey"), Some("anon-key"));
}

#[yare::parameterized(
    null_column    = { r#"[{"status":null}]"# },
    missing_column = { r#"[{}]"# },
)]
fn read_status_empty_column_is_absent(body: &'static str) {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
        let (url, _seen) = serve(200, body).await;
        let store = platform(url).store();
        assert_eq!(store.read_status(&job()).await.unwrap(), None);
    });
}

#[tokio::test]
async fn read_status_missing_row_is_not_found() {
    let (url, _seen) = serve(200, "[]").await;
    let store = platform(url).store();
    let err = store.read_status(&job()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "8f14e45f"));
}

#[tokio::test]
async fn read_status_maps_http_errors() {
    let (url, _seen) = serve(401, r#"{"message":"JWT expired"}"#).await;
    let store = platform(url).store();
    let err = store.read_status(&job()).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 401, .. }), "got {err:?}");
}

#[tokio::test]
async fn read_status_rejects_non_string_column() {
    let (url, _seen) = serve(200, r#"[{"status":7}]"#).await;
    let store = platform(url).store();
    assert!(matches!(store.read_status(&job()).await, Err(StoreError::InvalidResponse(_))));
}

#[tokio::test]
async fn reset_status_patches_preparing() {
    let (url, seen) = serve(200, "").await;
    let store = platform(url).store();
    store.reset_status(&job()).await.unwrap();

    let request = only(&seen);
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.uri, "/rest/v1/reports?id=eq.8f14e45f");
    assert_eq!(request.header("prefer"), Some("return=minimal"));
    assert_eq!(request.body, r#"{"status":"preparing"}"#);
}

#[tokio::test]
async fn trigger_posts_report_id_and_resume_step() {
    let (url, seen) = serve(200, "{}").await;
    let trigger = platform(url).trigger();
    trigger.trigger(&job(), Some(3)).await.unwrap();

    let request = only(&seen);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.uri, "/functions/v1/generate-report");
    assert_eq!(request.body, r#"{"reportId":"8f14e45f","resumeFromStep":3}"#);
}

#[tokio::test]
async fn trigger_omits_resume_step_for_fresh_start() {
    let (url, seen) = serve(200, "{}").await;
    let trigger = platform(url).trigger();
    trigger.trigger(&job(), None).await.unwrap();
    assert_eq!(only(&seen).body, r#"{"reportId":"8f14e45f"}"#);
}

#[tokio::test]
async fn trigger_surfaces_server_error() {
    let (url, _seen) = serve(500, "boom").await;
    let trigger = platform(url).trigger();
    let err = trigger.trigger(&job(), None).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500: boom");
}

#[tokio::test]
async fn store_and_trigger_share_one_platform_client() {
    let (url, seen) = serve(200, r#"[{"status":"preparing"}]"#).await;
    let platform = platform(url);
    let store = platform.store();
    let trigger = platform.trigger();
    assert!(Arc::ptr_eq(&store.platform.config, &trigger.platform.config));

    store.read_status(&job()).await.unwrap();
    trigger.trigger(&job(), None).await.unwrap();
    let methods: Vec<Method> = seen.lock().iter().map(|r| r.method.clone()).collect();
    assert_eq!(methods, vec![Method::GET, Method::POST]);
}

#[test]
fn endpoint_tolerates_trailing_slash() {
    let config = PlatformConfig::new("https://example.test/");
    assert_eq!(config.endpoint("rest/v1/reports"), "https://example.test/rest/v1/reports");
}
