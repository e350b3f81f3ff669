use std::sync::Arc;

use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    posted: Arc<Mutex<Vec<Value>>>,
}

async fn handle_status() -> Json<Value> {
    Json(json!({"show": "3", "status": "Running", "loop": "0"}))
}

async fn handle_broken() -> (StatusCode, &'static str) {
    (StatusCode::OK, "{not json")
}

async fn handle_missing() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn handle_command(State(state): State<ServerState>, Json(body): Json<Value>) -> &'static str {
    state.posted.lock().await.push(body);
    "<html><body><h1>OK</h1></body></html>"
}

async fn spawn_server(prefix: &str) -> anyhow::Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route(&format!("{prefix}/showfile/status"), get(handle_status))
        .route(&format!("{prefix}/showfile/directory"), get(handle_broken))
        .route(&format!("{prefix}/showfile/failing"), get(handle_missing))
        .route(&format!("{prefix}/showfile"), post(handle_command))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}{prefix}"), state))
}

#[test]
fn normalize_appends_trailing_slash() {
    let url = normalize_base_url("http://device.local/json").expect("url");
    assert_eq!(url.as_str(), "http://device.local/json/");
    assert_eq!(
        url.join("showfile/status").expect("join").as_str(),
        "http://device.local/json/showfile/status"
    );

    let root = normalize_base_url("http://device.local").expect("url");
    assert_eq!(root.as_str(), "http://device.local/");
}

#[test]
fn normalize_rejects_unusable_base() {
    assert!(matches!(
        normalize_base_url("not a url"),
        Err(TransportError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        normalize_base_url("mailto:player@example.com"),
        Err(TransportError::InvalidBaseUrl { .. })
    ));
}

#[tokio::test]
async fn get_json_returns_decoded_body() {
    let (base, _) = spawn_server("").await.expect("spawn server");
    let transport = HttpTransport::new(&base).expect("transport");

    let body = transport.get_json("showfile/status").await.expect("get");
    assert_eq!(body["status"], json!("Running"));
}

#[tokio::test]
async fn base_path_prefix_is_kept_when_joining() {
    let (base, _) = spawn_server("/json").await.expect("spawn server");
    let transport = HttpTransport::new(&base).expect("transport");

    let body = transport.get_json("/showfile/status").await.expect("get");
    assert_eq!(body["show"], json!("3"));
}

#[tokio::test]
async fn invalid_json_is_reported_as_body_error() {
    let (base, _) = spawn_server("").await.expect("spawn server");
    let transport = HttpTransport::new(&base).expect("transport");

    let err = transport
        .get_json("showfile/directory")
        .await
        .expect_err("broken body");
    assert!(matches!(err, TransportError::Body { .. }), "{err}");
    assert_eq!(err.code(), shared::error::ErrorCode::MalformedBody);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (base, _) = spawn_server("").await.expect("spawn server");
    let transport = HttpTransport::new(&base).expect("transport");

    let err = transport
        .get_json("showfile/failing")
        .await
        .expect_err("server error");
    assert!(matches!(err, TransportError::Status { status: 500, .. }), "{err}");

    let err = transport
        .get_json("showfile/unknown")
        .await
        .expect_err("not found");
    assert!(matches!(err, TransportError::Status { status: 404, .. }), "{err}");
}

#[tokio::test]
async fn post_json_delivers_body_and_ignores_response() {
    let (base, state) = spawn_server("").await.expect("spawn server");
    let transport = HttpTransport::new(&base).expect("transport");

    transport
        .post_json("showfile", &json!({"show": "", "status": "stop"}))
        .await
        .expect("post");

    let posted = state.posted.lock().await;
    assert_eq!(posted.as_slice(), [json!({"show": "", "status": "stop"})]);
}

#[tokio::test]
async fn unreachable_player_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport =
        HttpTransport::with_timeout(&format!("http://{addr}"), Duration::from_secs(2))
            .expect("transport");
    let err = transport
        .get_json("showfile/status")
        .await
        .expect_err("nothing listening");
    assert_eq!(err.code(), shared::error::ErrorCode::Transport);
}
