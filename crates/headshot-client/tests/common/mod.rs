//! Shared helpers: a mock backend served by axum on an ephemeral port.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use headshot_client::{ApiClient, ClientConfig, MemorySessionState, SessionState};

// ── server ───────────────────────────────────────────────────────────────────

/// Serve `routes` under `/api/v1` on 127.0.0.1:0 and return the base URL.
pub async fn spawn_backend(routes: Router) -> String {
    let app = Router::new().nest("/api/v1", routes);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Small yield so the listener is ready.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    format!("http://{addr}/api/v1")
}

/// A base URL on which nothing is listening.
pub async fn dead_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}/api/v1")
}

pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url)).expect("build client")
}

pub fn client_with_session(base_url: &str, session: Arc<MemorySessionState>) -> ApiClient {
    ApiClient::with_session(ClientConfig::new(base_url), session as Arc<dyn SessionState>)
        .expect("build client")
}

// ── replies ──────────────────────────────────────────────────────────────────

pub fn ok(data: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "ok", "data": data })),
    )
        .into_response()
}

pub fn ok_without_data(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": message })),
    )
        .into_response()
}

pub fn fail(status: StatusCode, message: &str, code: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message, "error": code })),
    )
        .into_response()
}

pub fn unauthorized() -> Response {
    fail(StatusCode::UNAUTHORIZED, "Access token expired", "UNAUTHORIZED")
}

pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

// ── refresh endpoint ─────────────────────────────────────────────────────────

/// State behind a mock `/auth/refresh-token`.
#[derive(Debug, Default)]
pub struct RefreshState {
    pub calls: AtomicUsize,
    /// When set, the refresh endpoint answers with this status.
    pub fail_with: std::sync::Mutex<Option<StatusCode>>,
    /// Set after the first successful refresh.
    pub refreshed: AtomicBool,
}

impl RefreshState {
    pub fn failing(status: StatusCode) -> Arc<Self> {
        let state = Self::default();
        *state.fail_with.lock().unwrap() = Some(status);
        Arc::new(state)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_refreshed(&self) -> bool {
        self.refreshed.load(Ordering::SeqCst)
    }
}

/// Router with `POST /auth/refresh-token` backed by `state`. A successful
/// refresh sets a fresh `accessToken` cookie.
pub fn refresh_route(state: Arc<RefreshState>) -> Router {
    Router::new().route(
        "/auth/refresh-token",
        post(move || {
            let state = Arc::clone(&state);
            async move {
                state.calls.fetch_add(1, Ordering::SeqCst);
                let failure = *state.fail_with.lock().unwrap();
                match failure {
                    Some(status) if status == StatusCode::UNAUTHORIZED => unauthorized(),
                    Some(status) => fail(status, "Refresh token expired", "REFRESH_FAILED"),
                    None => {
                        state.refreshed.store(true, Ordering::SeqCst);
                        (
                            StatusCode::OK,
                            [(header::SET_COOKIE, "accessToken=fresh; Path=/; HttpOnly")],
                            Json(json!({ "success": true, "message": "Token refreshed" })),
                        )
                            .into_response()
                    }
                }
            }
        }),
    )
}
