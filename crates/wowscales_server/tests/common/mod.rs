//! Shared fixtures for driving the router in-process.

#![allow(dead_code)]

pub use axum::body::{to_bytes, Body};
pub use axum::http::{Request, StatusCode};
pub use serde_json::{json, Value};
pub use tower::ServiceExt;

use axum::Router;
use std::path::Path;
use wowscales_server::{build_router, AppState, StoreBackend};

pub fn memory_app() -> Router {
    build_router(AppState::new(StoreBackend::in_memory()), &[])
}

pub fn sqlite_app(path: &Path) -> Router {
    let store = StoreBackend::sqlite(path).expect("sqlite store should open");
    build_router(AppState::new(store), &[])
}

/// The certificate scenario: required sections only.
pub fn scenario_payload() -> Value {
    json!({
        "client": { "clientName": "Acme" },
        "header": { "certNo": "C-100", "date": "2024-01-01", "verSticker": "S1" },
        "status": { "status": "PASS", "accType": "A" },
        "instrument": {
            "manufacturer": "X", "model": "Y", "serial": "123", "class": "III",
            "units": "kg", "max": 100, "maxAvail": 100, "e": 0.1, "min": 0
        },
        "officer": { "officerName": "J. Doe" }
    })
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_raw(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::post("/api/verifications")
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_json(app: &Router, payload: &Value) -> (StatusCode, Value) {
    post_raw(app, payload.to_string()).await
}
