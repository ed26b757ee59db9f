//! End-to-end route tests over both store backends.

mod common;

use common::*;

#[tokio::test]
async fn test_health_reports_message_and_timestamp() {
    let app = memory_app();
    let (status, body) = get_json(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "WOW Scales API is healthy");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_certificate_scenario_round_trip() {
    let app = memory_app();

    let (status, created) = post_json(&app, &scenario_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Verification saved successfully");
    let id = created["verificationId"].as_i64().unwrap();

    let (status, detail) = get_json(&app, &format!("/api/verifications/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["verification"]["certificate_no"], "C-100");
    assert_eq!(detail["verification"]["client_name"], "Acme");
    assert_eq!(detail["instrument"]["accuracy_class"], "III");
    assert_eq!(detail["instrument"]["verification_interval_e"], 0.1);
    assert_eq!(detail["officer"]["officer_name"], "J. Doe");
    assert_eq!(detail["accuracyTests"], json!([]));
    assert!(detail["variationTest"].is_null());
    assert!(detail["repeatabilityTest"].is_null());
}

#[tokio::test]
async fn test_certificate_scenario_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let app = sqlite_app(&dir.path().join("wowscales.sqlite3"));

    let mut payload = scenario_payload();
    payload["accuracy"] = json!([
        { "load": 10, "indication": 10.0, "result": "PASS" },
        { "load": "50", "indication": "", "result": "PASS" },
        { "load": 100, "indication": 100.1, "result": "FAIL" }
    ]);

    let (status, created) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["verificationId"].as_i64().unwrap();

    let (status, detail) = get_json(&app, &format!("/api/verifications/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["verification"]["certificate_no"], "C-100");
    assert_eq!(detail["verification"]["client_name"], "Acme");

    let loads: Vec<f64> = detail["accuracyTests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["test_load"].as_f64().unwrap())
        .collect();
    assert_eq!(loads, vec![10.0, 50.0, 100.0]);
    assert!(detail["accuracyTests"][1]["indication"].is_null());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = memory_app();

    for cert in ["C-1", "C-2", "C-3"] {
        let mut payload = scenario_payload();
        payload["header"]["certNo"] = json!(cert);
        let (status, _) = post_json(&app, &payload).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(&app, "/api/verifications").await;
    assert_eq!(status, StatusCode::OK);
    let certs: Vec<&str> = body["verifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["certificate_no"].as_str().unwrap())
        .collect();
    assert_eq!(certs, vec!["C-3", "C-2", "C-1"]);
    assert_eq!(body["verifications"][0]["client_name"], "Acme");
}

#[tokio::test]
async fn test_empty_list() {
    let app = memory_app();
    let (status, body) = get_json(&app, "/api/verifications").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verifications": [] }));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = memory_app();

    for uri in ["/api/verifications/999", "/api/verifications/abc"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "Verification not found" }));
    }
}

#[tokio::test]
async fn test_missing_section_fails_without_writing() {
    let app = memory_app();

    let mut payload = scenario_payload();
    payload.as_object_mut().unwrap().remove("officer");

    let (status, body) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save verification" }));

    let (_, list) = get_json(&app, "/api/verifications").await;
    assert_eq!(list["verifications"], json!([]));
}

#[tokio::test]
async fn test_unparsable_body_fails_to_save() {
    let app = memory_app();

    let (status, body) = post_raw(&app, "{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save verification");

    let mut payload = scenario_payload();
    payload["instrument"]["max"] = json!("heavy");
    let (status, _) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_store_failure_maps_to_fetch_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wowscales.sqlite3");
    let app = sqlite_app(&path);

    // A newer schema version than this build supports makes every open fail.
    rusqlite::Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 999)
        .unwrap();

    let (status, body) = get_json(&app, "/api/verifications").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch verifications");

    let (status, body) = get_json(&app, "/api/verifications/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch verification");

    let (status, body) = post_json(&app, &scenario_payload()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save verification");
}

#[tokio::test]
async fn test_index_page_lists_records() {
    let app = memory_app();

    let (status, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("No data"));

    post_json(&app, &scenario_payload()).await;
    let (_, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("<strong>C-100</strong>"));
    assert!(page.contains("Acme"));
    assert!(page.contains("2024-01-01"));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let app = memory_app();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/verifications")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
