use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use fitfusion_cascade::domain::types::{Collection, FieldValue, fields, fields_of};
use fitfusion_cascade::router::build_router;
use fitfusion_testing::auth::MockAuth;

use crate::helpers::{app_state, scenario};

fn server() -> (TestServer, fitfusion_cascade::infra::memory::InMemoryStore) {
    let (store, identity) = scenario();
    let server = TestServer::new(build_router(app_state(&store, &identity))).unwrap();
    (server, store)
}

// ── POST /clients/delete ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_client_over_http() {
    let (server, store) = server();
    let (name, value) = MockAuth::new("T1").header();

    let resp = server
        .post("/clients/delete")
        .add_header(name, value)
        .json(&json!({ "clientId": "U1" }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Client successfully deleted");
    assert_eq!(body["identityDeleted"], true);
    assert_eq!(store.count(Collection::Routines), 0);
}

#[tokio::test]
async fn should_return_403_for_foreign_trainer() {
    let (server, store) = server();
    let (name, value) = MockAuth::new("T2").header();

    let resp = server
        .post("/clients/delete")
        .add_header(name, value)
        .json(&json!({ "clientId": "U1" }))
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "PERMISSION_DENIED");
    assert_eq!(body["reason"], "not-your-client");
    assert_eq!(store.commit_count(), 0);
}

#[tokio::test]
async fn should_return_401_without_identity_header() {
    let (server, _) = server();

    let resp = server
        .post("/clients/delete")
        .json(&json!({ "clientId": "nobody" }))
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "UNAUTHENTICATED");
    assert_eq!(body["reason"], "unauthenticated");
}

#[tokio::test]
async fn should_return_400_without_client_id() {
    let (server, _) = server();
    let (name, value) = MockAuth::new("T1").header();

    let resp = server
        .post("/clients/delete")
        .add_header(name, value)
        .json(&json!({}))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn should_check_identity_before_reading_body() {
    let (server, store) = server();

    let no_body = server.post("/clients/delete").await;
    let malformed = server
        .post("/clients/delete")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"not json"))
        .await;
    let numeric_id = server
        .post("/clients/delete")
        .json(&json!({ "clientId": 42 }))
        .await;

    for resp in [no_body, malformed, numeric_id] {
        resp.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = resp.json();
        assert_eq!(body["kind"], "UNAUTHENTICATED");
    }
    assert_eq!(store.commit_count(), 0);
}

#[tokio::test]
async fn should_treat_unreadable_body_as_missing_client_id() {
    let (server, store) = server();
    let (name, value) = MockAuth::new("T1").header();

    let no_body = server
        .post("/clients/delete")
        .add_header(name.clone(), value.clone())
        .await;
    let malformed = server
        .post("/clients/delete")
        .add_header(name.clone(), value.clone())
        .content_type("application/json")
        .bytes(Bytes::from_static(b"not json"))
        .await;
    let numeric_id = server
        .post("/clients/delete")
        .add_header(name, value)
        .json(&json!({ "clientId": 42 }))
        .await;

    for resp in [no_body, malformed, numeric_id] {
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["kind"], "INVALID_ARGUMENT");
        assert_eq!(body["message"], "invalid argument: clientId is required");
    }
    assert_eq!(store.commit_count(), 0);
}

#[tokio::test]
async fn should_return_500_with_generic_message_when_commit_fails() {
    let (server, store) = server();
    store.fail_commits(true);
    let (name, value) = MockAuth::new("T1").header();

    let resp = server
        .post("/clients/delete")
        .add_header(name, value)
        .json(&json!({ "clientId": "U1" }))
        .await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "INTERNAL");
    assert_eq!(body["message"], "Failed to delete client");
    assert_eq!(store.count(Collection::Routines), 3);
}

// ── GET /trainers/@me/analytics ──────────────────────────────────────────────

#[tokio::test]
async fn should_report_trainer_analytics() {
    let (server, store) = server();
    store.insert(
        Collection::Routines,
        "shared",
        fields_of([
            (fields::TRAINER_ID, FieldValue::from("T1")),
            (fields::IS_PUBLIC, FieldValue::Bool(true)),
            (
                fields::CREATED_AT,
                FieldValue::Timestamp(Utc::now() - Duration::days(2)),
            ),
        ]),
    );
    let (name, value) = MockAuth::new("T1").header();

    let resp = server
        .get("/trainers/@me/analytics")
        .add_header(name, value)
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["clientCount"], 1);
    assert_eq!(body["routineCount"], 4);
    assert_eq!(body["publicRoutineCount"], 1);
    assert_eq!(body["privateRoutineCount"], 3);
    assert_eq!(body["recentRoutines"], 1);
    assert!(body["generatedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn should_forbid_analytics_for_client() {
    let (server, _) = server();
    let (name, value) = MockAuth::new("U1").header();

    let resp = server
        .get("/trainers/@me/analytics")
        .add_header(name, value)
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
    let body: Value = resp.json();
    assert_eq!(body["reason"], "not-a-trainer");
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_healthy() {
    let (server, _) = server();

    let resp = server.get("/healthz").await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn should_report_not_ready_when_store_unreachable() {
    let (server, store) = server();
    server.get("/readyz").await.assert_status_ok();

    store.fail_reads(true);
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_echo_request_id() {
    let (server, _) = server();

    let resp = server.get("/healthz").await;

    assert!(!resp.header("x-request-id").is_empty());
}
