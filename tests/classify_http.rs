mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::app::spawn_test_server;
use common::fixtures::{happy_face, peace_hand, trigger_body};

#[tokio::test]
async fn it_classifies_face_and_hand() {
    let app = spawn_test_server().await;

    let reply = app
        .post(
            "/api/classify",
            None,
            json!({ "face": happy_face(), "hand": peace_hand() }),
        )
        .await;
    reply.assert_ok();
    let data = reply.data();
    assert_eq!(data["face"]["label"], "Happy");
    let confidence = data["face"]["confidence"].as_f64().unwrap();
    assert!((confidence - 90.0).abs() < 1e-6);
    assert_eq!(data["hand"]["label"], "Peace");
    assert!(data.get("trigger").is_none());
}

#[tokio::test]
async fn it_missing_landmarks_fall_back_to_defaults() {
    let app = spawn_test_server().await;

    let reply = app.post("/api/classify", None, json!({})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.data()["face"]["label"], "Neutral");
    assert_eq!(reply.data()["face"]["confidence"], 0.0);
    assert_eq!(reply.data()["hand"]["label"], "None");

    // a truncated mesh is treated as no face
    let short = json!({ "face": [{ "x": 0.5, "y": 0.5 }], "hand": [{ "x": 0.1, "y": 0.2 }] });
    let reply = app.post("/api/classify", None, short).await;
    assert_eq!(reply.data()["face"]["label"], "Neutral");
    assert_eq!(reply.data()["hand"]["label"], "None");
}

#[tokio::test]
async fn it_classify_reports_matching_trigger() {
    let app = spawn_test_server().await;

    let created = app
        .post("/api/triggers", Some("u1"), trigger_body("peace out", "Happy", "Peace"))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let frame = json!({ "face": happy_face(), "hand": peace_hand() });
    let reply = app.post("/api/classify", Some("u1"), frame.clone()).await;
    assert_eq!(reply.data()["trigger"]["id"], created.id());
    assert_eq!(reply.data()["trigger"]["name"], "peace out");

    // other users never see it
    let reply = app.post("/api/classify", Some("u2"), frame).await;
    assert!(reply.data().get("trigger").is_none());
}

#[tokio::test]
async fn it_rejects_malformed_body() {
    let app = spawn_test_server().await;

    let reply = app
        .post("/api/classify", None, json!({ "face": "not landmarks" }))
        .await;
    reply.assert_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST_BODY");
    assert!(reply.body["traceId"].is_string());
}
