mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::app::{spawn_test_server, TestApp};

async fn track(app: &TestApp, uid: &str, face: &str, hand: &str) {
    let reply = app
        .post(
            "/api/tracking",
            Some(uid),
            json!({ "faceExpression": face, "handGesture": hand }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
}

#[tokio::test]
async fn it_analysis_is_null_without_history() {
    let app = spawn_test_server().await;

    let reply = app.get("/api/tracking/analysis", Some("u1")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.data().is_null());
}

#[tokio::test]
async fn it_analysis_summarises_history() {
    let app = spawn_test_server().await;
    track(&app, "u1", "Happy", "Thumbs Up").await;
    track(&app, "u1", "Happy", "None").await;
    track(&app, "u1", "Sad", "None").await;
    track(&app, "u2", "Angry", "Fist").await;

    let reply = app.get("/api/tracking/analysis", Some("u1")).await;
    let analysis = reply.data();
    assert_eq!(analysis["mostCommonFace"], "Happy");
    assert_eq!(analysis["mostCommonHand"], "Thumbs Up");
    assert_eq!(analysis["facePersonality"], "Optimistic & Cheerful");
    assert_eq!(analysis["handPersonality"], "Positive & Supportive");
    assert_eq!(analysis["totalTracked"], 3);
    assert_eq!(analysis["faceStats"]["Sad"], 1);
    assert!(analysis["handStats"].get("None").is_none());
}

#[tokio::test]
async fn it_lists_recent_tracking() {
    let app = spawn_test_server().await;
    track(&app, "u1", "Neutral", "Pointing").await;
    track(&app, "u1", "Fear", "Three").await;

    let reply = app.get("/api/tracking?limit=1", Some("u1")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let data = reply.data().as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["faceExpression"], "Fear");
    assert_eq!(data[0]["handGesture"], "Three");
}

#[tokio::test]
async fn it_tracking_validates_labels_and_user() {
    let app = spawn_test_server().await;

    app.post(
        "/api/tracking",
        Some("u1"),
        json!({ "faceExpression": "Happy", "handGesture": "Wave" }),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST_BODY");

    let reply = app.get("/api/tracking", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}
