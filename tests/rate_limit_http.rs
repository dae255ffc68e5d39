mod common;

use axum::http::StatusCode;

use common::app::spawn_test_server_with_limits;

#[tokio::test]
async fn it_rate_limit_triggers_429_with_headers() {
    let app = spawn_test_server_with_limits(3).await;

    for _ in 0..3 {
        app.get("/api/triggers", Some("u1")).await.assert_ok();
    }

    let reply = app.get("/api/triggers", Some("u1")).await;
    reply.assert_error(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED");
    assert!(reply.body["traceId"].is_string());
    for header in ["retry-after", "ratelimit-limit", "ratelimit-remaining", "ratelimit-reset"] {
        assert!(reply.header(header).is_some(), "missing {header}");
    }
}

#[tokio::test]
async fn it_health_is_not_rate_limited() {
    let app = spawn_test_server_with_limits(1).await;

    for _ in 0..3 {
        assert_eq!(app.get("/health/live", None).await.status, StatusCode::OK);
    }
}
