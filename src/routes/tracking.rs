use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use expression_classifier::{FaceExpression, HandGesture};
use serde::Deserialize;

use crate::constants::{ANALYSIS_WINDOW, DEFAULT_TRACKING_LIMIT};
use crate::extractors::{JsonBody, UserId};
use crate::response::{created, ok, AppError};
use crate::services::personality;
use crate::state::AppState;
use crate::store::operations::tracking::TrackingEntry;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tracking).post(save_tracking))
        .route("/analysis", get(get_analysis))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveTrackingRequest {
    face_expression: FaceExpression,
    hand_gesture: HandGesture,
}

async fn save_tracking(
    UserId(user_id): UserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveTrackingRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entry = TrackingEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id,
        face_expression: req.face_expression,
        hand_gesture: req.hand_gesture,
        timestamp: Utc::now(),
    };
    state.store().save_tracking(&entry)?;
    Ok(created(entry))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

async fn list_tracking(
    UserId(user_id): UserId,
    Query(q): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q
        .limit
        .unwrap_or(DEFAULT_TRACKING_LIMIT)
        .clamp(1, ANALYSIS_WINDOW);
    Ok(ok(state.store().list_tracking(&user_id, limit)?))
}

async fn get_analysis(
    UserId(user_id): UserId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(personality::analyze_user(state.store(), &user_id)?))
}
