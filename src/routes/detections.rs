use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::constants::{DEFAULT_DETECTION_LIMIT, MAX_DETECTION_LIMIT};
use crate::extractors::{JsonBody, OptionalUserId};
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::detections::{Detection, DetectionType};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_detections).post(save_detection))
}

#[derive(Debug, Deserialize)]
struct SaveDetectionRequest {
    #[serde(rename = "type")]
    detection_type: DetectionType,
    result: String,
    confidence: Option<f64>,
    metadata: Option<serde_json::Value>,
}

async fn save_detection(
    OptionalUserId(user_id): OptionalUserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveDetectionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if req.result.trim().is_empty() {
        return Err(AppError::bad_request("VALIDATION_ERROR", "Detection result is required"));
    }

    let detection = Detection {
        id: uuid::Uuid::new_v4().to_string(),
        detection_type: req.detection_type,
        result: req.result,
        confidence: req.confidence,
        user_id,
        metadata: req.metadata,
        created_at: Utc::now(),
    };
    state.store().save_detection(&detection)?;
    Ok(created(serde_json::json!({ "id": detection.id })))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

async fn list_detections(
    OptionalUserId(user_id): OptionalUserId,
    Query(q): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q
        .limit
        .unwrap_or(DEFAULT_DETECTION_LIMIT)
        .clamp(1, MAX_DETECTION_LIMIT);
    let detections = state.store().list_detections(limit, user_id.as_deref())?;
    Ok(ok(detections))
}
