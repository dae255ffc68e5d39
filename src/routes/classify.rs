use axum::extract::State;
use axum::routing::post;
use axum::Router;
use expression_classifier::{classify, FaceExpression, HandGesture, Landmark};
use serde::{Deserialize, Serialize};

use crate::extractors::{JsonBody, OptionalUserId};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::triggers::Trigger;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(classify_frame))
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    #[serde(default)]
    face: Option<Vec<Landmark>>,
    #[serde(default)]
    hand: Option<Vec<Landmark>>,
}

#[derive(Debug, Serialize)]
struct FaceOutput {
    label: FaceExpression,
    confidence: f64,
}

#[derive(Debug, Serialize)]
struct HandOutput {
    label: HandGesture,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    face: FaceOutput,
    hand: HandOutput,
    /// Caller's matching trigger, metadata only.
    #[serde(skip_serializing_if = "Option::is_none")]
    trigger: Option<Trigger>,
}

/// Classifies one frame. With a caller id the resulting pattern is also
/// looked up among that caller's triggers.
async fn classify_frame(
    OptionalUserId(user_id): OptionalUserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ClassifyRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let result = classify(req.face.as_deref(), req.hand.as_deref());

    let trigger = match user_id {
        Some(uid) => state.store().match_trigger(&uid, result.pattern())?,
        None => None,
    };
    if let Some(t) = &trigger {
        tracing::debug!(trigger_id = %t.id, face = %result.face, hand = %result.hand, "Trigger matched");
    }

    Ok(ok(ClassifyResponse {
        face: FaceOutput {
            label: result.face,
            confidence: result.face_confidence,
        },
        hand: HandOutput { label: result.hand },
        trigger,
    }))
}
