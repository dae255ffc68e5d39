use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::{get, post};
use axum::Router;
use expression_classifier::{FaceExpression, HandGesture, TriggerPattern};
use serde::Deserialize;

use crate::constants::TRIGGER_BODY_LIMIT;
use crate::extractors::{JsonBody, UserId};
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::triggers::NewTrigger;
use crate::validation::{validate_trigger_audio, validate_trigger_image, validate_trigger_name};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_triggers)
                .post(create_trigger)
                .layer(DefaultBodyLimit::max(TRIGGER_BODY_LIMIT)),
        )
        .route("/match", post(match_trigger))
        .route("/:id", get(get_trigger).delete(delete_trigger))
}

async fn list_triggers(
    UserId(user_id): UserId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let triggers = state.store().list_triggers(&user_id)?;
    Ok(ok(triggers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTriggerRequest {
    name: String,
    face_pattern: FaceExpression,
    hand_pattern: HandGesture,
    image_base64: String,
    audio_base64: String,
}

async fn create_trigger(
    UserId(user_id): UserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTriggerRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let media = state.media();
    validate_trigger_name(&req.name)
        .and_then(|_| validate_trigger_image(&req.image_base64, media))
        .and_then(|_| validate_trigger_audio(&req.audio_base64, media))
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let trigger = state.store().create_trigger(
        &NewTrigger {
            user_id: &user_id,
            name: req.name.trim(),
            pattern: TriggerPattern::new(req.face_pattern, req.hand_pattern),
            image: &req.image_base64,
            audio: &req.audio_base64,
        },
        media.chunk_size,
    )?;
    Ok(created(trigger))
}

async fn get_trigger(
    UserId(user_id): UserId,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let store = state.store();
    let trigger = store.require_trigger(&user_id, &id)?;
    Ok(ok(store.with_media(trigger)?))
}

async fn delete_trigger(
    UserId(user_id): UserId,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if !state.store().delete_trigger(&user_id, &id)? {
        return Err(AppError::not_found("Trigger not found"));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}

/// Earliest trigger with exactly this pattern, with media, or `null`.
async fn match_trigger(
    UserId(user_id): UserId,
    State(state): State<AppState>,
    JsonBody(pattern): JsonBody<TriggerPattern>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let store = state.store();
    let matched = match store.match_trigger(&user_id, pattern)? {
        Some(trigger) => Some(store.with_media(trigger)?),
        None => None,
    };
    Ok(ok(matched))
}
