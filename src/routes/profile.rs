use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::extractors::{JsonBody, UserId};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::validate_profile_photo;

pub fn router() -> Router<AppState> {
    Router::new().route("/photo", get(get_photo).put(put_photo))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoBody {
    photo_url: String,
}

async fn get_photo(
    UserId(user_id): UserId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let photo_url = state
        .store()
        .get_profile_photo(&user_id)?
        .map(|p| p.photo_url)
        .unwrap_or_default();
    Ok(ok(PhotoBody { photo_url }))
}

async fn put_photo(
    UserId(user_id): UserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PhotoBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_profile_photo(&req.photo_url, state.media())
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;
    let photo = state.store().set_profile_photo(&user_id, &req.photo_url)?;
    tracing::info!(user_id = %photo.user_id, "Profile photo updated");
    Ok(ok(PhotoBody {
        photo_url: photo.photo_url,
    }))
}
