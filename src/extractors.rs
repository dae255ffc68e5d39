use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::constants::{MAX_USER_ID_LEN, USER_ID_HEADER};
use crate::response::AppError;

/// A wrapper around `axum::Json<T>` that returns `AppError` on deserialization failure
/// instead of Axum's default plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %rejection, "Request body exceeds limit");
        return AppError::payload_too_large("Request body is too large");
    }
    match rejection {
        JsonRejection::JsonDataError(e) => {
            // Unknown labels and missing fields end up here.
            tracing::warn!(error = %e, "JSON data deserialization failed");
            AppError::bad_request("INVALID_REQUEST_BODY", &e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            tracing::warn!(error = %e, "JSON syntax parsing failed");
            AppError::bad_request("INVALID_REQUEST_BODY", "Malformed JSON body")
        }
        JsonRejection::MissingJsonContentType(e) => {
            tracing::warn!(error = %e, "Missing or invalid JSON Content-Type");
            AppError::bad_request("INVALID_REQUEST_BODY", "Expected a JSON body")
        }
        other => {
            tracing::warn!(error = %other, "Unexpected JSON body rejection");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        }
    }
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Caller id forwarded by the upstream auth layer; required.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

/// Same as [`UserId`] but absent when the header is missing.
#[derive(Debug, Clone)]
pub struct OptionalUserId(pub Option<String>);

fn user_id_from_parts(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let value = raw
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid user id header"))?
        .trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.len() > MAX_USER_ID_LEN || value.contains(':') {
        return Err(AppError::unauthorized("Invalid user id header"));
    }
    Ok(Some(value.to_string()))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_parts(parts)?
            .map(UserId)
            .ok_or_else(|| AppError::unauthorized("Missing user id"))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUserId(user_id_from_parts(parts)?))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/triggers");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn user_id_is_required() {
        let mut parts = parts_with(None);
        let err = UserId::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "AUTH_UNAUTHORIZED");

        let mut parts = parts_with(Some("  "));
        assert!(UserId::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn user_id_is_trimmed() {
        let mut parts = parts_with(Some(" user-1 "));
        let UserId(id) = UserId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id, "user-1");
    }

    #[tokio::test]
    async fn separator_is_rejected() {
        let mut parts = parts_with(Some("a:b"));
        assert!(OptionalUserId::from_request_parts(&mut parts, &()).await.is_err());
        let mut parts = parts_with(None);
        let OptionalUserId(id) = OptionalUserId::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(id.is_none());
    }
}
