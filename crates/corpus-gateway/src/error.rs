//! `CoreError -> HTTP response` mapping (spec §7 "Propagation policy").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use corpus_core::error::CoreError;
use serde_json::json;

pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CoreError::BadArguments(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CoreError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            CoreError::AlreadyExists => (StatusCode::ACCEPTED, String::new()),
            CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            CoreError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        if message.is_empty() {
            return status.into_response();
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
