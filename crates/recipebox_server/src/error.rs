//! HTTP error mapping for RecipeBox API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipebox_core::AppError;
use serde_json::json;

/// Handler error rendered as `{ "error": <message> }`.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message.clone()),
            AppError::Database(_) | AppError::Io(_) | AppError::StorageMessage(_) => {
                tracing::error!("Storage error: {}", self.0);
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            AppError::Internal => {
                tracing::error!("Internal error: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
