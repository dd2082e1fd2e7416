//! Errors returned to HTTP clients.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The body is not a JSON object with a string `text` field
    #[error("Invalid request body: {0}")]
    Rejection(#[from] JsonRejection),

    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to render page: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Failed to export records: {0}")]
    Export(#[from] csv::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Rejection(rejection) => (rejection.status(), "invalid_request"),
            Self::Classifier(err) if err.is_input_error() => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::Classifier(_) => (StatusCode::INTERNAL_SERVER_ERROR, "inference_error"),
            Self::Store(StoreError::TextTooLong { .. }) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            Self::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            Self::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "export_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            log::error!("{}", message);
        } else {
            log::warn!("Rejected request: {}", message);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
