use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::StoreError;

#[derive(Error, Debug)]
pub enum BookingError {
    /// Malformed, missing or out-of-range input
    #[error("{0}")]
    Validation(String),
    /// Overlapping session or duplicate member
    #[error("{0}")]
    Conflict(String),
    /// Trainer's daily working hours would be exceeded
    #[error("{0}")]
    Capacity(String),
    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),
    #[error("Data store error: {0}")]
    Store(StoreError),
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Validation(_)
            | BookingError::Conflict(_)
            | BookingError::Capacity(_)
            | BookingError::NotFound(_) => StatusCode::BAD_REQUEST,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IdOutOfRange(message) => BookingError::Validation(message),
            other => BookingError::Store(other),
        }
    }
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::Validation(rejection.body_text())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            BookingError::Store(store_err) => {
                tracing::error!(error = ?store_err, "Data store error.");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
