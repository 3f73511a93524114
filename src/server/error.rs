//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PriceError;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Body was empty, unparseable, or a bare `null`
    #[error("empty json")]
    EmptyJson,

    #[error("{0}")]
    BadRequest(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PriceError> for ServerError {
    fn from(err: PriceError) -> Self {
        if err.is_client_error() {
            ServerError::BadRequest(err.to_string())
        } else {
            ServerError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::EmptyJson => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ServerError::BadRequest(msg) => {
                tracing::debug!(detail = %msg, "Rejected prediction request");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
