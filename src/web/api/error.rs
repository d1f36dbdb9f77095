use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ephemeris::EphemerisError;
use crate::store::StoreError;

pub const EPOCH_NOT_FOUND: &str = "Epoch not found";
pub const NO_DATA: &str = "No data available";

pub enum ApiError {
    Validation(String),
    NotFound(&'static str),
    Storage(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e)
    }
}

impl From<EphemerisError> for ApiError {
    fn from(e: EphemerisError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("invalid_state_vector", &msg)),
            )
                .into_response(),
            ApiError::NotFound(reason) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Storage(e) => {
                log::error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_message("storage_error", &e.to_string())),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
