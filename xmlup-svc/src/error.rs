//! Error types for xmlup-svc
//!
//! Every failure becomes a JSON body of the form
//! `{"error": {"code": ..., "message": ..., "details": [...]}}`.
//! `details` is only present for field validation failures and lists one
//! message per failed field.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use xmlup_common::{CorrectionError, MissingAnchorError, ValidationErrors};

/// Message shown when a submission carries no file
pub const MISSING_FILE_MESSAGE: &str = "Please upload an XML file first.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No file part, or an empty one (400)
    #[error("{}", MISSING_FILE_MESSAGE)]
    MissingFile,

    /// Malformed request or unacceptable upload (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload exceeds the configured limit (413)
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Field checks failed (422)
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Document has no anchor tag (422)
    #[error(transparent)]
    MissingAnchor(MissingAnchorError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// xmlup-common error
    #[error(transparent)]
    Common(#[from] xmlup_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Validation(_) | ApiError::MissingAnchor(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Common(xmlup_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::MissingAnchor(_) => "ANCHOR_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Common(xmlup_common::Error::InvalidInput(_)) => "INVALID_INPUT",
            ApiError::Common(_) => "COMMON_ERROR",
        }
    }
}

impl From<CorrectionError> for ApiError {
    fn from(err: CorrectionError) -> Self {
        match err {
            CorrectionError::Validation(errors) => ApiError::Validation(errors),
            CorrectionError::MissingAnchor(err) => ApiError::MissingAnchor(err),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(err.body_text()),
            status if status.is_client_error() => ApiError::BadRequest(err.body_text()),
            _ => ApiError::Internal(err.body_text()),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            ApiError::Validation(errors) => json!({
                "error": {
                    "code": code,
                    "message": "One or more fields are invalid.",
                    "details": errors.messages(),
                }
            }),
            other => json!({
                "error": {
                    "code": code,
                    "message": other.to_string(),
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
