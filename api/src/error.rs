//! API errors and their HTTP mapping

use crate::models::{ApiResponse, ValidationFailure};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use heaven_catalog::CatalogError;
use heaven_forms::FormError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Pet {0} not found")]
    PetNotFound(String),

    #[error("{0}")]
    InvalidFilter(#[from] CatalogError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Please correct the highlighted fields")]
    Validation(ValidationFailure),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PetNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidFilter(_) | Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::Form(FormError::UnknownForm(_)) => StatusCode::NOT_FOUND,
            Self::Form(FormError::AlreadySubmitted | FormError::SubmissionInFlight) => StatusCode::CONFLICT,
            Self::Form(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::PetNotFound(_) => "PET_NOT_FOUND",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::Form(FormError::UnknownForm(_)) => "FORM_NOT_FOUND",
            Self::Form(FormError::UnknownField(_)) => "UNKNOWN_FIELD",
            Self::Form(FormError::TypeMismatch { .. }) => "TYPE_MISMATCH",
            Self::Form(_) => "ALREADY_SUBMITTED",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::Validation(_) => "VALIDATION_FAILED",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        match self {
            Self::Validation(failure) => {
                (status, Json(ApiResponse::rejected(code, &message, failure))).into_response()
            }
            _ => (status, Json(ApiResponse::<()>::error(code, &message))).into_response(),
        }
    }
}
