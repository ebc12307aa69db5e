//! Error types for form handling
//!
//! Validation failures are not errors here: they come back as an
//! [`ErrorMap`](crate::ErrorMap) inside [`SubmitResult`](crate::SubmitResult).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {field} expects a {expected} value")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("unknown form: {0}")]
    UnknownForm(String),

    #[error("form already submitted")]
    AlreadySubmitted,

    #[error("submission already in progress")]
    SubmissionInFlight,
}

pub type Result<T> = std::result::Result<T, FormError>;
