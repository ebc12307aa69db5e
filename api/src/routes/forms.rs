//! Form schema and submission endpoints

use crate::error::ApiError;
use crate::{models::*, ApiState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use heaven_forms::{FieldValue, FormKind, FormPipeline, FormSchema, Notifier, Receipt, SubmitResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 201 with the receipt
pub type Submission = (StatusCode, Json<ApiResponse<Receipt>>);

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/:kind/schema", get(get_schema))
        .route("/release", post(submit_release))
        .route("/membership", post(submit_membership))
}

/// Field list of a form, in document order
#[utoipa::path(
    get,
    path = "/api/v1/forms/{kind}/schema",
    params(("kind" = String, Path, description = "adoption, release or membership")),
    responses(
        (status = 200, description = "Form schema"),
        (status = 404, description = "Unknown form", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_schema(Path(kind): Path<String>) -> Result<Json<ApiResponse<&'static FormSchema>>, ApiError> {
    let kind: FormKind = kind.parse()?;
    Ok(Json(ApiResponse::success(kind.schema())))
}

/// Request that the shelter take in a pet
#[utoipa::path(
    post,
    path = "/api/v1/forms/release",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Request received; data is the receipt"),
        (status = 400, description = "Unknown field or wrong value kind", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationFailure)
    ),
    tag = "forms"
)]
pub async fn submit_release(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Submission, ApiError> {
    let Json(request) = body?;
    let pipeline = FormPipeline::release(state.settings.clone());
    complete(pipeline, request.values, state.notifier.as_ref()).await
}

/// Register as a member; the receipt carries the new member's identity
#[utoipa::path(
    post,
    path = "/api/v1/forms/membership",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Registered; data is the receipt"),
        (status = 400, description = "Unknown field or wrong value kind", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationFailure)
    ),
    tag = "forms"
)]
pub async fn submit_membership(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Submission, ApiError> {
    let Json(request) = body?;
    let pipeline = FormPipeline::membership(state.settings.clone());
    complete(pipeline, request.values, state.notifier.as_ref()).await
}

/// Apply the submitted values and run the pipeline once
pub(crate) async fn complete(
    mut pipeline: FormPipeline,
    values: BTreeMap<String, FieldValue>,
    notifier: &dyn Notifier,
) -> Result<Submission, ApiError> {
    for (key, value) in values {
        pipeline.set_field(&key, value)?;
    }

    match pipeline.submit(notifier).await? {
        SubmitResult::Invalid { errors, focus } => Err(ApiError::Validation(ValidationFailure {
            errors,
            focus: focus.to_string(),
        })),
        SubmitResult::Submitted(receipt) => Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt)))),
    }
}
