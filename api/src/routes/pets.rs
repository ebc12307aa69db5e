//! Pet catalog endpoints

use crate::error::ApiError;
use crate::routes::forms::{complete, Submission};
use crate::{models::*, ApiState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use heaven_catalog::{FilterCriteria, FilterKey, PetLookup};
use heaven_forms::{FormPipeline, PetForm};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_pets))
        .route("/new-arrivals", get(new_arrivals))
        .route("/:id", get(get_pet))
        .route("/:id/adopt", post(adopt))
}

/// List pets matching the browse filters
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    params(PetQuery),
    responses(
        (status = 200, description = "Matching pets in catalog order", body = PetList),
        (status = 400, description = "Unrecognised filter value", body = ErrorResponse)
    ),
    tag = "pets"
)]
pub async fn list_pets(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PetQuery>,
) -> Result<Json<ApiResponse<PetList>>, ApiError> {
    let mut criteria = FilterCriteria::default();
    for (key, value) in [
        (FilterKey::Search, query.search),
        (FilterKey::Type, query.species),
        (FilterKey::Age, query.age),
        (FilterKey::Gender, query.gender),
    ] {
        if let Some(value) = value {
            criteria.set(key, &value)?;
        }
    }

    let pets = state.catalog.search(&criteria);
    debug!(matched = pets.len(), "Catalog search {criteria:?}");
    Ok(Json(ApiResponse::success(PetList::new(pets))))
}

/// Pets flagged as new arrivals
#[utoipa::path(
    get,
    path = "/api/v1/pets/new-arrivals",
    responses((status = 200, body = PetList)),
    tag = "pets"
)]
pub async fn new_arrivals(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<PetList>> {
    Json(ApiResponse::success(PetList::new(state.catalog.new_arrivals())))
}

/// Get pet by ID
#[utoipa::path(
    get,
    path = "/api/v1/pets/{id}",
    params(("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet detail"),
        (status = 404, description = "No pet with this identifier", body = ErrorResponse)
    ),
    tag = "pets"
)]
pub async fn get_pet(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PetDetail>>, ApiError> {
    match state.catalog.lookup(&id) {
        PetLookup::Found(pet) => Ok(Json(ApiResponse::success(PetDetail::from(pet)))),
        PetLookup::NotFound { requested } => Err(ApiError::PetNotFound(requested)),
    }
}

/// Submit an adoption application for a pet
#[utoipa::path(
    post,
    path = "/api/v1/pets/{id}/adopt",
    params(("id" = String, Path, description = "Pet identifier")),
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Application received; data is the receipt"),
        (status = 400, description = "Unknown field or wrong value kind", body = ErrorResponse),
        (status = 404, description = "No pet with this identifier", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ValidationFailure)
    ),
    tag = "forms"
)]
pub async fn adopt(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Submission, ApiError> {
    let Json(request) = body?;
    let identity = request.identity.as_ref();

    match FormPipeline::adoption(&state.catalog, &id, state.settings.clone(), identity) {
        PetForm::Ready(pipeline) => complete(pipeline, request.values, state.notifier.as_ref()).await,
        PetForm::NotFound { requested } => Err(ApiError::PetNotFound(requested)),
    }
}
