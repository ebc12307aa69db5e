//! Pet Heaven API
//!
//! REST surface over the pet catalog and the site's three forms.
//!
//! ```text
//! /health                         liveness
//! /api-docs/openapi.json          OpenAPI document
//! /api/v1/pets                    browse, new arrivals, detail
//! /api/v1/pets/{id}/adopt         adoption application
//! /api/v1/forms/{kind}/schema     field lists for rendering
//! /api/v1/forms/release           pet release request
//! /api/v1/forms/membership        membership registration
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use axum::{routing::get, Json, Router};
use heaven_catalog::Catalog;
use heaven_forms::{Notifier, NotifySettings};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::ServerConfig;
pub use error::ApiError;
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Catalog,
    pub notifier: Arc<dyn Notifier>,
    pub settings: NotifySettings,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pet Heaven API",
        description = "Pet adoption catalog and shelter forms",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::pets::list_pets,
        routes::pets::new_arrivals,
        routes::pets::get_pet,
        routes::pets::adopt,
        routes::forms::get_schema,
        routes::forms::submit_release,
        routes::forms::submit_membership,
    ),
    components(
        schemas(
            ErrorResponse, PetList, SubmissionRequest, ValidationFailure,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pets", description = "Adoptable pet catalog"),
        (name = "forms", description = "Adoption, release and membership forms")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/pets", routes::pets::router())
        .nest("/forms", routes::forms::router())
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
