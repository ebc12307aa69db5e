//! API Models

use heaven_catalog::{AgeBand, Pet};
use heaven_forms::{ErrorMap, FieldValue, Identity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    /// Failure that still carries data, e.g. the per-field validation errors
    pub fn rejected(code: &str, message: &str, data: T) -> Self {
        Self { data: Some(data), ..Self::error(code, message) }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// ============ Pets ============

/// Browse filters; every parameter defaults to "all"
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PetQuery {
    /// Case-insensitive match on name, breed or description
    pub search: Option<String>,
    /// `all`, `dog` or `cat`
    #[serde(rename = "type")]
    pub species: Option<String>,
    /// `all`, `puppy`, `young`, `adult` or `senior`
    pub age: Option<String>,
    /// `all`, `male` or `female`
    pub gender: Option<String>,
}

/// Filtered catalog in catalog order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PetList {
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn new<'a>(pets: impl IntoIterator<Item = &'a Pet>) -> Self {
        let pets: Vec<Pet> = pets.into_iter().cloned().collect();
        Self { count: pets.len(), pets }
    }
}

/// Pet detail with its display age
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetail {
    #[serde(flatten)]
    pub pet: Pet,
    pub age_band: Option<AgeBand>,
    pub age_label: String,
}

impl From<&Pet> for PetDetail {
    fn from(pet: &Pet) -> Self {
        Self {
            pet: pet.clone(),
            age_band: pet.age_band(),
            age_label: pet.age_label(),
        }
    }
}

// ============ Forms ============

/// Form submission
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRequest {
    /// Field key → text, or a boolean for checkboxes
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: BTreeMap<String, FieldValue>,
    /// Signed-in visitor, used to pre-fill the adoption form
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub identity: Option<Identity>,
}

/// Validation failure detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationFailure {
    #[schema(value_type = Object)]
    pub errors: ErrorMap,
    /// First invalid field in document order
    pub focus: String,
}
