//! Person CRUD endpoints.
//!
//! Candidate records are validated before they reach the store; a rejected
//! candidate gets the complete field-tagged issue list back in one response.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;

use census_model::{Issue, Person, PersonId, ValidationReport};
use census_store::{PersonStore, StoreError};
use census_validate::{Clock, SystemClock, validate};

/// State shared across person handlers.
#[derive(Clone)]
pub struct PersonsState {
    pub store: PersonStore,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl PersonsState {
    pub fn new(store: PersonStore) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(store: PersonStore, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { store, clock }
    }
}

/// Build the `/persons` router.
pub fn person_routes(state: PersonsState) -> Router {
    Router::new()
        .route("/persons", get(list_persons).post(create_person))
        .route(
            "/persons/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .with_state(state)
}

/// API-level error, rendered as a JSON response.
#[derive(Debug)]
pub enum ApiError {
    /// The candidate failed validation; carries the full issue list.
    Validation(ValidationReport),
    /// The request itself is malformed (non-record body, bad id).
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ValidationErrorBody {
    errors: Vec<Issue>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(report) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody {
                    errors: report.issues,
                }),
            )
                .into_response(),
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error })).into_response()
            }
            ApiError::NotFound(error) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error })).into_response()
            }
            ApiError::Conflict(error) => {
                (StatusCode::CONFLICT, Json(ErrorBody { error })).into_response()
            }
            ApiError::Internal(error) => {
                tracing::error!(%error, "person request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error })).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => ApiError::NotFound("person not found".to_string()),
            StoreError::AlreadyExists { id } => {
                ApiError::Conflict(format!("person already exists: {id}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn parse_id(raw: &str) -> Result<PersonId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid person id: {raw}")))
}

fn validate_candidate(state: &PersonsState, candidate: &Value) -> Result<Person, ApiError> {
    let outcome = validate(candidate, state.clock.as_ref())
        .map_err(|fault| ApiError::BadRequest(fault.to_string()))?;
    outcome.into_result().map_err(ApiError::Validation)
}

pub async fn list_persons(
    State(state): State<PersonsState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.store.list_async().await?))
}

pub async fn create_person(
    State(state): State<PersonsState>,
    Json(candidate): Json<Value>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let person = validate_candidate(&state, &candidate)?;
    let id = state.store.create_async(person).await?;
    let stored = state.store.find_by_id_async(id).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_person(
    State(state): State<PersonsState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.find_by_id_async(id).await?))
}

/// Replace a record with the existing document merged under the request
/// body, so a caller may send only the fields it changes. The merged record
/// is re-validated before it is written.
pub async fn update_person(
    State(state): State<PersonsState>,
    Path(id): Path<String>,
    Json(partial): Json<Value>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;
    let existing = state.store.find_by_id_async(id).await?;

    let mut merged =
        serde_json::to_value(&existing).map_err(|error| ApiError::Internal(error.to_string()))?;
    let Some(candidate) = merged.as_object_mut() else {
        return Err(ApiError::Internal("stored record is not an object".to_string()));
    };
    let Some(updates) = partial.as_object() else {
        return Err(ApiError::BadRequest(
            "update body must be a JSON object".to_string(),
        ));
    };
    for (field, value) in updates {
        candidate.insert(field.clone(), value.clone());
    }

    let person = validate_candidate(&state, &merged)?;
    let updated = state.store.update_async(id, person).await?;
    Ok(Json(updated))
}

pub async fn delete_person(
    State(state): State<PersonsState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete_async(id).await?;
    Ok(Json(serde_json::json!({
        "message": "person deleted successfully"
    })))
}
