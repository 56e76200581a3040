use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_patient::aggregate::{Patient, PatientDto};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a002_patient::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;

/// GET /api/patients/
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<Patient>>> {
    Ok(Json(service::list(&state.db, &params).await?))
}

/// GET /api/patients/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Patient>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/patients/
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<PatientDto>,
) -> ServiceResult<(StatusCode, Json<Patient>)> {
    let patient = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// PUT /api/patients/:id/
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<PatientDto>,
) -> ServiceResult<Json<Patient>> {
    Ok(Json(service::update(&state.db, &id, dto).await?))
}

/// DELETE /api/patients/:id/
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
