use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a007_maintenance_record::aggregate::{MaintenanceRecord, MaintenanceRecordDto};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a007_maintenance_record::repository::MaintenanceFilter;
use crate::domain::a007_maintenance_record::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;

/// GET /api/maintenance/
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MaintenanceFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<MaintenanceRecord>>> {
    Ok(Json(service::list(&state.db, &filter, &params).await?))
}

/// GET /api/maintenance/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<MaintenanceRecord>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/maintenance/
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<MaintenanceRecordDto>,
) -> ServiceResult<(StatusCode, Json<MaintenanceRecord>)> {
    let record = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/maintenance/:id/
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<MaintenanceRecordDto>,
) -> ServiceResult<Json<MaintenanceRecord>> {
    Ok(Json(service::update(&state.db, &id, dto).await?))
}

/// DELETE /api/maintenance/:id/
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
