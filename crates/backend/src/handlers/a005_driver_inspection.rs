use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a005_driver_inspection::aggregate::{DriverInspection, DriverInspectionDto};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a005_driver_inspection::repository::InspectionFilter;
use crate::domain::a005_driver_inspection::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inspections/driver/?ambulance_id=&date_from=&date_to=&status=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(filter): Query<InspectionFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<DriverInspection>>> {
    Ok(Json(service::list(&state.db, &filter, &params, &claims).await?))
}

/// GET /api/inspections/driver/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<DriverInspection>> {
    Ok(Json(service::get(&state.db, &id, &claims).await?))
}

/// POST /api/inspections/driver/
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<DriverInspectionDto>,
) -> ServiceResult<(StatusCode, Json<DriverInspection>)> {
    let inspection = service::create(&state.db, dto, &claims).await?;
    Ok((StatusCode::CREATED, Json(inspection)))
}

/// PUT /api/inspections/driver/:id/
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<DriverInspectionDto>,
) -> ServiceResult<Json<DriverInspection>> {
    Ok(Json(service::update(&state.db, &id, dto, &claims).await?))
}

/// DELETE /api/inspections/driver/:id/
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
