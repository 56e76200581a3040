use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a006_paramedic_inspection::aggregate::{
    ParamedicInspection, ParamedicInspectionDto,
};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a005_driver_inspection::repository::InspectionFilter;
use crate::domain::a006_paramedic_inspection::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inspections/paramedic/?ambulance_id=&date_from=&date_to=&status=
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Query(filter): Query<InspectionFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<ParamedicInspection>>> {
    Ok(Json(service::list(&state.db, &filter, &params, &claims).await?))
}

/// GET /api/inspections/paramedic/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<ParamedicInspection>> {
    Ok(Json(service::get(&state.db, &id, &claims).await?))
}

/// POST /api/inspections/paramedic/
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ParamedicInspectionDto>,
) -> ServiceResult<(StatusCode, Json<ParamedicInspection>)> {
    let inspection = service::create(&state.db, dto, &claims).await?;
    Ok((StatusCode::CREATED, Json(inspection)))
}

/// PUT /api/inspections/paramedic/:id/
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ParamedicInspectionDto>,
) -> ServiceResult<Json<ParamedicInspection>> {
    Ok(Json(service::update(&state.db, &id, dto, &claims).await?))
}

/// DELETE /api/inspections/paramedic/:id/
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
