use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_ambulance::aggregate::{
    Ambulance, AmbulanceDto, LocationUpdateDto, StatusUpdateDto,
};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a001_ambulance::repository::AmbulanceFilter;
use crate::domain::a001_ambulance::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;

/// GET /api/ambulances/
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AmbulanceFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<Ambulance>>> {
    Ok(Json(service::list(&state.db, &filter, &params).await?))
}

/// GET /api/ambulances/available/
pub async fn list_available(State(state): State<AppState>) -> ServiceResult<Json<Vec<Ambulance>>> {
    Ok(Json(service::list_available(&state.db).await?))
}

/// GET /api/ambulances/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Ambulance>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/ambulances/
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<AmbulanceDto>,
) -> ServiceResult<(StatusCode, Json<Ambulance>)> {
    let ambulance = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ambulance)))
}

/// PUT /api/ambulances/:id/
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<AmbulanceDto>,
) -> ServiceResult<Json<Ambulance>> {
    Ok(Json(service::update(&state.db, &id, dto).await?))
}

/// DELETE /api/ambulances/:id/
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/ambulances/:id/location/
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<LocationUpdateDto>,
) -> ServiceResult<Json<Ambulance>> {
    Ok(Json(service::update_location(&state.db, &id, dto).await?))
}

/// PATCH /api/ambulances/:id/status/
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<StatusUpdateDto>,
) -> ServiceResult<Json<Ambulance>> {
    Ok(Json(service::set_status(&state.db, &id, dto).await?))
}
