use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_trip::aggregate::{Trip, TripDto};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a004_trip::repository::TripFilter;
use crate::domain::a004_trip::service;
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;

/// GET /api/trips/
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<Trip>>> {
    Ok(Json(service::list(&state.db, &filter, &params).await?))
}

/// GET /api/trips/active/
pub async fn list_active(State(state): State<AppState>) -> ServiceResult<Json<Vec<Trip>>> {
    Ok(Json(service::list_active(&state.db).await?))
}

/// GET /api/trips/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Trip>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/trips/
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<TripDto>,
) -> ServiceResult<(StatusCode, Json<Trip>)> {
    let trip = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// PATCH or POST /api/trips/:id/complete/
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Trip>> {
    Ok(Json(
        service::complete_trip(&state.db, &id, state.release_policy()).await?,
    ))
}

/// DELETE /api/trips/:id/
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    service::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
