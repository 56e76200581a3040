use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_emergency_call::aggregate::{
    AssignAmbulanceDto, CallStatusUpdateDto, EmergencyCall, EmergencyCallDto,
};
use contracts::shared::pagination::{Page, PageParams};

use crate::domain::a003_emergency_call::repository::CallFilter;
use crate::domain::a003_emergency_call::{dispatch, service};
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/emergency-calls/?status=&priority=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CallFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<EmergencyCall>>> {
    Ok(Json(service::list(&state.db, &filter, &params).await?))
}

/// GET /api/emergency-calls/pending/
pub async fn list_pending(State(state): State<AppState>) -> ServiceResult<Json<Vec<EmergencyCall>>> {
    Ok(Json(service::list_pending(&state.db).await?))
}

/// GET /api/emergency-calls/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<EmergencyCall>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/emergency-calls/
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<EmergencyCallDto>,
) -> ServiceResult<(StatusCode, Json<EmergencyCall>)> {
    let call = service::create(&state.db, dto, &claims).await?;
    Ok((StatusCode::CREATED, Json(call)))
}

/// PUT /api/emergency-calls/:id/
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<EmergencyCallDto>,
) -> ServiceResult<Json<EmergencyCall>> {
    Ok(Json(service::update(&state.db, &id, dto).await?))
}

/// PATCH or POST /api/emergency-calls/:id/assign/
pub async fn assign(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<AssignAmbulanceDto>,
) -> ServiceResult<Json<EmergencyCall>> {
    Ok(Json(
        dispatch::assign(&state.db, &id, &dto.ambulance_id, &claims).await?,
    ))
}

/// POST /api/emergency-calls/:id/status/
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<CallStatusUpdateDto>,
) -> ServiceResult<Json<EmergencyCall>> {
    Ok(Json(
        dispatch::update_status(&state.db, &id, dto.status, state.release_policy()).await?,
    ))
}
