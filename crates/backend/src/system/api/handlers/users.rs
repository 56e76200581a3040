use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::enums::UserRole;
use contracts::shared::pagination::{Page, PageParams};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use serde::Deserialize;

use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}

/// GET /api/users/
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<UserFilter>,
    Query(params): Query<PageParams>,
) -> ServiceResult<Json<Page<User>>> {
    let users = service::list(&state.db, filter.role).await?;
    Ok(Json(params.slice(users)))
}

/// GET /api/users/:id/
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<User>> {
    Ok(Json(service::get(&state.db, &id).await?))
}

/// POST /api/users/ (admin only)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> ServiceResult<(StatusCode, Json<User>)> {
    user.require_admin()?;
    let created = service::create(&state.db, dto, Some(user.id().to_string())).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/users/:id/ (admin only)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateUserDto>,
) -> ServiceResult<Json<User>> {
    user.require_admin()?;
    Ok(Json(service::update(&state.db, &id, dto).await?))
}

/// DELETE /api/users/:id/ (admin only)
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    user.require_admin()?;
    service::delete(&state.db, &id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:id/change-password/
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ChangePasswordDto>,
) -> ServiceResult<StatusCode> {
    service::change_password(&state.db, &id, dto, &claims).await?;
    Ok(StatusCode::OK)
}
