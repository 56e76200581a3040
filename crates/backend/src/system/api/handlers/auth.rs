use axum::{extract::State, http::StatusCode, Json};
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use contracts::system::users::User;

use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{jwt, refresh_token};
use crate::system::users::service as user_service;

/// POST /api/auth/token/
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let user = user_service::verify_credentials(&state.db, &request.username, &request.password)
        .await?;

    let token = jwt::generate_access_token(&state.jwt_secret, &user.id, &user.username, user.role)?;
    let refresh = jwt::generate_refresh_token();
    refresh_token::store(&state.db, &user.id, &refresh).await?;

    tracing::info!("User '{}' signed in as {}", user.username, user.role);
    Ok(Json(LoginResponse {
        token,
        refresh_token: refresh,
        user: user.info(),
    }))
}

/// POST /api/auth/refresh/
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ServiceResult<Json<RefreshResponse>> {
    let user_id = refresh_token::find_user_id(&state.db, &request.refresh_token)
        .await?
        .ok_or(ServiceError::Unauthorized)?;

    let user = user_service::get(&state.db, &user_id)
        .await
        .map_err(|_| ServiceError::Unauthorized)?;
    if !user.is_active {
        return Err(ServiceError::Unauthorized);
    }

    let token = jwt::generate_access_token(&state.jwt_secret, &user.id, &user.username, user.role)?;
    Ok(Json(RefreshResponse { token }))
}

/// POST /api/auth/logout/
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ServiceResult<StatusCode> {
    refresh_token::revoke(&state.db, &request.refresh_token).await?;
    Ok(StatusCode::OK)
}

/// GET /api/profile/
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ServiceResult<Json<User>> {
    Ok(Json(user_service::get(&state.db, user.id()).await?))
}
