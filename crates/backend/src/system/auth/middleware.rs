use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::shared::error::ServiceError;
use crate::shared::state::AppState;

/// Middleware that requires valid JWT authentication
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ServiceError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ServiceError::Unauthorized)?;

    let token = bearer_token(auth_header).ok_or(ServiceError::Unauthorized)?;

    let claims = super::jwt::validate_token(&state.jwt_secret, token).map_err(|e| {
        tracing::debug!("Rejected token: {:#}", e);
        ServiceError::Unauthorized
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Token from `Bearer <token>` or `Token <token>`
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Token "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
