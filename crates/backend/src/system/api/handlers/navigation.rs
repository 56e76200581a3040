use axum::{extract::State, Json};
use contracts::system::navigation::SessionContext;

use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service as user_service;

/// GET /api/navigation/
///
/// The signed-in user and the sidebar sections their role gets
pub async fn session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ServiceResult<Json<SessionContext>> {
    let user = user_service::get(&state.db, user.id()).await?;
    Ok(Json(SessionContext::new(user.info())))
}
