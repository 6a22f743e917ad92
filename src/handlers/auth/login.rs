use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tower_sessions::Session;

use crate::app::AppState;
use crate::data::models::{CurrentUser, LoginForm};
use crate::data::repositories::UserRepository;
use crate::features::errors::ApiError;
use crate::utils::{ApiJson, clear_user_session, require_user, set_user_session};

pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<CurrentUser>, ApiError> {
    let email = form.email.trim().to_lowercase();
    let mut conn = state.pool.get()?;

    let Some(user) = UserRepository::find_by_email(&mut conn, &email)? else {
        log::warn!("User not found: {}", email);
        return Err(ApiError::InvalidCredentials);
    };

    if !UserRepository::verify_password(&user.password, &form.password)? {
        log::warn!("Invalid password for user: {}", email);
        return Err(ApiError::InvalidCredentials);
    }

    set_user_session(&session, user.user_id, &user.email).await?;
    Ok(Json(user.into()))
}

pub async fn handle_logout(session: Session) -> Result<StatusCode, ApiError> {
    clear_user_session(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CurrentUser>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;
    let user = UserRepository::find_by_id(&mut conn, user_id)?.ok_or(ApiError::Unauthorized)?;
    Ok(Json(user.into()))
}
