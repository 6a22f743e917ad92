use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tower_sessions::Session;
use validator::Validate;

use crate::app::AppState;
use crate::data::models::{CurrentUser, RegisterForm};
use crate::data::repositories::UserRepository;
use crate::features::errors::ApiError;
use crate::utils::{ApiJson, set_user_session};

pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<(StatusCode, Json<CurrentUser>), ApiError> {
    form.validate()?;
    let email = form.email.trim().to_lowercase();

    let mut conn = state.pool.get()?;
    if UserRepository::email_exists(&mut conn, &email)? {
        log::warn!("Registration attempt with existing email: {}", email);
        return Err(ApiError::Validation("Email is already registered".into()));
    }

    let user = UserRepository::create_user(
        &mut conn,
        &email,
        form.name.trim(),
        &form.password,
        state.bcrypt_cost,
    )?;
    set_user_session(&session, user.user_id, &user.email).await?;

    log::info!("New user registered: {}", user.email);
    Ok((StatusCode::CREATED, Json(user.into())))
}
