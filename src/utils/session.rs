use tower_sessions::Session;

use crate::features::errors::ApiError;

const USER_ID: &str = "user_id";
const USER_EMAIL: &str = "user_email";

/// Logs the learner in. The session id is rotated first.
pub async fn set_user_session(
    session: &Session,
    user_id: i32,
    email: &str,
) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await?;
    session.insert(USER_EMAIL, email).await?;
    Ok(())
}

pub async fn clear_user_session(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}

pub async fn get_current_user_id(session: &Session) -> Option<i32> {
    match session.get::<i32>(USER_ID).await {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Failed to get user_id from session: {}", e);
            None
        }
    }
}

pub async fn require_user(session: &Session) -> Result<i32, ApiError> {
    get_current_user_id(session).await.ok_or(ApiError::Unauthorized)
}

/// Whose data a read request is about: the `userId` query parameter when
/// given, otherwise the logged in learner
pub async fn resolve_owner(session: &Session, requested: Option<i32>) -> Result<i32, ApiError> {
    match requested {
        Some(user_id) => Ok(user_id),
        None => require_user(session).await,
    }
}
