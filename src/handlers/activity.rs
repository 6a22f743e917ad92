use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use tower_sessions::Session;
use validator::Validate;

use crate::app::AppState;
use crate::data::models::{MistakeRequest, MistakenWord, TimeSpentRequest, TimeSpentToday};
use crate::data::repositories::ActivityRepository;
use crate::features::errors::ApiError;
use crate::utils::{ApiJson, require_user, utc_now};

pub fn activity_router() -> Router<AppState> {
    Router::new()
        .route("/mistaken-words", get(list_mistakes).post(record_mistake))
        .route("/time-spent", get(time_spent_today).post(add_time_spent))
}

pub async fn record_mistake(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<MistakeRequest>,
) -> Result<Json<MistakenWord>, ApiError> {
    let user_id = require_user(&session).await?;
    request.validate()?;
    let mut conn = state.pool.get()?;
    Ok(Json(ActivityRepository::record_mistake(&mut conn, user_id, &request, utc_now())?))
}

pub async fn list_mistakes(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<MistakenWord>>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;
    Ok(Json(ActivityRepository::list_mistakes(&mut conn, user_id)?))
}

pub async fn add_time_spent(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<TimeSpentRequest>,
) -> Result<Json<TimeSpentToday>, ApiError> {
    let user_id = require_user(&session).await?;
    request.validate()?;
    let now = utc_now();
    let mut conn = state.pool.get()?;
    let row = ActivityRepository::add_time_spent(&mut conn, user_id, request.time_spent, now)?;
    Ok(Json(TimeSpentToday::new(now.date(), Some(row))))
}

pub async fn time_spent_today(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<TimeSpentToday>, ApiError> {
    let user_id = require_user(&session).await?;
    let today = utc_now().date();
    let mut conn = state.pool.get()?;
    let row = ActivityRepository::time_spent_on(&mut conn, user_id, today)?;
    Ok(Json(TimeSpentToday::new(today, row)))
}
