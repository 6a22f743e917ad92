use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use tower_sessions::Session;

use crate::app::AppState;
use crate::data::models::{AttemptRecord, OwnerQuery, ProgressStats, RecordAttemptRequest};
use crate::features::errors::ApiError;
use crate::features::tracker::ProgressTracker;
use crate::utils::{ApiJson, require_user, resolve_owner, utc_now};

pub fn progress_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).post(record_progress))
        .route("/stats", get(progress_stats))
        .route("/{id}", patch(mark_reviewed))
}

pub async fn record_progress(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<RecordAttemptRequest>,
) -> Result<(StatusCode, Json<AttemptRecord>), ApiError> {
    let user_id = require_user(&session).await?;
    let input = request.into_input()?;

    let mut conn = state.pool.get()?;
    let record = ProgressTracker::record_attempt(&mut conn, user_id, &input, utc_now())?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_progress(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<AttemptRecord>>, ApiError> {
    let user_id = resolve_owner(&session, query.user_id).await?;
    let mut conn = state.pool.get()?;
    Ok(Json(ProgressTracker::list_attempts(&mut conn, user_id)?))
}

pub async fn mark_reviewed(
    State(state): State<AppState>,
    session: Session,
    Path(attempt_id): Path<i32>,
) -> Result<Json<AttemptRecord>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;
    Ok(Json(ProgressTracker::mark_reviewed(&mut conn, user_id, attempt_id)?))
}

pub async fn progress_stats(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<ProgressStats>, ApiError> {
    let user_id = resolve_owner(&session, query.user_id).await?;
    let mut conn = state.pool.get()?;
    Ok(Json(ProgressTracker::stats(&mut conn, user_id, utc_now())?))
}
