use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tower_sessions::Session;

use crate::app::AppState;
use crate::config::SimulationConfig;
use crate::data::models::{SimulationRequest, SimulationRun};
use crate::data::repositories::SimulationRepository;
use crate::features::errors::ApiError;
use crate::features::tracker::ProgressTracker;
use crate::utils::{ApiJson, require_user, utc_now};

pub fn simulation_router() -> Router<AppState> {
    Router::new()
        .route("/simulation-progress", get(list_runs).post(record_run))
        .route("/simulation/config", get(simulation_config))
}

/// Stores a finished exam. The run also lands in the attempt history, so it
/// counts toward the stats.
pub async fn record_run(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<SimulationRequest>,
) -> Result<(StatusCode, Json<SimulationRun>), ApiError> {
    let user_id = require_user(&session).await?;
    request.check(&state.simulation)?;

    let mut conn = state.pool.get()?;
    let run = ProgressTracker::record_simulation(&mut conn, user_id, &request, utc_now())?;
    log::info!(
        "User {} finished a simulation with {}/{}",
        user_id,
        run.score,
        run.total_questions
    );
    Ok((StatusCode::CREATED, Json(run)))
}

pub async fn list_runs(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<SimulationRun>>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;
    Ok(Json(SimulationRepository::list_for_user(&mut conn, user_id)?))
}

pub async fn simulation_config(State(state): State<AppState>) -> Json<SimulationConfig> {
    Json(state.simulation)
}
