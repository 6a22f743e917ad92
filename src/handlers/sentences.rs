use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use validator::Validate;

use crate::app::AppState;
use crate::data::models::{SentencePayload, SentenceQuestion};
use crate::data::repositories::SentenceRepository;
use crate::features::errors::ApiError;
use crate::utils::{ApiJson, utc_now};

pub fn sentences_router() -> Router<AppState> {
    Router::new().route("/", get(list_questions).post(create_questions))
}

pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SentenceQuestion>>, ApiError> {
    let mut conn = state.pool.get()?;
    SentenceRepository::seed_if_empty(&mut conn, utc_now())?;
    Ok(Json(SentenceRepository::list_all(&mut conn)?))
}

pub async fn create_questions(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SentencePayload>,
) -> Result<(StatusCode, Json<Vec<SentenceQuestion>>), ApiError> {
    let questions = payload.into_vec();
    if questions.is_empty() {
        return Err(ApiError::Validation("At least one question is required".into()));
    }
    for question in &questions {
        question.validate()?;
    }

    let mut conn = state.pool.get()?;
    let created = SentenceRepository::insert_many(&mut conn, &questions, utc_now())?;
    Ok((StatusCode::CREATED, Json(created)))
}
