use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_sessions::Session;
use validator::Validate;

use crate::app::AppState;
use crate::data::models::{AnswerSheet, GradeReport, NewPassageRequest, PublicPassage};
use crate::data::repositories::PassageRepository;
use crate::features::errors::ApiError;
use crate::utils::{ApiJson, require_user, utc_now};

pub fn unseen_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_passages).post(create_passage))
        .route("/{id}", get(get_passage))
        .route("/{id}/answers", post(grade_answers))
}

pub async fn list_passages(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicPassage>>, ApiError> {
    let mut conn = state.pool.get()?;
    let passages = PassageRepository::list_all(&mut conn)?;
    if passages.is_empty() {
        return Err(ApiError::NotFound("Unseen passages"));
    }
    Ok(Json(passages.into_iter().map(PublicPassage::from).collect()))
}

pub async fn get_passage(
    State(state): State<AppState>,
    Path(passage_id): Path<i32>,
) -> Result<Json<PublicPassage>, ApiError> {
    let mut conn = state.pool.get()?;
    let passage = PassageRepository::find(&mut conn, passage_id)?
        .ok_or(ApiError::NotFound("Unseen passage"))?;
    Ok(Json(passage.into()))
}

pub async fn create_passage(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<NewPassageRequest>,
) -> Result<(StatusCode, Json<PublicPassage>), ApiError> {
    require_user(&session).await?;
    request.validate()?;

    let mut conn = state.pool.get()?;
    let passage = PassageRepository::insert(&mut conn, &request, utc_now())?
        .ok_or_else(|| ApiError::Internal("inserted passage vanished".into()))?;
    log::info!("Imported unseen passage {} with {} questions", passage.id, passage.questions.len());
    Ok((StatusCode::CREATED, Json(passage.into())))
}

/// Grades on the server so answers never have to leave it
pub async fn grade_answers(
    State(state): State<AppState>,
    Path(passage_id): Path<i32>,
    ApiJson(sheet): ApiJson<AnswerSheet>,
) -> Result<Json<GradeReport>, ApiError> {
    let mut conn = state.pool.get()?;
    let passage = PassageRepository::find(&mut conn, passage_id)?
        .ok_or(ApiError::NotFound("Unseen passage"))?;
    Ok(Json(passage.grade(&sheet.answers)))
}
