use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, patch};
use axum::Router;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tower_sessions::Session;
use validator::Validate;

use crate::app::AppState;
use crate::data::models::{
    Pagination, StatusUpdateRequest, WordItem, WordPage, WordPayload, WordQuery,
};
use crate::data::repositories::{AttemptRepository, WordFilter, WordRepository};
use crate::features::errors::ApiError;
use crate::features::example;
use crate::features::scheduler::{ReviewEvent, ReviewScheduler};
use crate::utils::{ApiJson, get_current_user_id, utc_now};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;
const NEXT_BATCH: i64 = 10;

pub fn words_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_words).post(create_words))
        .route("/next", get(next_words))
        .route("/{id}", patch(update_status))
        .route("/{id}/example", get(word_example))
}

/// Due words, one page at a time. Words the logged in learner already has a
/// pending review for are left out.
pub async fn list_words(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<WordQuery>,
) -> Result<Json<WordPage>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = Pagination::offset(page, limit)
        .ok_or_else(|| ApiError::Validation(format!("page {} is out of range", page)))?;
    let now = utc_now();
    let learner = get_current_user_id(&session).await;

    let mut conn = state.pool.get()?;
    WordRepository::seed_if_empty(&mut conn, now)?;

    let exclude = match learner {
        Some(user_id) => AttemptRepository::pending_word_ids(&mut conn, user_id, now)?,
        None => Vec::new(),
    };
    let filter = WordFilter {
        difficulty: query.difficulty,
        category: query.category.filter(|c| !c.trim().is_empty()),
        exclude,
        due_before: now,
    };

    let (words, total) = WordRepository::page(&mut conn, &filter, offset, limit)?;
    Ok(Json(WordPage { words, pagination: Pagination::new(page, limit, total) }))
}

pub async fn create_words(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WordPayload>,
) -> Result<(StatusCode, Json<Vec<WordItem>>), ApiError> {
    let requests = payload.into_vec();
    if requests.is_empty() {
        return Err(ApiError::Validation("At least one word is required".into()));
    }
    for request in &requests {
        request.validate()?;
    }

    let mut conn = state.pool.get()?;
    let words = WordRepository::insert_many(&mut conn, &requests, utc_now())?;
    log::info!("Added {} words to the catalog", words.len());
    Ok((StatusCode::CREATED, Json(words)))
}

pub async fn next_words(State(state): State<AppState>) -> Result<Json<Vec<WordItem>>, ApiError> {
    let now = utc_now();
    let mut conn = state.pool.get()?;
    WordRepository::seed_if_empty(&mut conn, now)?;
    Ok(Json(WordRepository::next_batch(&mut conn, now, NEXT_BATCH)?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(word_id): Path<i32>,
    ApiJson(request): ApiJson<StatusUpdateRequest>,
) -> Result<Json<WordItem>, ApiError> {
    let status = ReviewScheduler::parse_status_lossy(&request.status);
    let mut conn = state.pool.get()?;

    let word = WordRepository::find(&mut conn, word_id)?.ok_or(ApiError::NotFound("Word"))?;
    let event = ReviewEvent::StatusChange(status);
    let schedule = ReviewScheduler::schedule(event, word.status, utc_now());
    let updated = WordRepository::apply_schedule(&mut conn, word_id, &schedule)?
        .ok_or(ApiError::NotFound("Word"))?;
    Ok(Json(updated))
}

pub async fn word_example(
    State(state): State<AppState>,
    Path(word_id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let mut conn = state.pool.get()?;
    let word = WordRepository::find(&mut conn, word_id)?.ok_or(ApiError::NotFound("Word"))?;
    example::render(&state.templates, &word, &mut StdRng::from_os_rng())
}
