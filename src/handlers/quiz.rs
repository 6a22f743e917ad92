use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use diesel::SqliteConnection;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::app::AppState;
use crate::data::models::{AttemptInput, Difficulty, Outcome, Subject};
use crate::data::repositories::WordRepository;
use crate::features::errors::ApiError;
use crate::features::quiz::{
    ActiveQuiz, QuestionDeck, QuizConfig, QuizMode, QuizQuestion, QuizSession, QuizState, QuizView,
};
use crate::features::tracker::ProgressTracker;
use crate::utils::{ApiJson, require_user, utc_now};

const MAX_QUESTIONS: usize = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    pub count: Option<usize>,
    pub seconds: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub mode: Option<QuizMode>,
}

impl QuizQuery {
    fn into_config(self) -> QuizConfig {
        let defaults = QuizConfig::default();
        QuizConfig {
            question_count: self.count.unwrap_or(defaults.question_count).clamp(1, MAX_QUESTIONS),
            seconds_per_question: self.seconds.unwrap_or(defaults.seconds_per_question).max(1),
            difficulty: self.difficulty,
            category: self.category.filter(|c| !c.trim().is_empty()),
            mode: self.mode.unwrap_or_default(),
        }
    }
}

/// Everything a client needs to run a quiz locally
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPlan {
    pub mode: QuizMode,
    pub seconds_per_question: u32,
    pub result_delay: u32,
    pub questions: Vec<QuizQuestion>,
}

/// Body of POST /api/quiz/session/answer. A missing option is a timeout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub option_id: Option<i32>,
}

pub fn quiz_router() -> Router<AppState> {
    Router::new()
        .route("/", get(build_quiz))
        .route("/session", get(current_quiz).post(start_quiz).delete(abandon_quiz))
        .route("/session/answer", post(answer_quiz))
        .route("/session/tick", post(tick_quiz))
}

fn draw_questions(
    conn: &mut SqliteConnection,
    config: &QuizConfig,
) -> Result<Vec<QuizQuestion>, ApiError> {
    WordRepository::seed_if_empty(conn, utc_now())?;
    let catalog = WordRepository::all(conn)?;
    Ok(QuestionDeck::new(
        &catalog,
        config.difficulty,
        config.category.as_deref(),
        config.question_count,
        StdRng::from_os_rng(),
    )
    .collect())
}

/// Stores the outcome of the question the quiz is showing a result for
fn record_result(
    conn: &mut SqliteConnection,
    user_id: i32,
    quiz: &ActiveQuiz,
    correct: bool,
) -> Result<(), ApiError> {
    let Some(question) = quiz.current_question() else {
        return Ok(());
    };
    let input = AttemptInput {
        subject: Subject::Vocabulary { word_id: question.word_id },
        outcome: Outcome::Answered { correct },
        status: None,
    };
    ProgressTracker::record_attempt(conn, user_id, &input, utc_now())?;
    Ok(())
}

pub async fn build_quiz(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<QuizPlan>, ApiError> {
    let config = query.into_config();
    let mut conn = state.pool.get()?;
    let questions = draw_questions(&mut conn, &config)?;
    if questions.is_empty() {
        return Err(ApiError::NotFound("Words matching the quiz filters"));
    }

    Ok(Json(QuizPlan {
        mode: config.mode,
        seconds_per_question: config.seconds_per_question,
        result_delay: config.mode.result_delay(),
        questions,
    }))
}

/// Starts a server-held quiz for the learner, replacing any unfinished one
pub async fn start_quiz(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<QuizQuery>,
) -> Result<(StatusCode, Json<QuizView>), ApiError> {
    let user_id = require_user(&session).await?;
    let config = query.into_config();
    let questions = {
        let mut conn = state.pool.get()?;
        draw_questions(&mut conn, &config)?
    };

    let mut quiz = QuizSession::new(config, questions.into_iter());
    quiz.start()?;
    let view = quiz.view();
    state.quizzes.lock().await.insert(user_id, quiz);
    log::info!("User {} started a quiz", user_id);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn current_quiz(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<QuizView>, ApiError> {
    let user_id = require_user(&session).await?;
    let quizzes = state.quizzes.lock().await;
    let quiz = quizzes.get(&user_id).ok_or(ApiError::NotFound("Quiz session"))?;
    Ok(Json(quiz.view()))
}

/// Answers the current question. The attempt is recorded like any other
/// vocabulary answer.
pub async fn answer_quiz(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<QuizAnswer>,
) -> Result<Json<QuizView>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut quizzes = state.quizzes.lock().await;
    let quiz = quizzes.get_mut(&user_id).ok_or(ApiError::NotFound("Quiz session"))?;

    let correct = quiz.answer(body.option_id)?;
    let mut conn = state.pool.get()?;
    record_result(&mut conn, user_id, quiz, correct)?;
    Ok(Json(quiz.view()))
}

/// One second passes. A question that runs out of time is recorded as wrong.
pub async fn tick_quiz(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<QuizView>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut quizzes = state.quizzes.lock().await;
    let quiz = quizzes.get_mut(&user_id).ok_or(ApiError::NotFound("Quiz session"))?;

    let before = quiz.state();
    let after = quiz.tick();
    if let (QuizState::InQuestion { .. }, QuizState::ShowingResult { correct, .. }) =
        (before, after)
    {
        let mut conn = state.pool.get()?;
        record_result(&mut conn, user_id, quiz, correct)?;
    }
    if quiz.is_complete() && before != QuizState::Complete {
        log::info!("User {} finished a quiz with {}%", user_id, quiz.score());
    }
    Ok(Json(quiz.view()))
}

pub async fn abandon_quiz(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&session).await?;
    match state.quizzes.lock().await.remove(&user_id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::NotFound("Quiz session")),
    }
}
