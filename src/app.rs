use std::sync::Arc;

use axum::Router;
use axum::routing::get_service;
use tera::Tera;
use time::Duration;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SimulationConfig;
use crate::db::DbPool;
use crate::features::quiz::QuizStore;
use crate::handlers::activity::activity_router;
use crate::handlers::auth::auth_router;
use crate::handlers::progress::progress_router;
use crate::handlers::quiz::quiz_router;
use crate::handlers::sentences::sentences_router;
use crate::handlers::simulation::simulation_router;
use crate::handlers::unseen::unseen_router;
use crate::handlers::words::words_router;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub templates: Arc<Tera>,
    pub simulation: SimulationConfig,
    pub bcrypt_cost: u32,
    pub quizzes: QuizStore,
}

pub fn build_router(state: AppState, session_ttl_days: i64, static_dir: &str) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_expiry(Expiry::OnInactivity(Duration::days(session_ttl_days)))
        .with_secure(false);

    let api_router = Router::new()
        .nest("/auth", auth_router())
        .nest("/words", words_router())
        .nest("/progress", progress_router())
        .nest("/sentence-questions", sentences_router())
        .nest("/unseen", unseen_router())
        .nest("/quiz", quiz_router())
        .merge(simulation_router())
        .merge(activity_router());

    Router::new()
        .nest("/api", api_router)
        .nest_service("/static", get_service(ServeDir::new(static_dir)))
        .layer(session_layer)
        .with_state(state)
}
