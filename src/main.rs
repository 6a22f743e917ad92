use std::sync::Arc;

use anyhow::Context;
use tera::Tera;
use tokio::net::TcpListener;

mod app;
mod config;
mod data;
mod db;
mod features;
mod handlers;
mod schema;
mod utils;

use app::{AppState, build_router};
use config::AppConfig;
use features::quiz::QuizStore;

const POOL_SIZE: u32 = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    // Database configuration
    let pool = db::build_pool(&config.database_url, POOL_SIZE)
        .with_context(|| format!("Failed to create DB pool for {}", config.database_url))?;
    {
        let mut conn = pool.get()?;
        db::run_migrations(&mut conn).context("Failed to apply migrations")?;
    }

    // Templates configuration
    let templates = Tera::new(&config.templates_glob).context("Template parsing error")?;

    let state = AppState {
        pool,
        templates: Arc::new(templates),
        simulation: config.simulation,
        bcrypt_cost: config.bcrypt_cost,
        quizzes: QuizStore::default(),
    };
    let app = build_router(state, config.session_ttl_days, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;
    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
