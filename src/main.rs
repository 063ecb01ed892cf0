use std::sync::Arc;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::{GoalRepository, MoodRepository};
use services::coach::{CoachService, OpenAiClient};

#[derive(Clone)]
pub struct AppState {
    pub moods: Arc<dyn MoodRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub coach: Arc<CoachService>,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "successcoach_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let (moods, goals) = match &config.database_url {
        Some(url) => {
            let pool = db::pool::connect_and_migrate(url).await;
            (
                Arc::new(db::PgMoodRepository::new(pool.clone())) as Arc<dyn MoodRepository>,
                Arc::new(db::PgGoalRepository::new(pool)) as Arc<dyn GoalRepository>,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            (
                Arc::new(db::MemoryMoodRepository::new()) as Arc<dyn MoodRepository>,
                Arc::new(db::MemoryGoalRepository::new()) as Arc<dyn GoalRepository>,
            )
        }
    };

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY not set, coach replies will use fallbacks");
    }
    let openai = OpenAiClient::from_config(&config).expect("Failed to build OpenAI client");

    let rate_limiter = RateLimitState::new();
    auth::rate_limit::spawn_cleanup_worker(rate_limiter.clone());

    let state = AppState {
        moods,
        goals,
        coach: Arc::new(CoachService::new(Arc::new(openai))),
        config: config.clone(),
        rate_limiter,
    };

    let app = routes::router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
