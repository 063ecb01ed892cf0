use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    // Layers run bottom-up: auth first, then the per-user budget.
    let coach_routes = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/voice", post(handlers::chat::voice))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_coach,
        ));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        // Mood
        .route(
            "/api/mood",
            get(handlers::mood::list_mood_entries).post(handlers::mood::create_mood_entry),
        )
        .route("/api/mood/trends", get(handlers::mood::get_mood_trends))
        .route("/api/mood/:id", delete(handlers::mood::delete_mood_entry))
        // Goals
        .route(
            "/api/goals",
            get(handlers::goals::list_goals).post(handlers::goals::create_goal),
        )
        .route(
            "/api/goals/:id",
            get(handlers::goals::get_goal)
                .put(handlers::goals::update_goal)
                .delete(handlers::goals::delete_goal),
        )
        .route(
            "/api/goals/:id/progress",
            post(handlers::goals::update_progress),
        )
        .route(
            "/api/goals/:id/complete",
            post(handlers::goals::complete_goal),
        )
        // Dashboard & affirmations
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/api/affirmations/today",
            get(handlers::affirmations::today),
        )
        .merge(coach_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    // Credentials cannot be combined with a wildcard origin.
    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins).allow_credentials(true)
}
