/// Application routes configuration
use crate::handlers::{
    countdown_stream, get_company, get_countdown, get_launch, get_launch_site, get_news,
    get_rocket, health, list_companies, list_launch_sites, list_launches, list_news,
    list_rockets, AppState,
};
use axum::{routing::get, Router};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Launches
        .route("/api/v1/rocket-launches", get(list_launches))
        .route("/api/v1/rocket-launches/:id", get(get_launch))
        .route("/api/v1/rocket-launches/:id/countdown", get(get_countdown))
        .route(
            "/api/v1/rocket-launches/:id/countdown/stream",
            get(countdown_stream),
        )
        // Rockets
        .route("/api/v1/rockets", get(list_rockets))
        .route("/api/v1/rockets/:id", get(get_rocket))
        // Launch sites
        .route("/api/v1/launch-bases", get(list_launch_sites))
        .route("/api/v1/launch-bases/:id", get(get_launch_site))
        // Companies
        .route("/api/v1/companies", get(list_companies))
        .route("/api/v1/companies/:id", get(get_company))
        // News
        .route("/api/v1/news", get(list_news))
        .route("/api/v1/news/:id", get(get_news))
        .with_state(state)
}
