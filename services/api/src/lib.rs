// Library interface for the simulation service - exposes modules for testing

pub mod config;
pub mod domain;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod session;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Simulations
        .route("/api/simulations", post(handlers::simulations::run_simulation))
        .route(
            "/api/simulations/latest",
            get(handlers::simulations::latest_simulation),
        )
        .route(
            "/api/simulations/defaults",
            get(handlers::simulations::simulation_defaults),
        )
        // State
        .with_state(state)
        // Middleware
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
