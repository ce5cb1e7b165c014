pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

use axum::{http::Method, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Build the read-only API router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::system::index))
        .route("/health", get(handlers::system::health))
        .route("/api/sentiment", get(handlers::sentiment::get_portfolio_sentiment))
        .route("/api/portfolio/risks", get(handlers::portfolio::get_portfolio_risks))
        .route("/api/portfolio/pl", get(handlers::portfolio::get_portfolio_pl))
        .route("/api/portfolio/top-news", get(handlers::portfolio::get_portfolio_news))
        .route("/api/portfolio/snapshot", get(handlers::portfolio::get_portfolio_snapshot))
        .route(
            "/api/portfolio/hedge-analysis",
            get(handlers::portfolio::get_hedge_analysis),
        )
        .route(
            "/api/portfolio/advanced-hedge",
            get(handlers::portfolio::get_advanced_hedge),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET])
                    .allow_headers(Any),
            ),
        )
}
