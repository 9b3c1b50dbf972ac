// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
}

pub fn app(config: AppConfig) -> Router {
    let state = AppState { config };
    Router::new()
        .route("/", get(|| async { "fleetstats: instance statistics aggregator" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/summary", post(http::summary_handler)) // POST /api/summary
        .route("/api/summary/running", post(http::running_summary_handler)) // POST /api/summary/running
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
