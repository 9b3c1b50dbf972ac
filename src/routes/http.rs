// Handlers: version, application summaries

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::models::{Application, ApplicationSummary, ApplicationView, RunningSummary};
use crate::stats;

type ApiError = (StatusCode, Json<serde_json::Value>);

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

fn check_size(state: &AppState, app: &Application) -> Result<(), ApiError> {
    let limit = state.config.server.max_instances;
    let count = app.instances().len();
    if count > limit {
        tracing::info!(app = %app.name, count, limit, "summary request rejected: too many instances");
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({
                "error": format!("{count} instances exceeds server.max_instances ({limit})"),
            })),
        ));
    }
    Ok(())
}

/// POST /api/summary: every aggregate for the posted application, measured now.
pub(super) async fn summary_handler(
    State(state): State<AppState>,
    Json(app): Json<Application>,
) -> Result<Json<ApplicationSummary>, ApiError> {
    check_size(&state, &app)?;
    let convention = state.config.aggregation.elapsed_convention;
    let summary = stats::summarize(&app, chrono::Utc::now(), convention);
    tracing::debug!(
        app = %app.name,
        total_transactions = summary.total_transactions,
        running = summary.running_instance_count,
        "summary computed"
    );
    Ok(Json(summary))
}

/// POST /api/summary/running: aggregates over running instances only.
pub(super) async fn running_summary_handler(
    State(state): State<AppState>,
    Json(app): Json<Application>,
) -> Result<Json<RunningSummary>, ApiError> {
    check_size(&state, &app)?;
    Ok(Json(stats::summarize_running(&app)))
}
