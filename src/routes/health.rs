use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{dto::search_dto::HealthResponse, AppState};

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let caps = state.pipeline.capabilities();
    let body = HealthResponse {
        status: "ok".to_string(),
        search: caps.search,
        summarization: caps.summarization,
        sinks: caps.sinks,
    };
    (StatusCode::OK, Json(body))
}
