use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    models::job::EnrichedJobRecord,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SavedJobsQuery {
    pub limit: Option<i64>,
}

/// Jobs previously saved to Postgres, newest first.
#[axum::debug_handler]
pub async fn list_saved_jobs(
    State(state): State<AppState>,
    Query(params): Query<SavedJobsQuery>,
) -> Result<Json<Vec<EnrichedJobRecord>>> {
    let store = state
        .job_store
        .as_ref()
        .ok_or_else(|| Error::Unavailable("Database storage is not configured".to_string()))?;
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let jobs = store.list_recent(limit).await?;
    Ok(Json(jobs))
}
