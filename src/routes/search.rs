use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Json},
    Form,
};
use tracing::Instrument;
use validator::Validate;

use crate::{
    dto::search_dto::{SearchForm, SearchPage, SearchQuery},
    error::{Error, Result},
    AppState,
};

#[axum::debug_handler]
pub async fn search_page() -> impl IntoResponse {
    Json(SearchPage::default())
}

#[axum::debug_handler]
pub async fn submit_search(
    State(state): State<AppState>,
    form: std::result::Result<Form<SearchForm>, FormRejection>,
) -> Result<Json<SearchPage>> {
    let Form(form) = form?;
    form.validate()?;
    let query = SearchQuery::from(form);

    let search_id = uuid::Uuid::new_v4();
    tracing::info!(%search_id, job_title = %query.job_title, location = %query.location, "Searching for jobs");

    let outcome = state
        .pipeline
        .run(&query)
        .instrument(tracing::info_span!("search", %search_id))
        .await;

    match outcome {
        Ok(jobs) => {
            tracing::info!(%search_id, count = jobs.len(), "Search finished");
            Ok(Json(SearchPage::with_jobs(jobs)))
        }
        Err(Error::SearchUnavailable) => Err(Error::SearchUnavailable),
        Err(e) => {
            tracing::error!(%search_id, error = ?e, "Error during job search or processing");
            Err(Error::Search(format!(
                "An error occurred during the job search: {}",
                e
            )))
        }
    }
}
