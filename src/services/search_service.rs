use crate::dto::search_dto::SearchQuery;
use crate::error::{Error, Result};
use crate::models::job::RawJobResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawJobResult>>;
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    jobs_results: Vec<RawJobResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct SerpApiService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiService {
    pub fn new(api_key: String, base_url: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn params(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", "google_jobs".to_string()),
            ("q", query.query_text()),
        ];
        if !query.location.is_empty() {
            params.push(("location", query.location.clone()));
        }
        params.push(("api_key", self.api_key.clone()));
        params
    }
}

#[async_trait]
impl JobSearch for SerpApiService {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawJobResult>> {
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&self.params(query))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Search(format!(
                "SerpApi returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let parsed = parse_response(&text)?;
        tracing::info!(count = parsed.len(), "Found jobs via SerpApi");
        Ok(parsed)
    }
}

fn parse_response(body: &str) -> Result<Vec<RawJobResult>> {
    let parsed: SerpApiResponse = serde_json::from_str(body)?;
    if let Some(message) = parsed.error {
        // "Google hasn't returned any results" arrives as an error field.
        tracing::warn!(error = %message, "SerpApi reported no results");
    }
    Ok(parsed.jobs_results)
}
