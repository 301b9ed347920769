use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::EnrichedJobRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchForm {
    #[validate(length(max = 200))]
    pub job_title: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub job_title: String,
    pub location: String,
}

impl From<SearchForm> for SearchQuery {
    fn from(form: SearchForm) -> Self {
        Self {
            job_title: form.job_title.unwrap_or_default().trim().to_string(),
            location: form.location.unwrap_or_default().trim().to_string(),
        }
    }
}

impl SearchQuery {
    /// Free-text query sent to the provider: title and location together.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.job_title, self.location)
            .trim()
            .to_string()
    }
}

/// Everything the search page renders: the job list and an optional error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub jobs: Vec<EnrichedJobRecord>,
    pub error: Option<String>,
}

impl SearchPage {
    pub fn with_jobs(jobs: Vec<EnrichedJobRecord>) -> Self {
        Self { jobs, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            jobs: Vec::new(),
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub search: bool,
    pub summarization: bool,
    pub sinks: Vec<String>,
}
