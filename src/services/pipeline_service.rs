use crate::dto::search_dto::SearchQuery;
use crate::error::{Error, Result};
use crate::models::job::{EnrichedJobRecord, RawJobResult};
use crate::services::job_store::JobSink;
use crate::services::search_service::JobSearch;
use crate::services::summary_service::{summarize_description, Summarizer};
use std::sync::Arc;

/// Results beyond this many are dropped, whatever the provider returns.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub search: bool,
    pub summarization: bool,
    pub sinks: Vec<String>,
}

/// Search, summarize and persist. Collaborators are optional: a missing one
/// disables its step instead of failing the request.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    search: Option<Arc<dyn JobSearch>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    sinks: Vec<Arc<dyn JobSink>>,
}

impl EnrichmentPipeline {
    pub fn new(
        search: Option<Arc<dyn JobSearch>>,
        summarizer: Option<Arc<dyn Summarizer>>,
        sinks: Vec<Arc<dyn JobSink>>,
    ) -> Self {
        Self {
            search,
            summarizer,
            sinks,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            search: self.search.is_some(),
            summarization: self.summarizer.is_some(),
            sinks: self.sinks.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    /// Runs one search request end to end. A search failure yields no
    /// records at all.
    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<EnrichedJobRecord>> {
        let search = self.search.as_ref().ok_or(Error::SearchUnavailable)?;
        let raw = search.search(query).await?;
        Ok(self.enrich(raw, &query.location).await)
    }

    /// Enriches the first `MAX_RESULTS` raw results in order. One result is
    /// summarized and handed to every sink before the next one starts.
    pub async fn enrich(
        &self,
        raw: Vec<RawJobResult>,
        fallback_location: &str,
    ) -> Vec<EnrichedJobRecord> {
        let mut records = Vec::with_capacity(raw.len().min(MAX_RESULTS));

        for job in raw.into_iter().take(MAX_RESULTS) {
            let description = job.description.as_deref().unwrap_or_default();
            let summary = summarize_description(self.summarizer.as_deref(), description).await;
            let record = EnrichedJobRecord::from_raw(job, fallback_location, summary);

            self.persist(&record).await;
            records.push(record);
        }

        records
    }

    async fn persist(&self, record: &EnrichedJobRecord) {
        if self.sinks.is_empty() {
            tracing::debug!(title = record.display_title(), "No storage configured, skipping save");
            return;
        }
        for sink in &self.sinks {
            match sink.save(record).await {
                Ok(()) => {
                    tracing::info!(sink = sink.name(), title = record.display_title(), "Saved job")
                }
                Err(e) => tracing::error!(
                    sink = sink.name(),
                    title = record.display_title(),
                    error = ?e,
                    "Failed to save job"
                ),
            }
        }
    }
}
