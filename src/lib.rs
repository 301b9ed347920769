pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    export_service::SpreadsheetLog,
    job_store::{JobSink, PgJobStore, SupabaseJobStore},
    pipeline_service::EnrichmentPipeline,
    search_service::{JobSearch, SerpApiService},
    summary_service::{OpenRouterService, Summarizer},
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EnrichmentPipeline>,
    pub job_store: Option<PgJobStore>,
}

impl AppState {
    pub fn new(pipeline: EnrichmentPipeline, job_store: Option<PgJobStore>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            job_store,
        }
    }

    /// Wires every collaborator the configuration enables. `pool` is the
    /// already connected database, if any.
    pub fn from_config(config: &Config, pool: Option<PgPool>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let search: Option<Arc<dyn JobSearch>> = match &config.serpapi_api_key {
            Some(key) => Some(Arc::new(SerpApiService::new(
                key.clone(),
                config.serpapi_base_url.clone(),
                http_client.clone(),
            ))),
            None => {
                tracing::warn!("SerpApi API Key not found. Job search is disabled.");
                None
            }
        };

        let summarizer: Option<Arc<dyn Summarizer>> = match &config.openrouter_api_key {
            Some(key) => {
                let service = OpenRouterService::new(
                    key.clone(),
                    config.openrouter_model.clone(),
                    config.openrouter_base_url.clone(),
                    config.http_referer.clone(),
                    http_client.clone(),
                );
                tracing::info!(model = service.model(), "OpenRouter client initialized");
                Some(Arc::new(service))
            }
            None => {
                tracing::warn!("OpenRouter API Key not found. Skipping OpenRouter configuration.");
                None
            }
        };

        let mut sinks: Vec<Arc<dyn JobSink>> = Vec::new();
        let job_store = pool.map(PgJobStore::new);
        if let Some(store) = &job_store {
            sinks.push(Arc::new(store.clone()));
        }
        if let Some((url, key)) = config.supabase_credentials() {
            match SupabaseJobStore::new(url, key.to_string(), &config.supabase_table, http_client) {
                Ok(store) => {
                    tracing::info!(table = %config.supabase_table, "Supabase client initialized");
                    sinks.push(Arc::new(store));
                }
                Err(e) => tracing::error!(error = ?e, "Error initializing Supabase client"),
            }
        } else {
            tracing::info!("Supabase URL or Key not found. Skipping Supabase initialization.");
        }
        if config.excel_export_enabled {
            tracing::info!(path = %config.excel_file_path, "Spreadsheet export enabled");
            sinks.push(Arc::new(SpreadsheetLog::new(&config.excel_file_path)));
        }

        let pipeline = EnrichmentPipeline::new(search, summarizer, sinks);
        Ok(Self::new(pipeline, job_store))
    }
}
