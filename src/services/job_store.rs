use crate::error::{Error, Result};
use crate::models::job::EnrichedJobRecord;
use async_trait::async_trait;
use reqwest::Client;
use sqlx::PgPool;
use url::Url;

/// Destination for enriched records. Each call persists exactly one record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn save(&self, record: &EnrichedJobRecord) -> Result<()>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<EnrichedJobRecord>> {
        let jobs = sqlx::query_as::<_, EnrichedJobRecord>(
            r#"SELECT company_name, title, location, description, summary,
                      extensions, via, job_highlights
               FROM jobs
               ORDER BY created_at DESC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }
}

#[async_trait]
impl JobSink for PgJobStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn save(&self, record: &EnrichedJobRecord) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO jobs
                   (company_name, title, location, description, summary,
                    extensions, via, job_highlights)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(&record.company_name)
        .bind(&record.title)
        .bind(&record.location)
        .bind(&record.description)
        .bind(&record.summary)
        .bind(&record.extensions)
        .bind(&record.via)
        .bind(&record.job_highlights)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Inserts rows through Supabase's PostgREST endpoint.
#[derive(Clone)]
pub struct SupabaseJobStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl SupabaseJobStore {
    pub fn new(base_url: &str, api_key: String, table: &str, client: Client) -> Result<Self> {
        let endpoint = table_endpoint(base_url, table)?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

fn table_endpoint(base_url: &str, table: &str) -> Result<Url> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
    Ok(base.join(&format!("rest/v1/{}", table))?)
}

#[async_trait]
impl JobSink for SupabaseJobStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn save(&self, record: &EnrichedJobRecord) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        // PostgREST answers 201 Created on insert; anything outside 2xx is a rejection.
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "Supabase insert failed with {}: {}",
                status.as_u16(),
                text
            )));
        }
        Ok(())
    }
}
