use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};

pub const NO_DESCRIPTION: &str = "No description provided.";
pub const SUMMARIZATION_UNAVAILABLE: &str = "Summarization unavailable.";
pub const NO_SUMMARY: &str = "Could not generate summary.";
pub const SUMMARIZATION_ERROR: &str = "Error during summarization.";

const SUMMARY_INSTRUCTION: &str = "Summarize the following job description in less than 50 words:";

/// Text-in, text-out language model. `Ok(None)` means the call succeeded
/// but produced nothing usable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Option<String>>;
}

pub fn summary_prompt(description: &str) -> String {
    format!("{}\n\n{}", SUMMARY_INSTRUCTION, description)
}

/// Summary for one job description. Always returns a display string;
/// summarizer failures are logged and replaced by a fixed message.
pub async fn summarize_description(
    summarizer: Option<&dyn Summarizer>,
    description: &str,
) -> String {
    if description.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    let Some(summarizer) = summarizer else {
        tracing::debug!("Summarizer not configured, skipping summarization");
        return SUMMARIZATION_UNAVAILABLE.to_string();
    };

    match summarizer.complete(&summary_prompt(description)).await {
        Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("No response content received from summarizer");
            NO_SUMMARY.to_string()
        }
        Err(e) => {
            tracing::error!(error = ?e, "Summarization request failed");
            SUMMARIZATION_ERROR.to_string()
        }
    }
}

#[derive(Clone)]
pub struct OpenRouterService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    referer: String,
}

impl OpenRouterService {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        referer: String,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            referer,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Summarizer for OpenRouterService {
    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", "Job Seeker Lite")
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenRouter API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;
        Ok(first_choice_content(&body))
    }
}

fn first_choice_content(body: &JsonValue) -> Option<String> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
}
