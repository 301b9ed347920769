use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub serpapi_api_key: Option<String>,
    pub serpapi_base_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub http_referer: String,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub supabase_table: String,
    pub database_url: Option<String>,
    pub excel_export_enabled: bool,
    pub excel_file_path: String,
    pub http_timeout_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        // Cloud Run sets K_SERVICE and injects the environment itself.
        if env::var("K_SERVICE").is_err() {
            if dotenv().is_ok() {
                tracing::info!("Loaded environment variables from .env file");
            }
        } else {
            tracing::info!("Running in a cloud environment, using platform environment variables");
        }

        let port: u16 = get_env_parse_or("PORT", 5001)?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", &format!("0.0.0.0:{}", port)),
            serpapi_api_key: get_env_opt("SERPAPI_API_KEY"),
            serpapi_base_url: get_env_or("SERPAPI_BASE_URL", "https://serpapi.com"),
            openrouter_api_key: get_env_opt("OPENROUTER_API_KEY"),
            openrouter_model: get_env_or(
                "OPENROUTER_MODEL",
                "google/gemini-2.5-flash-preview-05-20",
            ),
            openrouter_base_url: get_env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            http_referer: get_env_or("HTTP_REFERER", "http://localhost:5001"),
            supabase_url: get_env_opt("SUPABASE_URL"),
            supabase_key: get_env_opt("SUPABASE_KEY"),
            supabase_table: get_env_or("SUPABASE_TABLE", "jobs"),
            database_url: get_env_opt("DATABASE_URL"),
            excel_export_enabled: get_env_bool("EXCEL_EXPORT_ENABLED")?,
            excel_file_path: get_env_or("EXCEL_FILE_PATH", "job_applications.xlsx"),
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", 60)?,
        })
    }

    /// Both Supabase settings are required for the REST store.
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }

    pub fn warn_missing(&self) {
        let has_store = self.database_url.is_some() || self.supabase_credentials().is_some();
        if self.serpapi_api_key.is_none() || self.openrouter_api_key.is_none() || !has_store {
            tracing::warn!(
                search = self.serpapi_api_key.is_some(),
                summarization = self.openrouter_api_key.is_some(),
                store = has_store,
                "One or more API keys or database credentials are not set; those features are disabled"
            );
        }
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn get_env_bool(name: &str) -> Result<bool> {
    match get_env_opt(name).as_deref() {
        None => Ok(false),
        Some(raw) => parse_bool(raw)
            .ok_or_else(|| Error::Config(format!("Invalid boolean for {}: {}", name, raw))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
