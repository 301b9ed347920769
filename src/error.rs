use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::dto::search_dto::SearchPage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("SerpApi API Key is not configured.")]
    SearchUnavailable,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Search provider error: {0}")]
    Search(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid form: {0}")]
    Form(#[from] axum::extract::rejection::FormRejection),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Excel read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Form(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::SearchUnavailable | Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Search(_) | Error::Reqwest(_) | Error::Json(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_message = match self {
            Error::Form(err) => err.body_text(),
            Error::Validation(err) => err.to_string(),
            Error::SearchUnavailable => Error::SearchUnavailable.to_string(),
            Error::Unavailable(msg) => msg,
            Error::Search(msg) => msg,
            Error::Reqwest(err) => format!("External service error: {}", err),
            Error::Json(err) => format!("Malformed provider response: {}", err),
            _ => "An unexpected error occurred".to_string(),
        };

        let body = Json(SearchPage::failed(error_message));
        (status, body).into_response()
    }
}
