use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use job_seeker_lite::{
    dto::search_dto::SearchQuery,
    error::{Error, Result},
    models::job::{EnrichedJobRecord, RawJobResult},
    services::{
        job_store::JobSink, pipeline_service::EnrichmentPipeline, search_service::JobSearch,
        summary_service::Summarizer,
    },
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

struct FixtureSearch {
    calls: AtomicUsize,
}

#[async_trait]
impl JobSearch for FixtureSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawJobResult>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if query.job_title == "explode" && call == 0 {
            return Err(Error::Search("SerpApi returned 500: upstream down".to_string()));
        }
        let body = json!([
            {
                "company_name": "Acme",
                "title": format!("{} I", query.job_title),
                "description": "Write Rust services.",
                "via": "LinkedIn",
                "detected_extensions": { "posted_at": "3 days ago", "schedule_type": "Full-time" },
                "job_highlights": { "Qualifications": ["Rust", "Tokio"], "Benefits": "Remote" }
            },
            {
                "title": format!("{} II", query.job_title),
                "job_highlights": ["On-call", "Travel"]
            }
        ]);
        Ok(serde_json::from_value(body)?)
    }
}

struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>> {
        Ok(Some(" Rust backend role. ".to_string()))
    }
}

#[derive(Default)]
struct CountingSink {
    saved: AtomicUsize,
}

#[async_trait]
impl JobSink for CountingSink {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn save(&self, _record: &EnrichedJobRecord) -> Result<()> {
        self.saved.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn app(pipeline: EnrichmentPipeline) -> Router {
    let state = AppState::new(pipeline, None);
    Router::new()
        .route(
            "/",
            get(job_seeker_lite::routes::search::search_page)
                .post(job_seeker_lite::routes::search::submit_search),
        )
        .route("/health", get(job_seeker_lite::routes::health::health))
        .route(
            "/api/jobs",
            get(job_seeker_lite::routes::jobs::list_saved_jobs),
        )
        .with_state(state)
}

fn search_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn full_pipeline(sink: Arc<CountingSink>) -> EnrichmentPipeline {
    EnrichmentPipeline::new(
        Some(Arc::new(FixtureSearch {
            calls: AtomicUsize::new(0),
        })),
        Some(Arc::new(EchoSummarizer)),
        vec![sink],
    )
}

#[tokio::test]
async fn get_renders_empty_result_set() {
    let app = app(EnrichmentPipeline::new(None, None, vec![]));

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body, json!({ "jobs": [], "error": null }));
}

#[tokio::test]
async fn post_returns_enriched_records_and_persists_each() {
    let sink = Arc::new(CountingSink::default());
    let app = app(full_pipeline(sink.clone()));

    let resp = app
        .oneshot(search_request("job_title=Rust+Engineer&location=Austin%2C+TX"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert!(body["error"].is_null());
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);

    assert_eq!(jobs[0]["title"], "Rust Engineer I");
    assert_eq!(jobs[0]["location"], "Austin, TX");
    assert_eq!(jobs[0]["summary"], "Rust backend role.");
    assert_eq!(jobs[0]["extensions"], "posted_at, schedule_type");
    assert_eq!(jobs[0]["job_highlights"], "Rust, Tokio, Remote");
    assert_eq!(jobs[0]["via"], "LinkedIn");

    assert!(jobs[1]["company_name"].is_null());
    assert_eq!(jobs[1]["via"], "Unknown");
    assert_eq!(jobs[1]["description"], "");
    assert_eq!(jobs[1]["summary"], "No description provided.");
    assert_eq!(jobs[1]["job_highlights"], "On-call, Travel");

    assert_eq!(sink.saved.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn search_failure_is_reported_and_next_request_still_served() {
    let sink = Arc::new(CountingSink::default());
    let app = app(full_pipeline(sink.clone()));

    let resp = app
        .clone()
        .oneshot(search_request("job_title=explode&location=Berlin"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert_eq!(body["jobs"], json!([]));
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred during the job search:"));
    assert_eq!(sink.saved.load(Ordering::SeqCst), 0);

    let resp = app
        .oneshot(search_request("job_title=explode&location=Berlin"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["jobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_search_key_is_a_user_visible_error() {
    let app = app(EnrichmentPipeline::new(None, Some(Arc::new(EchoSummarizer)), vec![]));

    let resp = app
        .oneshot(search_request("job_title=Rust&location=Remote"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "SerpApi API Key is not configured.");
    assert_eq!(body["jobs"], json!([]));
}

#[tokio::test]
async fn oversized_form_fields_are_rejected() {
    let app = app(full_pipeline(Arc::new(CountingSink::default())));
    let form = format!("job_title={}&location=Remote", "a".repeat(201));

    let resp = app.oneshot(search_request(&form)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn malformed_form_gets_search_page_error() {
    let app = app(full_pipeline(Arc::new(CountingSink::default())));

    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"job_title":"Rust"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    assert_eq!(body["jobs"], json!([]));
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn pipeline_logs_carry_the_search_id() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = app(full_pipeline(Arc::new(CountingSink::default())));
    let resp = app
        .oneshot(search_request("job_title=Rust&location=Berlin"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let saved: Vec<&str> = output.lines().filter(|l| l.contains("Saved job")).collect();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|l| l.contains("search{search_id=")));
}

#[tokio::test]
async fn health_lists_enabled_collaborators() {
    let app = app(full_pipeline(Arc::new(CountingSink::default())));

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({ "status": "ok", "search": true, "summarization": true, "sinks": ["counting"] })
    );
}

#[tokio::test]
async fn saved_jobs_require_database() {
    let app = app(EnrichmentPipeline::new(None, None, vec![]));

    let req = Request::builder().uri("/api/jobs").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
