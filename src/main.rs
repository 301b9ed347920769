use axum::{routing::get, Router};
use job_seeker_lite::{
    config::{get_config, init_config},
    database::pool::connect_optional,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config()?;
    config.warn_missing();

    let pool = connect_optional(config.database_url.as_deref()).await;
    let app_state = AppState::from_config(config, pool)?;

    let caps = app_state.pipeline.capabilities();
    info!(
        search = caps.search,
        summarization = caps.summarization,
        sinks = ?caps.sinks,
        "Enrichment pipeline ready"
    );

    let app = Router::new()
        .route(
            "/",
            get(routes::search::search_page).post(routes::search::submit_search),
        )
        .route("/health", get(routes::health::health))
        .route("/api/jobs", get(routes::jobs::list_saved_jobs))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
