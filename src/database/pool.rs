use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Connects and migrates. Any failure disables database storage instead of
/// stopping the server.
pub async fn connect_optional(database_url: Option<&str>) -> Option<PgPool> {
    let url = database_url?;
    let pool = match create_pool(url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = ?e, "Error connecting to database, storage disabled");
            return None;
        }
    };
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!(error = ?e, "Error running migrations, storage disabled");
        return None;
    }
    tracing::info!("Database connected and migrated");
    Some(pool)
}
