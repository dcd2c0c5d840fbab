use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{migrate::MigrateDatabase, PgPool, Postgres};
use tracing::info;

/// Connect to Postgres, creating the database on first run.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    if !Postgres::database_exists(database_url).await.unwrap_or(false) {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url)
            .await
            .context("creating database")?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connecting to database")?;

    info!("Connected to database");
    Ok(pool)
}

/// Run pending migrations. The schema must be current before the server
/// starts taking requests, so failures abort startup.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("running database migrations")?;
    info!("Database migrations are up to date");
    Ok(())
}
