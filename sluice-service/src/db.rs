use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Submitted pipeline descriptions, stored verbatim for restart
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS etl_descriptions (
            id UUID PRIMARY KEY,
            description VARCHAR(22550) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS etl_processes (
            id UUID PRIMARY KEY,
            description_id UUID NOT NULL REFERENCES etl_descriptions(id),
            status VARCHAR(20) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Parameters are not stored; restart rebuilds them from the description
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS etl_stages (
            id UUID PRIMARY KEY,
            process_id UUID NOT NULL REFERENCES etl_processes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT,
            UNIQUE (process_id, position)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_etl_processes_description_id ON etl_processes(description_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_etl_processes_status ON etl_processes(status)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
