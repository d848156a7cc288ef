use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create pipelines table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipelines (
            pipeline_id UUID PRIMARY KEY,
            pipeline_name VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Stages reference pipelines without ON DELETE CASCADE: deletes are
    // ordered by the hierarchy store, the database only refuses orphans.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_stages (
            stage_id UUID PRIMARY KEY,
            pipeline_id UUID NOT NULL REFERENCES pipelines(pipeline_id),
            stage_name VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create fields table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_fields (
            field_id UUID PRIMARY KEY,
            stage_id UUID NOT NULL REFERENCES pipeline_stages(stage_id),
            field_name VARCHAR(255) NOT NULL,
            field_type VARCHAR(20) NOT NULL DEFAULT 'text'
                CHECK (field_type IN ('text', 'checkbox', 'file')),
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for child lookups and cascades
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pipeline_stages_pipeline_id ON pipeline_stages(pipeline_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pipeline_fields_stage_id ON pipeline_fields(stage_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
