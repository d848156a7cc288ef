use std::sync::Arc;

use anyhow::Context;
use pipedeck_store::{Backend, Coordinator, MemoryBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StorageKind};
use crate::repository::PgBackend;

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pipedeck_server=debug,pipedeck_store=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pipedeck server...");

    let config = Config::from_env()?;
    config.validate()?;

    let backend = connect(&config).await?;

    // Build router with all API endpoints
    let app = api::create_router(Coordinator::new(backend));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}

/// Opens the configured storage backend
async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Backend>> {
    match config.storage {
        StorageKind::Postgres => {
            tracing::info!("Connecting to database...");

            let pool = db::create_pool(
                &config.database_url,
                config.max_connections,
                config.acquire_timeout,
            )
            .await
            .context("Failed to create database pool")?;

            tracing::info!("Database connection pool created");

            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            Ok(Arc::new(PgBackend::new(pool)))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost when the server stops");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}
