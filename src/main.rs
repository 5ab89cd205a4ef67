//! Personhaus server binary.
//!
//! Startup order: configuration, pool, store (schema setup), service,
//! REST server. A failure anywhere in that chain aborts the process;
//! these are misconfigurations, not request-time errors.

use std::sync::Arc;
use std::time::Duration;

use config::{AppConfig, DatabaseConfig};
use person_store::{DbPool, PersonStore};
use personhaus::{PersonService, RestServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let pool = connect_pool(&config.database).await?;
    let store = PersonStore::new(pool).await?;
    let service = PersonService::builder().store(Arc::new(store)).build()?;

    let server = RestServer::builder()
        .service(Arc::new(service))
        .bind_addr(config.server.bind_addr()?)
        .build()?;

    server.start().await
}

async fn connect_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    pool_options.connect(&config.connection_string()).await
}
