//! # Personhaus
//!
//! A small person-records service: a transactional person/phone/address
//! aggregate store over PostgreSQL with a thin service layer and a REST
//! surface in front of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use config::AppConfig;
//! use person_store::PersonStore;
//! use personhaus::{PersonService, RestServer};
//! use sqlx::postgres::PgPoolOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!
//!     let pool = PgPoolOptions::new()
//!         .max_connections(config.database.max_connections)
//!         .connect(&config.database.connection_string())
//!         .await?;
//!
//!     let store = PersonStore::new(pool).await?;
//!     let service = PersonService::builder().store(Arc::new(store)).build()?;
//!
//!     RestServer::builder()
//!         .service(Arc::new(service))
//!         .bind_addr(config.server.bind_addr()?)
//!         .build()?
//!         .start()
//!         .await
//! }
//! ```

pub mod errors;
pub mod server;
pub mod service;

// Re-export the main public types for convenience
pub use errors::WiringError;
pub use server::RestServer;
pub use service::{PersonOperations, PersonService};

// Re-export the member crates
pub use config;
pub use person_store;
