//! Person Store - persistence layer for the person aggregate
//!
//! This crate owns the relational schema for the person aggregate (the
//! person, phone and address tables plus the person-address link table),
//! the storage capability trait the service layer depends on, and the
//! PostgreSQL implementation with its transactional aggregate write.

pub mod entities;
pub mod errors;
pub mod schema;
pub mod store;
pub mod view;

pub use errors::StoreError;
pub use schema::TableSchema;
pub use store::{PersonStorage, PersonStore};
pub use view::PersonView;

use sqlx::PgPool;

pub type DbPool = PgPool;
