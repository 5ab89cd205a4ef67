//! Table schema setup.
//!
//! Runs once at store construction. All DDL is `CREATE TABLE IF NOT EXISTS`,
//! so re-running against an existing database is a no-op.

use sqlx::PgPool;

use crate::entities::{AddressRecord, PersonAddressRecord, PersonRecord, PhoneRecord};
use crate::errors::StoreError;

/// Static DDL metadata implemented by each entity row type.
pub trait TableSchema {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// Generate CREATE TABLE SQL statement
    fn create_table_sql() -> &'static str;
}

/// Ensure all four aggregate tables exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), StoreError> {
    create_table::<PersonRecord>(pool).await?;
    create_table::<PhoneRecord>(pool).await?;
    create_table::<AddressRecord>(pool).await?;
    create_table::<PersonAddressRecord>(pool).await?;
    Ok(())
}

async fn create_table<T: TableSchema>(pool: &PgPool) -> Result<(), StoreError> {
    tracing::debug!(table = T::table_name(), "creating table if missing");
    sqlx::query(T::create_table_sql())
        .execute(pool)
        .await
        .map_err(|e| StoreError::database_operation(T::table_name(), "create table", e))?;
    Ok(())
}
