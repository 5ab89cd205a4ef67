//! Entity row types for the person aggregate tables.
//!
//! Ids are assigned by the database (`SERIAL`) and never reused. There are
//! no declared foreign keys; referential integrity between the person,
//! address and link rows comes from the insert ordering inside the
//! aggregate-create transaction.

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// The aggregate root.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonRecord {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl TableSchema for PersonRecord {
    fn table_name() -> &'static str {
        "person"
    }

    fn create_table_sql() -> &'static str {
        "CREATE TABLE IF NOT EXISTS person (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            age INT NOT NULL
        )"
    }
}

/// Phone row, keyed to its person. One per person in current usage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhoneRecord {
    pub id: i32,
    pub person_id: i32,
    pub number: String,
}

impl TableSchema for PhoneRecord {
    fn table_name() -> &'static str {
        "phone"
    }

    fn create_table_sql() -> &'static str {
        "CREATE TABLE IF NOT EXISTS phone (
            id SERIAL PRIMARY KEY,
            person_id INT NOT NULL,
            number TEXT NOT NULL
        )"
    }
}

/// Address row. All fields are free text; no validation happens here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct AddressRecord {
    pub id: i32,
    pub city: String,
    pub state: String,
    pub street1: String,
    pub street2: String,
    pub zip: String,
}

impl TableSchema for AddressRecord {
    fn table_name() -> &'static str {
        "address"
    }

    fn create_table_sql() -> &'static str {
        "CREATE TABLE IF NOT EXISTS address (
            id SERIAL PRIMARY KEY,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            street1 TEXT NOT NULL,
            street2 TEXT NOT NULL,
            zip TEXT NOT NULL
        )"
    }
}

/// Link row associating a person with an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonAddressRecord {
    pub id: i32,
    pub person_id: i32,
    pub address_id: i32,
}

impl TableSchema for PersonAddressRecord {
    fn table_name() -> &'static str {
        "address_join"
    }

    fn create_table_sql() -> &'static str {
        "CREATE TABLE IF NOT EXISTS address_join (
            id SERIAL PRIMARY KEY,
            person_id INT NOT NULL,
            address_id INT NOT NULL
        )"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_is_idempotent() {
        for sql in [
            PersonRecord::create_table_sql(),
            PhoneRecord::create_table_sql(),
            AddressRecord::create_table_sql(),
            PersonAddressRecord::create_table_sql(),
        ] {
            assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS"));
            assert!(sql.contains("SERIAL PRIMARY KEY"));
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(PersonRecord::table_name(), "person");
        assert_eq!(PhoneRecord::table_name(), "phone");
        assert_eq!(AddressRecord::table_name(), "address");
        assert_eq!(PersonAddressRecord::table_name(), "address_join");
    }
}
