//! PostgreSQL-backed person aggregate store.

use async_trait::async_trait;

use crate::entities::{AddressRecord, PersonAddressRecord, PersonRecord, PhoneRecord};
use crate::errors::StoreError;
use crate::schema::{self, TableSchema};
use crate::view::PersonView;
use crate::DbPool;

/// Persistence capability for the person aggregate.
///
/// The service layer holds this as a trait object so the transactional
/// store can be swapped for a double that fails mid-write.
#[async_trait]
pub trait PersonStorage: Send + Sync {
    /// Atomically write a person together with its phone, address and link
    /// rows. Either all four rows exist afterwards or none of them do.
    async fn create_aggregate(&self, view: PersonView) -> Result<PersonView, StoreError>;

    /// Reconstruct the full view for one person. A missing person row is
    /// [`StoreError::NotFound`]; missing phone, link or address rows are
    /// tolerated and leave the matching fields empty.
    async fn get_aggregate_by_id(&self, id: i32) -> Result<PersonView, StoreError>;

    /// Page through person rows in id order. Returns id, name and age only;
    /// list results are deliberately not enriched with phone or address
    /// data the way [`get_aggregate_by_id`](Self::get_aggregate_by_id) is.
    async fn list_aggregates(&self, offset: i64, limit: i64)
        -> Result<Vec<PersonView>, StoreError>;
}

/// Store over a live connection pool. Construction ensures the schema, so a
/// usable `PersonStore` always has its tables.
pub struct PersonStore {
    pool: DbPool,
}

impl PersonStore {
    /// Create the store and ensure the aggregate tables exist. A schema
    /// failure here is a startup failure; callers are expected to abort.
    pub async fn new(pool: DbPool) -> Result<Self, StoreError> {
        schema::ensure_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PersonStorage for PersonStore {
    async fn create_aggregate(&self, view: PersonView) -> Result<PersonView, StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            StoreError::database_operation(PersonRecord::table_name(), "begin transaction", e)
        })?;

        // Insert order matters: the link row references ids assigned by the
        // person and address inserts. Any error path drops `tx`, which
        // rolls the whole write back; the same holds when the calling
        // future is cancelled mid-flight.
        let person_id: i32 =
            sqlx::query_scalar("INSERT INTO person (name, age) VALUES ($1, $2) RETURNING id")
                .bind(&view.name)
                .bind(view.age)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    StoreError::database_operation(PersonRecord::table_name(), "insert person", e)
                })?;

        sqlx::query("INSERT INTO phone (person_id, number) VALUES ($1, $2)")
            .bind(person_id)
            .bind(&view.number)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                StoreError::database_operation(PhoneRecord::table_name(), "insert phone", e)
            })?;

        let address_id: i32 = sqlx::query_scalar(
            "INSERT INTO address (city, state, street1, street2, zip)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&view.city)
        .bind(&view.state)
        .bind(&view.street1)
        .bind(&view.street2)
        .bind(&view.zip)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StoreError::database_operation(AddressRecord::table_name(), "insert address", e)
        })?;

        sqlx::query("INSERT INTO address_join (person_id, address_id) VALUES ($1, $2)")
            .bind(person_id)
            .bind(address_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                StoreError::database_operation(
                    PersonAddressRecord::table_name(),
                    "insert address link",
                    e,
                )
            })?;

        tx.commit().await.map_err(|e| {
            StoreError::database_operation(PersonRecord::table_name(), "commit aggregate", e)
        })?;

        Ok(PersonView {
            id: Some(person_id),
            ..view
        })
    }

    async fn get_aggregate_by_id(&self, id: i32) -> Result<PersonView, StoreError> {
        let person =
            sqlx::query_as::<_, PersonRecord>("SELECT id, name, age FROM person WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::query_execution(PersonRecord::table_name(), "get person", e)
                })?
                .ok_or(StoreError::NotFound)?;

        let phone = sqlx::query_as::<_, PhoneRecord>(
            "SELECT id, person_id, number FROM phone WHERE person_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::query_execution(PhoneRecord::table_name(), "get phone", e))?;

        let link = sqlx::query_as::<_, PersonAddressRecord>(
            "SELECT id, person_id, address_id FROM address_join
             WHERE person_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            StoreError::query_execution(PersonAddressRecord::table_name(), "get address link", e)
        })?;

        // The address is only reachable through a link row.
        let address = match &link {
            Some(link) => sqlx::query_as::<_, AddressRecord>(
                "SELECT id, city, state, street1, street2, zip FROM address WHERE id = $1",
            )
            .bind(link.address_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                StoreError::query_execution(AddressRecord::table_name(), "get address", e)
            })?,
            None => None,
        };

        Ok(assemble_view(person, phone, address))
    }

    async fn list_aggregates(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PersonView>, StoreError> {
        let persons = sqlx::query_as::<_, PersonRecord>(
            "SELECT id, name, age FROM person ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(offset.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query_execution(PersonRecord::table_name(), "list persons", e))?;

        Ok(persons
            .into_iter()
            .map(|p| PersonView {
                id: Some(p.id),
                name: p.name,
                age: p.age,
                ..Default::default()
            })
            .collect())
    }
}

/// Flatten the rows of one aggregate into the transfer shape. Missing phone
/// or address rows contribute empty fields, not errors.
fn assemble_view(
    person: PersonRecord,
    phone: Option<PhoneRecord>,
    address: Option<AddressRecord>,
) -> PersonView {
    let phone = phone.unwrap_or_default();
    let address = address.unwrap_or_default();

    PersonView {
        id: None,
        name: person.name,
        age: person.age,
        number: phone.number,
        city: address.city,
        state: address.state,
        street1: address.street1,
        street2: address.street2,
        zip: address.zip,
    }
}
