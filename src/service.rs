//! Person aggregate service.
//!
//! Thin orchestration between the transfer shape and the store: every
//! operation forwards to the storage capability, logs the outcome, and
//! returns store errors unchanged in kind. No retries, no business rules.

use std::sync::Arc;

use async_trait::async_trait;
use person_store::{PersonStorage, PersonView, StoreError};
use tracing::Span;

use crate::errors::WiringError;

/// Aggregate operations exposed to the request layer.
#[async_trait]
pub trait PersonOperations: Send + Sync {
    async fn create(&self, view: PersonView) -> Result<PersonView, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<PersonView, StoreError>;

    async fn get_all(&self, offset: i64, limit: i64) -> Result<Vec<PersonView>, StoreError>;
}

/// Service over a [`PersonStorage`] capability. Holds no state beyond the
/// store handle and the span its outcomes are logged under.
pub struct PersonService {
    store: Arc<dyn PersonStorage>,
    span: Span,
}

impl std::fmt::Debug for PersonService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonService").finish_non_exhaustive()
    }
}

impl PersonService {
    pub fn builder() -> PersonServiceBuilder {
        PersonServiceBuilder::default()
    }
}

/// Builder for [`PersonService`]. The store is required; `build` fails with
/// [`WiringError::MissingStore`] rather than panicking when it is absent.
#[derive(Default)]
pub struct PersonServiceBuilder {
    store: Option<Arc<dyn PersonStorage>>,
    span: Option<Span>,
}

impl PersonServiceBuilder {
    pub fn store(mut self, store: Arc<dyn PersonStorage>) -> Self {
        self.store = Some(store);
        self
    }

    /// Span the service logs under; a fresh `person_service` span is created
    /// when none is supplied.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> Result<PersonService, WiringError> {
        let store = self.store.ok_or(WiringError::MissingStore)?;
        let span = self
            .span
            .unwrap_or_else(|| tracing::info_span!("person_service"));

        Ok(PersonService { store, span })
    }
}

#[async_trait]
impl PersonOperations for PersonService {
    async fn create(&self, view: PersonView) -> Result<PersonView, StoreError> {
        match self.store.create_aggregate(view).await {
            Ok(created) => {
                tracing::info!(parent: &self.span, person = ?created, "person created with success");
                Ok(created)
            }
            Err(err) => {
                tracing::error!(parent: &self.span, error = %err, "failed to save the person");
                Err(err)
            }
        }
    }

    async fn get_by_id(&self, id: i32) -> Result<PersonView, StoreError> {
        match self.store.get_aggregate_by_id(id).await {
            Ok(person) => {
                tracing::info!(parent: &self.span, person = ?person, "person retrieved with success");
                Ok(person)
            }
            Err(err) => {
                tracing::error!(parent: &self.span, id, error = %err, "failed to get the person by id");
                Err(err)
            }
        }
    }

    async fn get_all(&self, offset: i64, limit: i64) -> Result<Vec<PersonView>, StoreError> {
        match self.store.list_aggregates(offset, limit).await {
            Ok(persons) => Ok(persons),
            Err(err) => {
                tracing::error!(parent: &self.span, offset, limit, error = %err, "failed to list persons");
                Err(err)
            }
        }
    }
}
