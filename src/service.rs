//! Backend entity service interface
//!
//! Each portal entity (addresses, categories, ...) is backed by a service the
//! resolvers call into. The service owns persistence and validation; this
//! crate only coerces arguments, batches reads and forwards failures.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ServiceContext;
use crate::dataloaders::BatchLoader;
use crate::Result;

/// Primary key of a portal entity
pub type EntityId = i64;

/// CRUD operations the resolvers need from one entity's backend
#[async_trait]
pub trait EntityService: Send + Sync + 'static {
    /// The record handed back to GraphQL
    type Entity: Clone + Serialize + Send + Sync + 'static;

    /// Typed field set read from create/update arguments
    type Fields: Send + 'static;

    /// Display name used in logs and not-found errors
    const ENTITY_NAME: &'static str;

    fn entity_id(entity: &Self::Entity) -> EntityId;

    /// Fetch every existing entity among `ids` in one call. Unknown ids are
    /// simply left out of the result.
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Self::Entity>>;

    /// Entities in positions `start..end` of the backend's ordering
    async fn list(&self, start: i32, end: i32) -> Result<Vec<Self::Entity>>;

    async fn add(&self, fields: Self::Fields, context: &ServiceContext) -> Result<Self::Entity>;

    async fn update(
        &self,
        id: EntityId,
        fields: Self::Fields,
        context: &ServiceContext,
    ) -> Result<Self::Entity>;

    async fn delete(&self, id: EntityId) -> Result<Self::Entity>;
}

/// Adapts an [`EntityService`] multi-get to the [`BatchLoader`] contract
pub struct EntityLoader<S> {
    service: Arc<S>,
}

impl<S> EntityLoader<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: EntityService> BatchLoader<EntityId, S::Entity> for EntityLoader<S> {
    async fn load_batch(&self, keys: &[EntityId]) -> Result<HashMap<EntityId, S::Entity>> {
        tracing::debug!(entity = S::ENTITY_NAME, ids = ?keys, "fetching entities by id");
        let entities = self.service.get_by_ids(keys).await?;
        Ok(entities
            .into_iter()
            .map(|entity| (S::entity_id(&entity), entity))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_address, InMemoryAddressService};
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_entity_loader_maps_by_id() {
        let service = Arc::new(InMemoryAddressService::with_addresses(vec![
            sample_address(1, "Rua Augusta"),
            sample_address(2, "Avenida Paulista"),
        ]));
        let loader = EntityLoader::new(service.clone());

        let found = assert_ok!(loader.load_batch(&[2, 1, 77]).await);

        assert_eq!(found.len(), 2);
        assert_eq!(found[&1].street1, "Rua Augusta");
        assert_eq!(found[&2].street1, "Avenida Paulista");
        assert_eq!(service.get_by_ids_calls(), vec![vec![2, 1, 77]]);
    }
}
