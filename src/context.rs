//! Per-request state: the data loader registry and service contexts
//!
//! A [`RequestScope`] is created when a GraphQL request starts executing and
//! dropped when it finishes. It is never shared between requests, so the
//! batch caches it owns cannot leak data across them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dataloaders::DataLoader;
use crate::service::{EntityId, EntityLoader, EntityService};

/// Loader used for single-entity lookups of service `S`
pub type EntityDataLoader<S> =
    DataLoader<EntityId, <S as EntityService>::Entity, EntityLoader<S>>;

/// Ambient metadata passed to every mutating backend call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContext {
    pub user_id: i64,
    pub company_id: Option<i64>,
    pub scope_group_id: Option<i64>,
    pub request_id: Uuid,
}

/// State owned by one GraphQL request execution
pub struct RequestScope {
    request_id: Uuid,
    company_id: Option<i64>,
    scope_group_id: Option<i64>,
    batch_delay: Duration,
    loaders: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            company_id: None,
            scope_group_id: None,
            batch_delay: Duration::from_millis(crate::config::DEFAULT_BATCH_DELAY_MS),
            loaders: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_company_id(mut self, company_id: Option<i64>) -> Self {
        self.company_id = company_id;
        self
    }

    pub fn with_scope_group_id(mut self, scope_group_id: Option<i64>) -> Self {
        self.scope_group_id = scope_group_id;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Fresh context for one mutation, acting as `user_id`
    pub fn service_context(&self, user_id: i64) -> ServiceContext {
        ServiceContext {
            user_id,
            company_id: self.company_id,
            scope_group_id: self.scope_group_id,
            request_id: self.request_id,
        }
    }

    /// The request's loader for service type `S`, created on first use
    pub async fn loader<S: EntityService>(&self, service: &Arc<S>) -> EntityDataLoader<S> {
        let mut loaders = self.loaders.lock().await;
        let key = TypeId::of::<S>();
        if let Some(loader) = loaders
            .get(&key)
            .and_then(|slot| slot.downcast_ref::<EntityDataLoader<S>>())
        {
            return loader.clone();
        }

        tracing::debug!(
            entity = S::ENTITY_NAME,
            request_id = %self.request_id,
            "creating request data loader"
        );
        let loader = EntityDataLoader::<S>::from_arc(Arc::new(EntityLoader::new(service.clone())))
            .with_delay(self.batch_delay);
        loaders.insert(key, Box::new(loader.clone()));
        loader
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}
