//! # portal-graphql-resolvers
//!
//! GraphQL field resolvers over a portal's entity CRUD services.
//!
//! ## Features
//!
//! - **Argument Accessor** - typed, defaulting reads from a field's argument bag
//! - **DataLoader** - per-request batching of single-entity lookups (no N+1)
//! - **Resolver Sets** - one generic list/get/create/update/delete group per entity
//! - **Error Mapping** - backend failures surfaced as coded GraphQL errors
//! - **Axum Handler** - fresh request scope per HTTP request
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portal_graphql_resolvers::{entities::address, SchemaBuilder};
//!
//! let addresses = address::resolver_set(address_service);
//! let schema = SchemaBuilder::new()
//!     .entity(addresses, address::object_type())
//!     .finish()?;
//! ```

pub mod arguments;
pub mod config;
pub mod context;
pub mod dataloaders;
pub mod entities;
pub mod errors;
pub mod handler;
pub mod pagination;
pub mod resolvers;
pub mod schema;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use arguments::{ArgumentBag, Coerced, FromArgument};
pub use config::ResolverConfig;
pub use context::{RequestScope, ServiceContext};
pub use dataloaders::{BatchLoader, DataLoader};
pub use handler::{graphql_handler, router};
pub use pagination::ListWindow;
pub use resolvers::{EntityNames, FieldExtractor, MutationFields, ResolverSet};
pub use schema::{EntityObject, SchemaBuilder};
pub use service::{EntityId, EntityLoader, EntityService};
pub use types::{DateTime, LocaleMap};

use thiserror::Error;

/// Failures raised by the backend entity services.
///
/// Every variant originates in a collaborator service. Resolvers pass them
/// through untouched; see [`errors`] for how they reach the GraphQL response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("No {entity} exists with the primary key {id}")]
    NotFound { entity: String, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl ServiceError {
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable(message.into())
    }
}

/// Result type for resolver and service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
