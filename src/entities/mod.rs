//! Portal entities exposed through [`ResolverSet`](crate::ResolverSet)s
//!
//! Each module declares the entity record, its mutation field set, the
//! argument extractors and the GraphQL object type. Backends implement
//! [`EntityService`](crate::EntityService) for the entity and hand the
//! service to the module's `resolver_set`.

pub mod address;
pub mod asset_category;

pub use address::{Address, AddressFields};
pub use asset_category::{AssetCategory, AssetCategoryFields};
