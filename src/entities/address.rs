//! Postal addresses attached to users, organizations and contacts

use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use serde::{Deserialize, Serialize};

use crate::arguments::ArgumentBag;
use crate::resolvers::{EntityNames, MutationFields, ResolverSet};
use crate::schema::EntityObject;
use crate::service::EntityService;
use crate::types::DateTime;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: i64,
    pub company_id: i64,
    pub user_id: i64,
    pub class_name: String,
    #[serde(rename = "classPK")]
    pub class_pk: i64,
    pub street1: String,
    pub street2: String,
    pub street3: String,
    pub city: String,
    pub zip: String,
    pub region_id: i64,
    pub country_id: i64,
    pub type_id: i64,
    pub mailing: bool,
    pub primary: bool,
    pub create_date: DateTime,
    pub modified_date: DateTime,
}

/// Fields accepted by `createAddress` and `updateAddress`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressFields {
    pub class_name: String,
    pub class_pk: i64,
    pub street1: String,
    pub street2: String,
    pub street3: String,
    pub city: String,
    pub zip: String,
    pub region_id: i64,
    pub country_id: i64,
    pub type_id: i64,
    pub mailing: bool,
    pub primary: bool,
}

impl AddressFields {
    pub fn from_arguments(args: &ArgumentBag) -> Self {
        Self {
            class_name: args.get("className"),
            class_pk: args.get("classPK"),
            street1: args.get("street1"),
            street2: args.get("street2"),
            street3: args.get("street3"),
            city: args.get("city"),
            zip: args.get("zip"),
            region_id: args.get("regionId"),
            country_id: args.get("countryId"),
            type_id: args.get("typeId"),
            mailing: args.get("mailing"),
            primary: args.get("primary"),
        }
    }
}

fn mutation_fields() -> MutationFields<AddressFields> {
    MutationFields::new(AddressFields::from_arguments)
        .argument("className", TypeRef::named(TypeRef::STRING))
        .argument("classPK", TypeRef::named(TypeRef::ID))
        .argument("street1", TypeRef::named(TypeRef::STRING))
        .argument("street2", TypeRef::named(TypeRef::STRING))
        .argument("street3", TypeRef::named(TypeRef::STRING))
        .argument("city", TypeRef::named(TypeRef::STRING))
        .argument("zip", TypeRef::named(TypeRef::STRING))
        .argument("regionId", TypeRef::named(TypeRef::ID))
        .argument("countryId", TypeRef::named(TypeRef::ID))
        .argument("typeId", TypeRef::named(TypeRef::ID))
        .argument("mailing", TypeRef::named(TypeRef::BOOLEAN))
        .argument("primary", TypeRef::named(TypeRef::BOOLEAN))
}

pub fn names() -> EntityNames {
    EntityNames::new("Address", "addresses")
}

pub fn resolver_set<S>(service: Arc<S>) -> Arc<ResolverSet<S>>
where
    S: EntityService<Entity = Address, Fields = AddressFields>,
{
    Arc::new(ResolverSet::new(
        service,
        names(),
        mutation_fields(),
        mutation_fields(),
    ))
}

pub fn object_type() -> EntityObject {
    EntityObject::new("Address")
        .field("addressId", TypeRef::named_nn(TypeRef::ID))
        .field("companyId", TypeRef::named_nn(TypeRef::ID))
        .field("userId", TypeRef::named_nn(TypeRef::ID))
        .field("className", TypeRef::named_nn(TypeRef::STRING))
        .field("classPK", TypeRef::named_nn(TypeRef::ID))
        .field("street1", TypeRef::named_nn(TypeRef::STRING))
        .field("street2", TypeRef::named_nn(TypeRef::STRING))
        .field("street3", TypeRef::named_nn(TypeRef::STRING))
        .field("city", TypeRef::named_nn(TypeRef::STRING))
        .field("zip", TypeRef::named_nn(TypeRef::STRING))
        .field("regionId", TypeRef::named_nn(TypeRef::ID))
        .field("countryId", TypeRef::named_nn(TypeRef::ID))
        .field("typeId", TypeRef::named_nn(TypeRef::ID))
        .field("mailing", TypeRef::named_nn(TypeRef::BOOLEAN))
        .field("primary", TypeRef::named_nn(TypeRef::BOOLEAN))
        .field("createDate", TypeRef::named_nn(DateTime::NAME))
        .field("modifiedDate", TypeRef::named_nn(DateTime::NAME))
}
