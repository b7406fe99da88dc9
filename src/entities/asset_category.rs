//! Asset categories within a vocabulary

use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use serde::{Deserialize, Serialize};

use crate::arguments::ArgumentBag;
use crate::resolvers::{EntityNames, MutationFields, ResolverSet};
use crate::schema::EntityObject;
use crate::service::EntityService;
use crate::types::{DateTime, LocaleMap, LOCALE_MAP};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCategory {
    pub category_id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub parent_category_id: i64,
    pub vocabulary_id: i64,
    pub title_map: LocaleMap,
    pub description_map: LocaleMap,
    pub category_properties: Vec<String>,
    pub create_date: DateTime,
    pub modified_date: DateTime,
}

/// Fields accepted by `createAssetCategory` and `updateAssetCategory`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetCategoryFields {
    pub parent_category_id: i64,
    pub vocabulary_id: i64,
    pub title_map: LocaleMap,
    pub description_map: LocaleMap,
    /// `key:value` pairs
    pub category_properties: Vec<String>,
}

fn category_fields(args: &ArgumentBag) -> AssetCategoryFields {
    AssetCategoryFields {
        parent_category_id: args.get("parentCategoryId"),
        vocabulary_id: args.get("vocabularyId"),
        title_map: args.get("titleMap"),
        description_map: args.get("descriptionMap"),
        category_properties: args.get("categoryProperties"),
    }
}

fn mutation_fields() -> MutationFields<AssetCategoryFields> {
    MutationFields::new(category_fields)
        .argument("parentCategoryId", TypeRef::named(TypeRef::ID))
        .argument("vocabularyId", TypeRef::named(TypeRef::ID))
        .argument("titleMap", TypeRef::named(LOCALE_MAP))
        .argument("descriptionMap", TypeRef::named(LOCALE_MAP))
        .argument("categoryProperties", TypeRef::named_nn_list(TypeRef::STRING))
}

pub fn names() -> EntityNames {
    let mut names = EntityNames::new("AssetCategory", "assetCategories");
    names.id_argument = "categoryId".to_string();
    names
}

pub fn resolver_set<S>(service: Arc<S>) -> Arc<ResolverSet<S>>
where
    S: EntityService<Entity = AssetCategory, Fields = AssetCategoryFields>,
{
    Arc::new(ResolverSet::new(
        service,
        names(),
        mutation_fields(),
        mutation_fields(),
    ))
}

pub fn object_type() -> EntityObject {
    EntityObject::new("AssetCategory")
        .field("categoryId", TypeRef::named_nn(TypeRef::ID))
        .field("groupId", TypeRef::named_nn(TypeRef::ID))
        .field("userId", TypeRef::named_nn(TypeRef::ID))
        .field("parentCategoryId", TypeRef::named_nn(TypeRef::ID))
        .field("vocabularyId", TypeRef::named_nn(TypeRef::ID))
        .field("titleMap", TypeRef::named_nn(LOCALE_MAP))
        .field("descriptionMap", TypeRef::named_nn(LOCALE_MAP))
        .field("categoryProperties", TypeRef::named_nn_list_nn(TypeRef::STRING))
        .field("createDate", TypeRef::named_nn(DateTime::NAME))
        .field("modifiedDate", TypeRef::named_nn(DateTime::NAME))
}
