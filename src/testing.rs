//! In-memory entity services for tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::context::ServiceContext;
use crate::entities::{Address, AddressFields, AssetCategory, AssetCategoryFields};
use crate::pagination::ListWindow;
use crate::service::{EntityId, EntityService};
use crate::types::DateTime;
use crate::{Result, ServiceError};

pub fn sample_address(id: EntityId, street1: &str) -> Address {
    Address {
        address_id: id,
        street1: street1.to_string(),
        city: "Lisbon".to_string(),
        country_id: 48,
        ..Default::default()
    }
}

/// Address backend that records every call it receives
#[derive(Default)]
pub struct InMemoryAddressService {
    rows: Mutex<BTreeMap<EntityId, Address>>,
    get_by_ids_calls: Mutex<Vec<Vec<EntityId>>>,
    contexts: Mutex<Vec<ServiceContext>>,
    next_failure: Mutex<Option<ServiceError>>,
}

impl InMemoryAddressService {
    pub fn with_addresses(addresses: Vec<Address>) -> Self {
        let service = Self::default();
        *service.rows.lock().unwrap() = addresses
            .into_iter()
            .map(|address| (address.address_id, address))
            .collect();
        service
    }

    pub fn get_by_ids_calls(&self) -> Vec<Vec<EntityId>> {
        self.get_by_ids_calls.lock().unwrap().clone()
    }

    pub fn last_context(&self) -> Option<ServiceContext> {
        self.contexts.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Make the next backend call fail with `err`
    pub fn fail_next_call(&self, err: ServiceError) {
        *self.next_failure.lock().unwrap() = Some(err);
    }

    fn check_failure(&self) -> Result<()> {
        match self.next_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn validate(fields: &AddressFields) -> Result<()> {
        if fields.street1.trim().is_empty() {
            return Err(ServiceError::validation("street1 is required"));
        }
        if fields.country_id <= 0 {
            return Err(ServiceError::validation("countryId is required"));
        }
        Ok(())
    }

    fn apply(address: &mut Address, fields: AddressFields) {
        address.class_name = fields.class_name;
        address.class_pk = fields.class_pk;
        address.street1 = fields.street1;
        address.street2 = fields.street2;
        address.street3 = fields.street3;
        address.city = fields.city;
        address.zip = fields.zip;
        address.region_id = fields.region_id;
        address.country_id = fields.country_id;
        address.type_id = fields.type_id;
        address.mailing = fields.mailing;
        address.primary = fields.primary;
        address.modified_date = DateTime::now();
    }
}

#[async_trait]
impl EntityService for InMemoryAddressService {
    type Entity = Address;
    type Fields = AddressFields;

    const ENTITY_NAME: &'static str = "Address";

    fn entity_id(entity: &Address) -> EntityId {
        entity.address_id
    }

    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Address>> {
        self.get_by_ids_calls.lock().unwrap().push(ids.to_vec());
        self.check_failure()?;
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn list(&self, start: i32, end: i32) -> Result<Vec<Address>> {
        self.check_failure()?;
        let rows: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        Ok(ListWindow::new(start, end).slice(&rows).to_vec())
    }

    async fn add(&self, fields: AddressFields, context: &ServiceContext) -> Result<Address> {
        self.check_failure()?;
        self.contexts.lock().unwrap().push(context.clone());
        Self::validate(&fields)?;

        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let mut address = Address {
            address_id: id,
            company_id: context.company_id.unwrap_or_default(),
            user_id: context.user_id,
            create_date: DateTime::now(),
            ..Default::default()
        };
        Self::apply(&mut address, fields);
        rows.insert(id, address.clone());
        Ok(address)
    }

    async fn update(
        &self,
        id: EntityId,
        fields: AddressFields,
        context: &ServiceContext,
    ) -> Result<Address> {
        self.check_failure()?;
        self.contexts.lock().unwrap().push(context.clone());

        let mut rows = self.rows.lock().unwrap();
        let address = rows
            .get_mut(&id)
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY_NAME, id))?;
        Self::validate(&fields)?;
        Self::apply(address, fields);
        Ok(address.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<Address> {
        self.check_failure()?;
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY_NAME, id))
    }
}

/// Category backend keyed by insertion order
#[derive(Default)]
pub struct InMemoryCategoryService {
    rows: Mutex<BTreeMap<EntityId, AssetCategory>>,
}

impl InMemoryCategoryService {
    fn validate(fields: &AssetCategoryFields) -> Result<()> {
        if fields.title_map.values().all(|title| title.trim().is_empty()) {
            return Err(ServiceError::validation("a category needs a title"));
        }
        if fields.vocabulary_id <= 0 {
            return Err(ServiceError::validation("vocabularyId is required"));
        }
        Ok(())
    }

    fn apply(category: &mut AssetCategory, fields: AssetCategoryFields) {
        category.parent_category_id = fields.parent_category_id;
        category.vocabulary_id = fields.vocabulary_id;
        category.title_map = fields.title_map;
        category.description_map = fields.description_map;
        category.category_properties = fields.category_properties;
        category.modified_date = DateTime::now();
    }
}

#[async_trait]
impl EntityService for InMemoryCategoryService {
    type Entity = AssetCategory;
    type Fields = AssetCategoryFields;

    const ENTITY_NAME: &'static str = "AssetCategory";

    fn entity_id(entity: &AssetCategory) -> EntityId {
        entity.category_id
    }

    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<AssetCategory>> {
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn list(&self, start: i32, end: i32) -> Result<Vec<AssetCategory>> {
        let rows: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        Ok(ListWindow::new(start, end).slice(&rows).to_vec())
    }

    async fn add(
        &self,
        fields: AssetCategoryFields,
        context: &ServiceContext,
    ) -> Result<AssetCategory> {
        Self::validate(&fields)?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let mut category = AssetCategory {
            category_id: id,
            group_id: context.scope_group_id.unwrap_or_default(),
            user_id: context.user_id,
            create_date: DateTime::now(),
            ..Default::default()
        };
        Self::apply(&mut category, fields);
        rows.insert(id, category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        id: EntityId,
        fields: AssetCategoryFields,
        _context: &ServiceContext,
    ) -> Result<AssetCategory> {
        let mut rows = self.rows.lock().unwrap();
        let category = rows
            .get_mut(&id)
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY_NAME, id))?;
        Self::validate(&fields)?;
        Self::apply(category, fields);
        Ok(category.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<AssetCategory> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY_NAME, id))
    }
}
