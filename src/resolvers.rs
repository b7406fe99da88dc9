//! Generic list/get/create/update/delete resolvers
//!
//! A [`ResolverSet`] is the whole resolver surface of one entity type. It is
//! parameterized by the backend [`EntityService`] and by one field-extraction
//! closure per mutation; every portal entity is an instantiation of it.
//!
//! Reads treat absence as data (`None`), writes treat absence and invalid
//! input as failures raised by the backend and forwarded untouched.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, ResolverContext, TypeRef};
use async_graphql::Error;

use crate::arguments::ArgumentBag;
use crate::config::ResolverConfig;
use crate::context::RequestScope;
use crate::errors::to_graphql;
use crate::pagination::ListWindow;
use crate::service::{EntityId, EntityService};
use crate::Result;

/// Reads one operation's typed field set from its arguments
pub type FieldExtractor<F> = Arc<dyn Fn(&ArgumentBag) -> F + Send + Sync>;

/// Argument carrying the acting user on create/update
pub const USER_ID: &str = "userId";

/// GraphQL names of one entity's type, fields and id argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNames {
    /// Output object type, e.g. `Address`
    pub type_name: String,
    /// Single lookup query, e.g. `address`
    pub single: String,
    /// List query, e.g. `addresses`
    pub plural: String,
    /// Id argument, e.g. `addressId`
    pub id_argument: String,
}

impl EntityNames {
    pub fn new(type_name: &str, plural: &str) -> Self {
        let single = lower_first(type_name);
        Self {
            type_name: type_name.to_string(),
            id_argument: format!("{}Id", single),
            single,
            plural: plural.to_string(),
        }
    }

    pub fn create_field(&self) -> String {
        format!("create{}", self.type_name)
    }

    pub fn update_field(&self) -> String {
        format!("update{}", self.type_name)
    }

    pub fn delete_field(&self) -> String {
        format!("delete{}", self.type_name)
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A mutation's declared arguments and its field extractor
pub struct MutationFields<F> {
    arguments: Vec<(String, TypeRef)>,
    extract: FieldExtractor<F>,
}

impl<F> MutationFields<F> {
    pub fn new(extract: impl Fn(&ArgumentBag) -> F + Send + Sync + 'static) -> Self {
        Self {
            arguments: Vec::new(),
            extract: Arc::new(extract),
        }
    }

    /// Declare an argument. Declare every field nullable: omitted required
    /// fields must reach the backend as zero values so it can reject them.
    pub fn argument(mut self, name: &str, ty: TypeRef) -> Self {
        self.arguments.push((name.to_string(), ty));
        self
    }

    fn input_values(&self) -> impl Iterator<Item = InputValue> + '_ {
        self.arguments
            .iter()
            .map(|(name, ty)| InputValue::new(name.as_str(), ty.clone()))
    }
}

/// The five resolvers of one entity type
pub struct ResolverSet<S: EntityService> {
    service: Arc<S>,
    names: EntityNames,
    create: MutationFields<S::Fields>,
    update: MutationFields<S::Fields>,
    config: ResolverConfig,
}

impl<S: EntityService> ResolverSet<S> {
    pub fn new(
        service: Arc<S>,
        names: EntityNames,
        create: MutationFields<S::Fields>,
        update: MutationFields<S::Fields>,
    ) -> Self {
        Self {
            service,
            names,
            create,
            update,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn names(&self) -> &EntityNames {
        &self.names
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Entities in the requested `start`/`end` window
    pub async fn list(&self, args: &ArgumentBag) -> Result<Vec<S::Entity>> {
        let window = ListWindow::from_arguments(args, self.config.default_page_size);
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let entities = self
            .service
            .list(window.start(), window.end())
            .await
            .inspect_err(|err| self.log_failure("list", err))?;
        Ok(window.clamp(entities))
    }

    /// One entity by id, batched with the request's other lookups
    pub async fn get(&self, args: &ArgumentBag, scope: &RequestScope) -> Result<Option<S::Entity>> {
        let id: EntityId = args.get(&self.names.id_argument);
        if id == 0 {
            tracing::debug!(entity = S::ENTITY_NAME, "no id supplied, skipping lookup");
            return Ok(None);
        }

        scope.loader(&self.service).await.load(id).await
    }

    /// Add a new entity acting as `userId` (or the configured fallback user)
    pub async fn create(&self, args: &ArgumentBag, scope: &RequestScope) -> Result<S::Entity> {
        let user_id = args.get_or(USER_ID, self.config.default_user_id);
        let fields = (self.create.extract)(args);
        let context = scope.service_context(user_id);

        tracing::debug!(entity = S::ENTITY_NAME, user_id, "creating entity");
        self.service
            .add(fields, &context)
            .await
            .inspect_err(|err| self.log_failure("create", err))
    }

    /// Update an existing entity; the backend rejects unknown ids
    pub async fn update(&self, args: &ArgumentBag, scope: &RequestScope) -> Result<S::Entity> {
        let id: EntityId = args.get(&self.names.id_argument);
        let user_id = args.get_or(USER_ID, self.config.default_user_id);
        let fields = (self.update.extract)(args);
        let context = scope.service_context(user_id);

        tracing::debug!(entity = S::ENTITY_NAME, id, user_id, "updating entity");
        let entity = self
            .service
            .update(id, fields, &context)
            .await
            .inspect_err(|err| self.log_failure("update", err))?;

        scope
            .loader(&self.service)
            .await
            .prime(S::entity_id(&entity), entity.clone())
            .await;
        Ok(entity)
    }

    /// Delete an entity, returning its last state
    pub async fn delete(&self, args: &ArgumentBag, scope: &RequestScope) -> Result<S::Entity> {
        let id: EntityId = args.get(&self.names.id_argument);

        tracing::debug!(entity = S::ENTITY_NAME, id, "deleting entity");
        let entity = self
            .service
            .delete(id)
            .await
            .inspect_err(|err| self.log_failure("delete", err))?;

        scope.loader(&self.service).await.forget(&id).await;
        Ok(entity)
    }

    fn log_failure(&self, operation: &str, err: &crate::ServiceError) {
        tracing::warn!(entity = S::ENTITY_NAME, operation, error = %err, "backend call failed");
    }
}

/// Serialize an entity into the value its
/// [`EntityObject`](crate::schema::EntityObject) reads fields from
fn entity_value<'a, T: serde::Serialize>(entity: &T) -> std::result::Result<FieldValue<'a>, Error> {
    async_graphql::to_value(entity)
        .map(FieldValue::owned_any)
        .map_err(|e| Error::new(format!("failed to serialize entity: {}", e)))
}

fn request_scope<'a>(ctx: &ResolverContext<'a>) -> std::result::Result<&'a RequestScope, Error> {
    ctx.ctx.data::<RequestScope>()
}

impl<S: EntityService> ResolverSet<S> {
    /// `<plural>(start, end)` and `<single>(<idArgument>)`
    pub fn query_fields(self: &Arc<Self>) -> Vec<Field> {
        let list = {
            let set = Arc::clone(self);
            Field::new(
                self.names.plural.as_str(),
                TypeRef::named_nn_list_nn(self.names.type_name.as_str()),
                move |ctx| {
                    let set = Arc::clone(&set);
                    FieldFuture::new(async move {
                        let args = ArgumentBag::from_accessor(&ctx.args);
                        let entities = set.list(&args).await.map_err(to_graphql)?;
                        let values = entities
                            .iter()
                            .map(entity_value)
                            .collect::<std::result::Result<Vec<_>, _>>()?;
                        Ok(Some(FieldValue::list(values)))
                    })
                },
            )
            .argument(InputValue::new(ListWindow::START, TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new(ListWindow::END, TypeRef::named(TypeRef::INT)))
        };

        let get = {
            let set = Arc::clone(self);
            Field::new(
                self.names.single.as_str(),
                TypeRef::named(self.names.type_name.as_str()),
                move |ctx| {
                    let set = Arc::clone(&set);
                    FieldFuture::new(async move {
                        let args = ArgumentBag::from_accessor(&ctx.args);
                        let scope = request_scope(&ctx)?;
                        match set.get(&args, scope).await.map_err(to_graphql)? {
                            Some(entity) => Ok(Some(entity_value(&entity)?)),
                            None => Ok(None),
                        }
                    })
                },
            )
            .argument(InputValue::new(
                self.names.id_argument.as_str(),
                TypeRef::named(TypeRef::ID),
            ))
        };

        vec![list, get]
    }

    /// `create<Type>`, `update<Type>` and `delete<Type>`
    pub fn mutation_fields(self: &Arc<Self>) -> Vec<Field> {
        let entity_type = self.names.type_name.as_str();
        let id_argument = || {
            InputValue::new(self.names.id_argument.as_str(), TypeRef::named(TypeRef::ID))
        };
        let user_argument = || InputValue::new(USER_ID, TypeRef::named(TypeRef::ID));

        let create = self
            .create
            .input_values()
            .fold(
                self.mutation_field(self.names.create_field(), entity_type, Operation::Create),
                Field::argument,
            )
            .argument(user_argument());

        let update = self
            .update
            .input_values()
            .fold(
                self.mutation_field(self.names.update_field(), entity_type, Operation::Update),
                Field::argument,
            )
            .argument(id_argument())
            .argument(user_argument());

        let delete = self
            .mutation_field(self.names.delete_field(), entity_type, Operation::Delete)
            .argument(id_argument());

        vec![create, update, delete]
    }

    fn mutation_field(self: &Arc<Self>, name: String, entity_type: &str, operation: Operation) -> Field {
        let set = Arc::clone(self);
        Field::new(name, TypeRef::named_nn(entity_type), move |ctx| {
            let set = Arc::clone(&set);
            FieldFuture::new(async move {
                let args = ArgumentBag::from_accessor(&ctx.args);
                let scope = request_scope(&ctx)?;
                let entity = match operation {
                    Operation::Create => set.create(&args, scope).await,
                    Operation::Update => set.update(&args, scope).await,
                    Operation::Delete => set.delete(&args, scope).await,
                }
                .map_err(to_graphql)?;
                Ok(Some(entity_value(&entity)?))
            })
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Update,
    Delete,
}
