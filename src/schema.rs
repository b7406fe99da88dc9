//! Dynamic schema assembly
//!
//! Entities are registered at runtime: each [`ResolverSet`] contributes its
//! query and mutation fields, each [`EntityObject`] its output type.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, Schema, SchemaError, TypeRef};
use async_graphql::Value;

use crate::resolvers::ResolverSet;
use crate::service::EntityService;
use crate::types::{locale_map_scalar, DateTime};

pub const QUERY: &str = "Query";
pub const MUTATION: &str = "Mutation";

/// Output object whose fields are read by name from a serialized entity
pub struct EntityObject {
    name: String,
    fields: Vec<(String, TypeRef)>,
}

impl EntityObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields.push((name.to_string(), ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn into_object(self) -> Object {
        self.fields
            .into_iter()
            .fold(Object::new(self.name), |object, (name, ty)| {
                object.field(value_field(name, ty))
            })
    }
}

fn value_field(name: String, ty: TypeRef) -> Field {
    let key = name.clone();
    Field::new(name, ty, move |ctx| {
        let key = key.clone();
        FieldFuture::new(async move {
            let value = match ctx.parent_value.try_downcast_ref::<Value>() {
                Ok(Value::Object(map)) => map.get(key.as_str()).cloned(),
                _ => None,
            };
            Ok(value
                .filter(|value| !matches!(value, Value::Null))
                .map(field_value))
        })
    })
}

fn field_value<'a>(value: Value) -> FieldValue<'a> {
    match value {
        Value::List(items) => FieldValue::list(items.into_iter().map(field_value)),
        other => FieldValue::value(other),
    }
}

/// Collects resolver sets and entity types into a dynamic schema
pub struct SchemaBuilder {
    query: Object,
    mutation: Object,
    objects: Vec<Object>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            query: Object::new(QUERY),
            mutation: Object::new(MUTATION),
            objects: Vec::new(),
        }
    }

    /// Register an entity's resolvers and its output type
    pub fn entity<S: EntityService>(mut self, resolvers: Arc<ResolverSet<S>>, object: EntityObject) -> Self {
        self.query = resolvers
            .query_fields()
            .into_iter()
            .fold(self.query, Object::field);
        self.mutation = resolvers
            .mutation_fields()
            .into_iter()
            .fold(self.mutation, Object::field);
        self.objects.push(object.into_object());
        self
    }

    pub fn finish(self) -> Result<Schema, SchemaError> {
        self.objects
            .into_iter()
            .fold(
                Schema::build(QUERY, Some(MUTATION), None)
                    .register(self.query)
                    .register(self.mutation)
                    .register(DateTime::scalar())
                    .register(locale_map_scalar()),
                |builder, object| builder.register(object),
            )
            .finish()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
