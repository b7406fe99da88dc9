//! Typed access to a field's argument bag
//!
//! Every resolver reads its inputs through [`ArgumentBag`]. Reads never fail:
//! an absent argument, an explicit `null`, or a value that does not coerce to
//! the requested type yields either the caller's default ([`ArgumentBag::get_or`])
//! or the type's zero value ([`ArgumentBag::get`]). Required-field checks are
//! left to the backend services, which see zero values as missing.

use std::collections::HashMap;

use async_graphql::dynamic::ObjectAccessor;
use async_graphql::{Name, Value};

use crate::types::{DateTime, LocaleMap};

/// Outcome of reading one argument with an explicit type
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// Present and converted
    Present(T),
    /// Not supplied, or supplied as `null`
    Absent,
    /// Supplied with a value that does not fit `T`
    Mismatch,
}

impl<T> Coerced<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Coerced::Present(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Coerced::Present(value) => Some(value),
            Coerced::Absent | Coerced::Mismatch => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

impl<T: Default> Coerced<T> {
    /// The converted value, or `T::default()` as the zero value
    pub fn unwrap_or_zero(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// Conversion from a raw GraphQL value into a concrete argument type
pub trait FromArgument: Sized + Default {
    fn from_argument(value: &Value) -> Option<Self>;
}

impl FromArgument for i64 {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromArgument for i32 {
    fn from_argument(value: &Value) -> Option<Self> {
        i64::from_argument(value).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromArgument for f64 {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromArgument for bool {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromArgument for String {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Enum(name) => Some(name.to_string()),
            _ => None,
        }
    }
}

impl FromArgument for Vec<String> {
    fn from_argument(value: &Value) -> Option<Self> {
        list_of(value)
    }
}

impl FromArgument for Vec<i64> {
    fn from_argument(value: &Value) -> Option<Self> {
        list_of(value)
    }
}

impl FromArgument for LocaleMap {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(locale, text)| String::from_argument(text).map(|t| (locale.to_string(), t)))
                .collect(),
            _ => None,
        }
    }
}

impl FromArgument for DateTime {
    fn from_argument(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => DateTime::parse(s),
            _ => None,
        }
    }
}

// A single scalar where a list is expected is accepted as a one-element list,
// matching GraphQL input coercion.
fn list_of<T: FromArgument>(value: &Value) -> Option<Vec<T>> {
    match value {
        Value::List(items) => items.iter().map(T::from_argument).collect(),
        Value::Null => None,
        other => T::from_argument(other).map(|item| vec![item]),
    }
}

/// The arguments supplied to one field invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBag {
    values: HashMap<String, Value>,
}

impl ArgumentBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the arguments of a dynamic-schema field invocation
    pub fn from_accessor(args: &ObjectAccessor<'_>) -> Self {
        let values = args
            .iter()
            .map(|(name, value)| (name.to_string(), value.as_value().clone()))
            .collect();
        Self { values }
    }

    /// Add an argument, replacing any previous value with the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read `name` as `T`, reporting whether it was present and well-typed
    pub fn lookup<T: FromArgument>(&self, name: &str) -> Coerced<T> {
        match self.values.get(name) {
            None | Some(Value::Null) => Coerced::Absent,
            Some(value) => match T::from_argument(value) {
                Some(coerced) => Coerced::Present(coerced),
                None => Coerced::Mismatch,
            },
        }
    }

    /// Read `name` as `T`, falling back to the type's zero value
    pub fn get<T: FromArgument>(&self, name: &str) -> T {
        self.lookup(name).unwrap_or_zero()
    }

    /// Read `name` as `T`, falling back to `default`
    pub fn get_or<T: FromArgument>(&self, name: &str, default: T) -> T {
        self.lookup(name).unwrap_or(default)
    }
}

impl FromIterator<(String, Value)> for ArgumentBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<async_graphql::indexmap::IndexMap<Name, Value>> for ArgumentBag {
    fn from(map: async_graphql::indexmap::IndexMap<Name, Value>) -> Self {
        map.into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
