//! Common GraphQL types

use std::collections::BTreeMap;

use async_graphql::dynamic::Scalar;
use async_graphql::Value;
use chrono::{DateTime as ChronoDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Localized text keyed by locale id (`en_US`, `pt_BR`, ...)
pub type LocaleMap = BTreeMap<String, String>;

/// DateTime scalar, RFC 3339 on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateTime(pub ChronoDateTime<Utc>);

impl DateTime {
    pub const NAME: &'static str = "DateTime";

    pub fn now() -> Self {
        DateTime(Utc::now())
    }

    pub fn parse(value: &str) -> Option<Self> {
        ChronoDateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| DateTime(dt.with_timezone(&Utc)))
    }

    pub fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339())
    }

    /// Dynamic schema declaration, rejecting literals that are not RFC 3339
    pub fn scalar() -> Scalar {
        Scalar::new(Self::NAME)
            .description("RFC 3339 date-time")
            .validator(|value| matches!(value, Value::String(s) if DateTime::parse(s).is_some()))
    }
}

pub const LOCALE_MAP: &str = "LocaleMap";

/// Dynamic schema declaration for [`LocaleMap`]: an object of string values
pub fn locale_map_scalar() -> Scalar {
    Scalar::new(LOCALE_MAP)
        .description("Localized strings keyed by locale id")
        .validator(|value| match value {
            Value::Object(map) => map.values().all(|v| matches!(v, Value::String(_))),
            _ => false,
        })
}
