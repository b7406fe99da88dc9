//! Resolver configuration

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

/// Acting user substituted on create/update when the caller omits `userId`.
// NOTE: a fixed fallback identity lets anonymous mutations run as this user.
// Kept for compatibility with existing clients; review before widening access.
pub const DEFAULT_USER_ID: i64 = 20156;

pub const DEFAULT_PAGE_SIZE: i32 = 10;

pub const DEFAULT_BATCH_DELAY_MS: u64 = 1;

/// Settings shared by every resolver set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Fallback acting user for mutations
    pub default_user_id: i64,
    /// `end` used by list operations when the caller omits it
    pub default_page_size: i32,
    /// How long a batch round collects keys before dispatching
    pub batch_delay_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_user_id: DEFAULT_USER_ID,
            default_page_size: DEFAULT_PAGE_SIZE,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
        }
    }
}

impl ResolverConfig {
    pub const DEFAULT_USER_ID_KEY: &'static str = "PORTAL_GRAPHQL_DEFAULT_USER_ID";
    pub const DEFAULT_PAGE_SIZE_KEY: &'static str = "PORTAL_GRAPHQL_DEFAULT_PAGE_SIZE";
    pub const BATCH_DELAY_MS_KEY: &'static str = "PORTAL_GRAPHQL_BATCH_DELAY_MS";

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn from_env() -> Self {
        let values = [
            Self::DEFAULT_USER_ID_KEY,
            Self::DEFAULT_PAGE_SIZE_KEY,
            Self::BATCH_DELAY_MS_KEY,
        ]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect();
        Self::from_map(&values)
    }

    /// Build from raw key/value pairs; missing or unparseable entries keep
    /// their defaults.
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        fn parse<T: std::str::FromStr>(values: &HashMap<String, String>, key: &str) -> Option<T> {
            let raw = values.get(key)?;
            let parsed = raw.trim().parse().ok();
            if parsed.is_none() {
                tracing::warn!(key, value = %raw, "ignoring unparseable resolver setting");
            }
            parsed
        }

        let defaults = Self::default();
        Self {
            default_user_id: parse(values, Self::DEFAULT_USER_ID_KEY)
                .unwrap_or(defaults.default_user_id),
            default_page_size: parse(values, Self::DEFAULT_PAGE_SIZE_KEY)
                .filter(|size: &i32| *size >= 0)
                .unwrap_or(defaults.default_page_size),
            batch_delay_ms: parse(values, Self::BATCH_DELAY_MS_KEY)
                .unwrap_or(defaults.batch_delay_ms),
        }
    }
}
