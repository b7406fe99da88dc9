//! Axum GraphQL endpoint with per-request scope injection
//!
//! Provides helpers for:
//! - Extracting company and scope group ids from HTTP headers
//! - Creating the [`RequestScope`] every resolver reads from
//! - A router serving the dynamic schema at `/graphql`

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response};
use axum::{extract::Extension, http::HeaderMap, routing::post, Json, Router};
use tracing::Instrument;

use crate::config::ResolverConfig;
use crate::context::RequestScope;

pub const COMPANY_ID_HEADER: &str = "x-company-id";
pub const SCOPE_GROUP_ID_HEADER: &str = "x-scope-group-id";

fn header_id(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Extract company_id from x-company-id header
pub fn extract_company_id(headers: &HeaderMap) -> Option<i64> {
    header_id(headers, COMPANY_ID_HEADER)
}

/// Extract scope group id from x-scope-group-id header
pub fn extract_scope_group_id(headers: &HeaderMap) -> Option<i64> {
    header_id(headers, SCOPE_GROUP_ID_HEADER)
}

/// Build the scope for one incoming request
pub fn request_scope(headers: &HeaderMap, config: &ResolverConfig) -> RequestScope {
    RequestScope::new()
        .with_company_id(extract_company_id(headers))
        .with_scope_group_id(extract_scope_group_id(headers))
        .with_batch_delay(config.batch_delay())
}

/// GraphQL handler that gives every request its own [`RequestScope`]
///
/// # Example
///
/// ```rust,no_run
/// use axum::{routing::post, Extension, Router};
/// use portal_graphql_resolvers::{graphql_handler, ResolverConfig};
///
/// # fn example(schema: async_graphql::dynamic::Schema) {
/// let app: Router = Router::new()
///     .route("/graphql", post(graphql_handler))
///     .layer(Extension(schema))
///     .layer(Extension(ResolverConfig::default()));
/// # }
/// ```
pub async fn graphql_handler(
    Extension(schema): Extension<Schema>,
    Extension(config): Extension<ResolverConfig>,
    headers: HeaderMap,
    req: Json<Request>,
) -> Json<Response> {
    let scope = request_scope(&headers, &config);
    let span = tracing::info_span!(
        "graphql_request",
        request_id = %scope.request_id(),
        operation = req.0.operation_name.as_deref().unwrap_or("")
    );

    let request = req.0.data(scope);
    let response = schema.execute(request).instrument(span).await;

    Json(response)
}

/// Router serving `schema` at `/graphql`
pub fn router(schema: Schema, config: ResolverConfig) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .layer(Extension(schema))
        .layer(Extension(config))
}
