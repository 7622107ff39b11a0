//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use formhub_core::config::CorsConfig;

/// Build the CORS layer. Browsers may send the bearer credential, a JSON
/// body, and the legacy tenant header named by `tenant_header`.
pub fn build_cors_layer(config: &CorsConfig, tenant_header: &str) -> CorsLayer {
    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %o, "Ignoring unparsable CORS origin"))
                .ok()
        }))
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let mut headers = vec![header::AUTHORIZATION, header::CONTENT_TYPE];
    match HeaderName::try_from(tenant_header) {
        Ok(name) => headers.push(name),
        Err(_) => warn!(header = tenant_header, "Tenant header name is not a valid header"),
    }

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .expose_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
