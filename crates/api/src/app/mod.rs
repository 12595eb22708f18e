//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage backend selection
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: JSON mapping helpers and the JSON body extractor
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Prefix the catalog is additionally served under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: services::AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .nest(API_PREFIX, routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context))
                .layer(Extension(services)),
        )
}
