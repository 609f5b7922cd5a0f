//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: persistence gateway selection and manager construction
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and the presentation mapping (views, forms)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(Arc::new(services))))
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)),
        )
}
