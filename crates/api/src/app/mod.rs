//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the store, admin site and upload storage shared by handlers
//! - `routes/`: HTTP routes + handlers (admin, uploads, media, system)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let max_upload_bytes = services.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(max_upload_bytes))
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
