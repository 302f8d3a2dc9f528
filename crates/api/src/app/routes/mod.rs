use axum::{routing::get, Router};

pub mod admin;
pub mod media;
pub mod system;
pub mod uploads;

/// Router for every endpoint except `/health`.
pub fn router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/version", get(system::version))
        .nest("/admin/uploads", uploads::router(max_upload_bytes))
        .nest("/admin", admin::router())
        .nest("/media", media::router())
}
