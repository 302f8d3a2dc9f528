//! Serving stored uploads.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use medprocure_infra::files::content_type;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:namespace/:name", get(fetch))
}

pub async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path((namespace, name)): Path<(String, String)>,
) -> axum::response::Response {
    let path = format!("{namespace}/{name}");
    match services.files.open(&path) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&path))],
            bytes,
        )
            .into_response(),
        Err(e) => errors::file_error_to_response(e),
    }
}
