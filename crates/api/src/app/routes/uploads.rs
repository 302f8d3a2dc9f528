//! Raw-body uploads into the `images` and `files` namespaces.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use medprocure_infra::Namespace;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/:namespace", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    Path(namespace): Path<String>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> axum::response::Response {
    let namespace = match Namespace::parse(&namespace) {
        Ok(ns) => ns,
        Err(e) => return errors::file_error_to_response(e),
    };
    if body.len() > services.max_upload_bytes {
        return errors::json_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "upload_too_large",
            format!("uploads are limited to {} bytes", services.max_upload_bytes),
        );
    }

    match services.files.save(namespace, &params.filename, &body) {
        Ok(path) => (
            StatusCode::CREATED,
            Json(json!({ "path": path, "url": format!("/media/{path}") })),
        )
            .into_response(),
        Err(e) => errors::file_error_to_response(e),
    }
}
