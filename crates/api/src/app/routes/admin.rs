//! Admin routes: model index, changelists, detail/add/change/delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use medprocure_admin::ChangeForm;
use medprocure_core::RecordId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/:model", get(changelist).post(add))
        .route("/:model/:id", get(detail).put(change).delete(delete))
        .route("/:model/:id/delete", get(delete_preview))
}

fn parse_id(raw: &str) -> Result<RecordId, axum::response::Response> {
    raw.parse::<RecordId>().map_err(errors::domain_error_to_response)
}

pub async fn index(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.admin.index() {
        Ok(models) => (StatusCode::OK, Json(json!({ "models": models }))).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn changelist(
    Extension(services): Extension<Arc<AppServices>>,
    Path(model): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    match services.admin.changelist(&model, &params) {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Path(model): Path<String>,
    Json(form): Json<ChangeForm>,
) -> axum::response::Response {
    match services.admin.add(&model, form) {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path((model, id)): Path<(String, String)>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.admin.detail(&model, id) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn change(
    Extension(services): Extension<Arc<AppServices>>,
    Path((model, id)): Path<(String, String)>,
    Json(form): Json<ChangeForm>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.admin.change(&model, id, form) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn delete_preview(
    Extension(services): Extension<Arc<AppServices>>,
    Path((model, id)): Path<(String, String)>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.admin.delete_preview(&model, id) {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Path((model, id)): Path<(String, String)>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.admin.delete(&model, id) {
        Ok(deletion) => (StatusCode::OK, Json(deletion)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}
